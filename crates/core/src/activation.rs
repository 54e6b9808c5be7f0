//! Chat activation state machine.
//!
//! Opening the chat is the flaky part of the whole verification: on a freshly
//! loaded page the chat may already be open (direct entry), or it may need a
//! click on the notification badge, whose own UI sometimes needs two
//! activations before the chat reacts. The machine drives
//!
//! ```text
//! Idle -> WaitingForWidget -> CheckingDirectEntry -> Activated
//!                                    |                   ^
//!                                    v                   |
//!                          AttemptingSecondaryFrame ------
//! ```
//!
//! with every wait bounded and the badge retry held to an explicit budget.
//! Retries are strictly sequential with a settle delay between them; the
//! budget is never exceeded.

use serde::Serialize;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::config::VerifyConfig;
use crate::discovery::{self, POLL_INTERVAL};
use crate::driver::HostPage;
use crate::error::{Result, VerifyError};

/// How one activation attempt tried to open the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trigger {
    Direct,
    SecondaryFrame,
}

/// Record of one open-chat attempt, kept for the duration of a single
/// activation call.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ActivationAttempt {
    pub attempt: u32,
    pub triggered_via: Trigger,
    pub succeeded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    WaitingForWidget,
    CheckingDirectEntry,
    AttemptingSecondaryFrame,
    Activated,
}

/// Drives the open-chat-and-click-action sequence against one page.
///
/// On success returns the attempt log; on failure the machine has reached its
/// `Failed` state and the typed error says why. Validating the bot's response
/// to the click is the caller's job.
pub struct ChatActivator<'a> {
    config: &'a VerifyConfig,
}

impl<'a> ChatActivator<'a> {
    pub fn new(config: &'a VerifyConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self, page: &dyn HostPage) -> Result<Vec<ActivationAttempt>> {
        let selectors = &self.config.selectors;
        let mut attempts = Vec::new();
        let mut state = State::Idle;

        loop {
            state = match state {
                State::Idle => State::WaitingForWidget,

                State::WaitingForWidget => {
                    discovery::wait_for_attach(
                        page,
                        &selectors.widget,
                        self.config.widget_timeout(),
                    )
                    .await
                    .map_err(|err| match err {
                        VerifyError::DiscoveryTimeout { ms, .. } => {
                            VerifyError::WidgetNotFound { ms }
                        }
                        other => other,
                    })?;

                    // the iframe attaches before its document finishes rendering
                    sleep(self.config.render_settle()).await;
                    State::CheckingDirectEntry
                }

                State::CheckingDirectEntry => {
                    let frame = page.frame(&selectors.widget).await?;
                    let visible = frame.text_visible(&selectors.action_text).await;
                    attempts.push(ActivationAttempt {
                        attempt: 1,
                        triggered_via: Trigger::Direct,
                        succeeded: visible,
                    });

                    if visible {
                        debug!(target: "wv", "chat already open, direct entry");
                        State::Activated
                    } else {
                        State::AttemptingSecondaryFrame
                    }
                }

                State::AttemptingSecondaryFrame => {
                    self.open_via_badge(page, &mut attempts).await?;
                    State::Activated
                }

                State::Activated => {
                    self.click_action(page, &attempts).await?;
                    info!(
                        target: "wv",
                        attempts = attempts.len(),
                        "chat activated and action clicked"
                    );
                    return Ok(attempts);
                }
            };
        }
    }

    /// Fallback path: click the badge until the chat opens, within budget.
    async fn open_via_badge(
        &self,
        page: &dyn HostPage,
        attempts: &mut Vec<ActivationAttempt>,
    ) -> Result<()> {
        let selectors = &self.config.selectors;
        let budget = self.config.secondary_attempts.max(1);

        discovery::wait_for_attach(page, &selectors.secondary, self.config.widget_timeout())
            .await
            .map_err(|err| match err {
                VerifyError::DiscoveryTimeout { ms, .. } => {
                    VerifyError::SecondaryFrameNotFound { ms }
                }
                other => other,
            })?;

        for attempt in 1..=budget {
            let badge = page.frame(&selectors.secondary).await?;
            badge.click_css(&selectors.secondary_trigger).await?;
            sleep(self.config.click_settle()).await;

            let widget = page.frame(&selectors.widget).await?;
            let visible = widget.text_visible(&selectors.action_text).await;
            attempts.push(ActivationAttempt {
                attempt,
                triggered_via: Trigger::SecondaryFrame,
                succeeded: visible,
            });
            debug!(target: "wv", attempt, visible, "badge click probe");

            if visible {
                return Ok(());
            }
        }

        Err(VerifyError::ActivationExhausted { attempts: budget })
    }

    /// Terminal transition: wait for the action target to report visible,
    /// force-click it, and give the bot backend its settle window.
    async fn click_action(&self, page: &dyn HostPage, attempts: &[ActivationAttempt]) -> Result<()> {
        let selectors = &self.config.selectors;
        let deadline = Instant::now() + self.config.action_wait();

        loop {
            let frame = page.frame(&selectors.widget).await?;
            if frame.text_visible(&selectors.action_text).await {
                break;
            }

            let now = Instant::now();
            if now >= deadline {
                // the chat opened and then lost the action again; report it
                // as an activation failure with however many tries we made
                return Err(VerifyError::ActivationExhausted {
                    attempts: attempts.len() as u32,
                });
            }
            sleep(POLL_INTERVAL.min(deadline - now)).await;
        }

        let frame = page.frame(&selectors.widget).await?;
        frame.click_text(&selectors.action_text).await?;
        sleep(self.config.post_click_settle()).await;
        Ok(())
    }
}

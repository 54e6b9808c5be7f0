//! Scenario orchestration across partner targets.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::activation::{ActivationAttempt, ChatActivator};
use crate::config::{PartnerTarget, VerifyConfig};
use crate::diagnostics;
use crate::discovery::{self, POLL_INTERVAL, find_widgets};
use crate::driver::HostPage;
use crate::error::{Result, VerifyError};

/// The two verification flows run against a partner page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    /// The widget is rendered: attached, visible, well-placed.
    Visibility,
    /// The widget is functional: chat opens, action clicks, backend answers.
    Activation,
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioKind::Visibility => f.write_str("visibility"),
            ScenarioKind::Activation => f.write_str("activation"),
        }
    }
}

/// Outcome of one scenario against one partner.
#[derive(Debug)]
pub struct ScenarioResult {
    pub partner: PartnerTarget,
    pub scenario: ScenarioKind,
    pub error: Option<VerifyError>,
    /// Failure screenshot, when one was captured.
    pub screenshot: Option<PathBuf>,
    /// Attempt log from a successful activation.
    pub attempts: Vec<ActivationAttempt>,
}

impl ScenarioResult {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs scenarios for configured partner targets.
///
/// Each scenario run is one strictly sequential flow over a page the caller
/// owns; the runner itself holds no mutable state, so concurrent runs across
/// partners are safe if the caller parallelizes them.
pub struct ScenarioRunner {
    config: VerifyConfig,
    artifacts_dir: PathBuf,
}

impl ScenarioRunner {
    pub fn new(config: VerifyConfig, artifacts_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            artifacts_dir: artifacts_dir.into(),
        }
    }

    pub fn config(&self) -> &VerifyConfig {
        &self.config
    }

    /// Navigates to the partner page and runs one scenario, converting every
    /// failure into a reported result rather than propagating it.
    ///
    /// Activation failures capture diagnostics before the error lands in the
    /// result; visibility failures are plain assertion failures.
    pub async fn run_scenario(
        &self,
        page: &dyn HostPage,
        partner: &PartnerTarget,
        kind: ScenarioKind,
    ) -> ScenarioResult {
        info!(target: "wv", partner = %partner.name, scenario = %kind, "scenario start");

        let outcome = tokio::time::timeout(
            self.config.test_timeout(),
            self.run_inner(page, partner, kind),
        )
        .await
        .unwrap_or(Err(VerifyError::ScenarioTimeout {
            ms: self.config.test_timeout_ms,
        }));

        let (error, attempts) = match outcome {
            Ok(attempts) => (None, attempts),
            Err(err) => (Some(err), Vec::new()),
        };

        let screenshot = match &error {
            Some(err) if kind == ScenarioKind::Activation && err.wants_diagnostics() => {
                diagnostics::capture_failure(page, &self.artifacts_dir).await
            }
            _ => None,
        };

        match &error {
            None => info!(target: "wv", partner = %partner.name, scenario = %kind, "scenario passed"),
            Some(err) => warn!(
                target: "wv",
                partner = %partner.name,
                scenario = %kind,
                error = %err,
                screenshot = ?screenshot,
                "scenario failed"
            ),
        }

        ScenarioResult {
            partner: partner.clone(),
            scenario: kind,
            error,
            screenshot,
            attempts,
        }
    }

    /// Runs the given scenarios for one partner in order, never letting one
    /// failure stop the next scenario or the next partner.
    pub async fn run_partner(
        &self,
        page: &dyn HostPage,
        partner: &PartnerTarget,
        kinds: &[ScenarioKind],
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::with_capacity(kinds.len());
        for kind in kinds {
            results.push(self.run_scenario(page, partner, *kind).await);
        }
        results
    }

    async fn run_inner(
        &self,
        page: &dyn HostPage,
        partner: &PartnerTarget,
        kind: ScenarioKind,
    ) -> Result<Vec<ActivationAttempt>> {
        page.goto(&partner.url, self.config.navigation_timeout())
            .await?;

        match kind {
            ScenarioKind::Visibility => {
                self.verify_visibility(page).await?;
                Ok(Vec::new())
            }
            ScenarioKind::Activation => self.verify_activation(page).await,
        }
    }

    /// Asserts the widget is rendered: 1..=expected containers attached, and
    /// at least one of them a visible, well-placed iframe.
    pub async fn verify_visibility(&self, page: &dyn HostPage) -> Result<()> {
        let selectors = &self.config.selectors;
        let widgets =
            find_widgets(page, &selectors.widget, self.config.widget_timeout()).await?;

        let count = widgets.len();
        if count > self.config.expected_iframe_count {
            return Err(VerifyError::CountOutOfRange {
                count,
                max: self.config.expected_iframe_count,
            });
        }

        let viewport = page.viewport().await?;
        for (index, candidate) in widgets.iter().enumerate() {
            debug!(
                target: "wv",
                index,
                kind = ?candidate.kind,
                visible = candidate.visible,
                geometry = ?candidate.geometry,
                "candidate snapshot"
            );
        }

        // first valid candidate wins; which invalid one to surface when all
        // fail is still an open product question
        if widgets
            .iter()
            .any(|c| discovery::is_valid(c, &viewport, self.config.min_widget_size_px))
        {
            Ok(())
        } else {
            Err(VerifyError::NoValidWidget { count })
        }
    }

    /// Asserts the widget is functional end to end: activation succeeds and
    /// the bot answers the action click with the authorization form.
    pub async fn verify_activation(&self, page: &dyn HostPage) -> Result<Vec<ActivationAttempt>> {
        let attempts = ChatActivator::new(&self.config).run(page).await?;
        self.await_authorization_form(page).await?;
        Ok(attempts)
    }

    /// Bounded wait for the backend-driven authorization form; its absence is
    /// the deliberate sensitivity to bot-service health.
    async fn await_authorization_form(&self, page: &dyn HostPage) -> Result<()> {
        let selectors = &self.config.selectors;
        let deadline = Instant::now() + self.config.downstream_timeout();

        loop {
            let frame = page.frame(&selectors.widget).await?;
            if frame
                .field_visible(&selectors.auth_field_placeholder)
                .await
            {
                return Ok(());
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(VerifyError::DownstreamTimeout {
                    ms: self.config.downstream_timeout_ms,
                });
            }
            sleep(POLL_INTERVAL.min(deadline - now)).await;
        }
    }
}

//! Scripted fakes for the automation boundary.
//!
//! `FakePage` plays the partner page: tests script when the widget attaches,
//! whether the badge is present, and how many badge clicks it takes for the
//! chat to open; the fake records every click so tests can pin retry budgets.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use wv::{
    BoundingGeometry, ElementKind, FrameHandle, HostPage, Result, VerifyConfig, ViewportExtent,
    WidgetCandidate, WidgetSelectors,
};

pub struct PageState {
    pub viewport: ViewportExtent,
    /// Candidates reported for the widget marker once attached.
    pub widget_candidates: Vec<WidgetCandidate>,
    /// Polls of the widget marker that come back empty before it attaches.
    pub widget_attach_after_polls: u32,
    pub widget_polls: u32,
    pub secondary_attached: bool,
    /// Whether the action target is currently visible inside the widget frame.
    pub action_visible: bool,
    /// Badge clicks needed before the chat opens; `None` means it never does.
    pub reveal_after_clicks: Option<u32>,
    pub badge_clicks: u32,
    pub action_clicks: u32,
    /// Whether the bot answers the action click with the authorization form.
    pub auth_after_action: bool,
    pub auth_visible: bool,
    pub visited: Vec<String>,
}

pub struct FakePage {
    selectors: WidgetSelectors,
    state: Arc<Mutex<PageState>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            selectors: WidgetSelectors::default(),
            state: Arc::new(Mutex::new(PageState {
                viewport: ViewportExtent {
                    width: 1280.0,
                    height: 800.0,
                },
                widget_candidates: Vec::new(),
                widget_attach_after_polls: 0,
                widget_polls: 0,
                secondary_attached: false,
                action_visible: false,
                reveal_after_clicks: None,
                badge_clicks: 0,
                action_clicks: 0,
                auth_after_action: false,
                auth_visible: false,
                visited: Vec::new(),
            })),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap()
    }
}

pub fn iframe_candidate(x: f64, y: f64, width: f64, height: f64) -> WidgetCandidate {
    WidgetCandidate {
        kind: ElementKind::Iframe,
        visible: true,
        geometry: Some(BoundingGeometry {
            x,
            y,
            width,
            height,
        }),
    }
}

#[async_trait]
impl HostPage for FakePage {
    async fn goto(&self, url: &str, _timeout: Duration) -> Result<()> {
        self.state().visited.push(url.to_string());
        Ok(())
    }

    async fn viewport(&self) -> Result<ViewportExtent> {
        Ok(self.state().viewport)
    }

    async fn marker_candidates(&self, marker: &str) -> Result<Vec<WidgetCandidate>> {
        let mut state = self.state();
        if marker == self.selectors.widget {
            state.widget_polls += 1;
            if state.widget_polls > state.widget_attach_after_polls {
                return Ok(state.widget_candidates.clone());
            }
            return Ok(Vec::new());
        }
        if marker == self.selectors.secondary && state.secondary_attached {
            return Ok(vec![iframe_candidate(1200.0, 720.0, 60.0, 60.0)]);
        }
        Ok(Vec::new())
    }

    async fn frame<'a>(&'a self, marker: &str) -> Result<Box<dyn FrameHandle + 'a>> {
        Ok(Box::new(FakeFrame {
            state: Arc::clone(&self.state),
            in_badge: marker == self.selectors.secondary,
        }))
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        std::fs::write(path, b"\x89PNG\r\n\x1a\n")?;
        Ok(())
    }

    async fn html(&self) -> Result<String> {
        Ok("<html><body><iframe id=\"widget\"></iframe></body></html>".to_string())
    }
}

struct FakeFrame {
    state: Arc<Mutex<PageState>>,
    in_badge: bool,
}

#[async_trait]
impl FrameHandle for FakeFrame {
    async fn text_visible(&self, _text: &str) -> bool {
        !self.in_badge && self.state.lock().unwrap().action_visible
    }

    async fn click_text(&self, _text: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.action_clicks += 1;
        if state.auth_after_action {
            state.auth_visible = true;
        }
        Ok(())
    }

    async fn click_css(&self, _selector: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.badge_clicks += 1;
        if let Some(needed) = state.reveal_after_clicks {
            if state.badge_clicks >= needed {
                state.action_visible = true;
            }
        }
        Ok(())
    }

    async fn field_visible(&self, _placeholder: &str) -> bool {
        self.state.lock().unwrap().auth_visible
    }
}

/// Config with millisecond-scale budgets so scripted runs finish fast.
pub fn test_config() -> VerifyConfig {
    let mut config = VerifyConfig::for_environment(false);
    config.widget_timeout_ms = 200;
    config.test_timeout_ms = 5_000;
    config.render_settle_ms = 1;
    config.click_settle_ms = 1;
    config.action_wait_ms = 50;
    config.post_click_settle_ms = 1;
    config.downstream_timeout_ms = 50;
    config.navigation_timeout_ms = 100;
    config
}

pub fn partner() -> wv::PartnerTarget {
    wv::PartnerTarget {
        name: "Acme Winery (staging)".into(),
        url: "https://staging.acme.example/shop/index.html".into(),
    }
}

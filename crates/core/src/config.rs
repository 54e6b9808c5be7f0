//! Run configuration.
//!
//! Immutable for the whole run and handed to the orchestrator at
//! construction. Timeouts are environment-sensitive: continuous-integration
//! runners and the staging servers they talk to are slow, so the attach and
//! scenario budgets double when `CI` is set.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One partner page to verify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerTarget {
    pub name: String,
    pub url: String,
}

/// Markers for the known embedding convention.
///
/// These are stable contract points with the widget vendor, not guesses about
/// partner DOM structure; everything else inside the embedded documents is
/// located by visible text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetSelectors {
    /// Primary chat widget container.
    pub widget: String,
    /// Notification badge container that can also open the chat.
    pub secondary: String,
    /// Clickable sub-element inside the badge's embedded document.
    pub secondary_trigger: String,
    /// Visible text of the order-tracking action inside the chat UI.
    pub action_text: String,
    /// Placeholder of the authorization form's email field.
    pub auth_field_placeholder: String,
}

impl Default for WidgetSelectors {
    fn default() -> Self {
        Self {
            widget: "#winespot".into(),
            secondary: "#wsf_medal".into(),
            secondary_trigger: ".face".into(),
            action_text: "Track and manage my orders".into(),
            auth_field_placeholder: "johndoe@email.com".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifyConfig {
    /// Budget for a widget (or badge) container to attach.
    pub widget_timeout_ms: u64,
    /// Wall-clock budget for one whole scenario.
    pub test_timeout_ms: u64,
    /// Geometry threshold filtering collapsed containers and loaders.
    pub min_widget_size_px: f64,
    /// Upper bound on containers per page (widget + badge).
    pub expected_iframe_count: usize,
    /// Badge click-and-probe cycles before giving up; the badge sometimes
    /// needs two activations.
    pub secondary_attempts: u32,
    /// Pause after the widget attaches, for its internal render.
    pub render_settle_ms: u64,
    /// Pause after a badge click before re-probing the action target.
    pub click_settle_ms: u64,
    /// Budget for the action target to report visible once the chat is open.
    pub action_wait_ms: u64,
    /// Pause after clicking the action, giving the bot backend time to answer.
    pub post_click_settle_ms: u64,
    /// Budget for the authorization form to appear after the action click.
    pub downstream_timeout_ms: u64,
    /// Budget for navigating to a partner page.
    pub navigation_timeout_ms: u64,
    pub partners: Vec<PartnerTarget>,
    pub selectors: WidgetSelectors,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self::for_environment(in_ci())
    }
}

impl VerifyConfig {
    /// Baseline config for a local or CI environment.
    pub fn for_environment(ci: bool) -> Self {
        Self {
            widget_timeout_ms: if ci { 60_000 } else { 30_000 },
            test_timeout_ms: if ci { 120_000 } else { 60_000 },
            min_widget_size_px: 30.0,
            expected_iframe_count: 2,
            secondary_attempts: 2,
            render_settle_ms: 2_000,
            click_settle_ms: 1_500,
            action_wait_ms: 10_000,
            post_click_settle_ms: 2_000,
            downstream_timeout_ms: 10_000,
            navigation_timeout_ms: 60_000,
            partners: Vec::new(),
            selectors: WidgetSelectors::default(),
        }
    }

    /// Loads a JSON config file; missing fields fall back to the
    /// environment-sensitive defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        Ok(config)
    }

    pub fn widget_timeout(&self) -> Duration {
        Duration::from_millis(self.widget_timeout_ms)
    }

    pub fn test_timeout(&self) -> Duration {
        Duration::from_millis(self.test_timeout_ms)
    }

    pub fn render_settle(&self) -> Duration {
        Duration::from_millis(self.render_settle_ms)
    }

    pub fn click_settle(&self) -> Duration {
        Duration::from_millis(self.click_settle_ms)
    }

    pub fn action_wait(&self) -> Duration {
        Duration::from_millis(self.action_wait_ms)
    }

    pub fn post_click_settle(&self) -> Duration {
        Duration::from_millis(self.post_click_settle_ms)
    }

    pub fn downstream_timeout(&self) -> Duration {
        Duration::from_millis(self.downstream_timeout_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }
}

fn in_ci() -> bool {
    std::env::var("CI").is_ok_and(|v| !v.is_empty())
}

//! Error taxonomy for widget verification.
//!
//! Two tiers: visibility probes inside frames swallow locator errors and
//! degrade to `false` (a transiently missing element is an answer, not a
//! crash), while bounded waits that exhaust their budget surface as the typed
//! failures below. The orchestrator adds diagnostic capture on top and then
//! re-raises the error unchanged.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, VerifyError>;

#[derive(Debug, Error)]
pub enum VerifyError {
    /// No widget container attached within the discovery budget.
    #[error("no element matching {marker} attached within {ms}ms")]
    DiscoveryTimeout { marker: String, ms: u64 },

    /// The activation flow never saw the primary widget attach.
    #[error("primary widget container never attached within {ms}ms")]
    WidgetNotFound { ms: u64 },

    /// The fallback path needed the notification badge frame, which never attached.
    #[error("notification badge frame never attached within {ms}ms")]
    SecondaryFrameNotFound { ms: u64 },

    /// Direct entry and every badge click failed to reveal the action target.
    #[error("chat did not open after {attempts} badge click attempt(s)")]
    ActivationExhausted { attempts: u32 },

    /// The action was clicked but the backend-driven authorization form never appeared.
    #[error("authorization form did not appear within {ms}ms of clicking the action")]
    DownstreamTimeout { ms: u64 },

    /// More widget containers on the page than the embedding convention allows.
    #[error("found {count} widget container(s), expected between 1 and {max}")]
    CountOutOfRange { count: usize, max: usize },

    /// Candidates were found, but none passed the kind/visibility/geometry checks.
    #[error("none of {count} widget candidate(s) is a visible, well-placed iframe")]
    NoValidWidget { count: usize },

    /// One scenario exceeded its wall-clock budget.
    #[error("scenario exceeded its {ms}ms budget")]
    ScenarioTimeout { ms: u64 },

    #[error("navigation failed: {url}")]
    Navigation {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("screenshot failed: {path}")]
    Screenshot {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl VerifyError {
    /// True for failures where a page screenshot is worth keeping.
    ///
    /// Navigation never reached the widget, so there is nothing useful on
    /// screen to capture; everything else happened on a loaded page.
    pub fn wants_diagnostics(&self) -> bool {
        !matches!(self, VerifyError::Navigation { .. })
    }
}

//! Capability boundary to the host browser automation.
//!
//! The engine never touches DOM plumbing directly: everything it needs from
//! the browser is expressed as the two traits below, implemented once over a
//! live WebDriver session (see [`crate::webdriver`]) and by scripted fakes in
//! tests. Frame access is a capability of its own: the widget and the
//! notification badge are foreign documents whose internal structure is not
//! ours to assume, so the engine only ever asks "is this text visible in
//! there" and "click this", never for a concrete DOM path.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::discovery::WidgetCandidate;
use crate::error::Result;
use crate::geometry::ViewportExtent;

/// Read/act surface of one host page owning one navigation context.
#[async_trait]
pub trait HostPage: Send + Sync {
    /// Navigate to `url`, bounded by `timeout`.
    async fn goto(&self, url: &str, timeout: Duration) -> Result<()>;

    /// Current viewport extent.
    async fn viewport(&self) -> Result<ViewportExtent>;

    /// Snapshot every element currently matching `marker`.
    ///
    /// Returns an empty vec while nothing is attached; the per-candidate
    /// reads are best-effort (an element detached mid-read yields a candidate
    /// with absent geometry, not an error).
    async fn marker_candidates(&self, marker: &str) -> Result<Vec<WidgetCandidate>>;

    /// Handle onto the embedded document of the first element matching `marker`.
    async fn frame<'a>(&'a self, marker: &str) -> Result<Box<dyn FrameHandle + 'a>>;

    /// Write a screenshot of the page to `path`.
    async fn screenshot(&self, path: &Path) -> Result<()>;

    /// Current page markup, for failure diagnostics.
    async fn html(&self) -> Result<String>;
}

/// Act-within-frame capability for one embedded foreign document.
///
/// The two `*_visible` probes swallow every locator error and answer `false`;
/// the clicks are forced (dispatched in-page, past any overlay that would
/// intercept a trusted pointer event) and do propagate failures.
#[async_trait]
pub trait FrameHandle: Send + Sync {
    /// Whether an element whose own text contains `text` is visible.
    async fn text_visible(&self, text: &str) -> bool;

    /// Force-click the first element whose own text contains `text`.
    async fn click_text(&self, text: &str) -> Result<()>;

    /// Force-click the first element matching the CSS `selector`.
    async fn click_css(&self, selector: &str) -> Result<()>;

    /// Whether an input with the given `placeholder` is visible.
    async fn field_visible(&self, placeholder: &str) -> bool;
}

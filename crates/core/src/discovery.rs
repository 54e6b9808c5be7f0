//! Locating widget containers on the host page.

use std::time::Duration;

use serde::Serialize;
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::driver::HostPage;
use crate::error::{Result, VerifyError};
use crate::geometry::{BoundingGeometry, ViewportExtent, is_valid_widget_geometry};

/// How often an attach wait re-queries the page.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Iframe,
    Other,
}

/// One located container element, snapshotted for a single validation pass.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetCandidate {
    pub kind: ElementKind,
    pub visible: bool,
    pub geometry: Option<BoundingGeometry>,
}

/// Waits for at least one element matching `marker` to attach, then snapshots
/// every match.
///
/// The embedding convention puts one or two containers on a page (the widget
/// plus an optional badge); no fixed count is assumed here, the caller
/// enforces its expected range. Fails with [`VerifyError::DiscoveryTimeout`]
/// if nothing attaches within `timeout`.
pub async fn find_widgets(
    page: &dyn HostPage,
    marker: &str,
    timeout: Duration,
) -> Result<Vec<WidgetCandidate>> {
    let deadline = Instant::now() + timeout;

    loop {
        let candidates = page.marker_candidates(marker).await?;
        if !candidates.is_empty() {
            debug!(target: "wv", marker, count = candidates.len(), "widget container(s) attached");
            return Ok(candidates);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(VerifyError::DiscoveryTimeout {
                marker: marker.to_string(),
                ms: timeout.as_millis() as u64,
            });
        }
        sleep(POLL_INTERVAL.min(deadline - now)).await;
    }
}

/// Waits for `marker` to attach without snapshotting, same budget semantics.
pub async fn wait_for_attach(page: &dyn HostPage, marker: &str, timeout: Duration) -> Result<()> {
    find_widgets(page, marker, timeout).await.map(|_| ())
}

/// Whether one candidate is a rendered widget: an iframe, currently visible,
/// with acceptable geometry.
pub fn is_valid(candidate: &WidgetCandidate, viewport: &ViewportExtent, min_size: f64) -> bool {
    candidate.kind == ElementKind::Iframe
        && candidate.visible
        && is_valid_widget_geometry(candidate.geometry.as_ref(), viewport, min_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: ViewportExtent = ViewportExtent {
        width: 1280.0,
        height: 800.0,
    };

    fn candidate(kind: ElementKind, visible: bool, geometry: Option<BoundingGeometry>) -> WidgetCandidate {
        WidgetCandidate {
            kind,
            visible,
            geometry,
        }
    }

    const GOOD_BOX: BoundingGeometry = BoundingGeometry {
        x: 20.0,
        y: 600.0,
        width: 360.0,
        height: 180.0,
    };

    #[test]
    fn iframe_visible_with_good_geometry_is_valid() {
        let c = candidate(ElementKind::Iframe, true, Some(GOOD_BOX));
        assert!(is_valid(&c, &VIEWPORT, 30.0));
    }

    #[test]
    fn non_iframe_is_invalid_regardless_of_geometry() {
        let c = candidate(ElementKind::Other, true, Some(GOOD_BOX));
        assert!(!is_valid(&c, &VIEWPORT, 30.0));
    }

    #[test]
    fn hidden_iframe_is_invalid() {
        let c = candidate(ElementKind::Iframe, false, Some(GOOD_BOX));
        assert!(!is_valid(&c, &VIEWPORT, 30.0));
    }

    #[test]
    fn unlaid_out_iframe_is_invalid() {
        let c = candidate(ElementKind::Iframe, true, None);
        assert!(!is_valid(&c, &VIEWPORT, 30.0));
    }
}

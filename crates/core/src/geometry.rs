//! On-screen geometry checks for widget candidates.

use serde::{Deserialize, Serialize};

/// Visible rendering area of the host page, snapshotted once per check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportExtent {
    pub width: f64,
    pub height: f64,
}

/// Bounding box of a candidate element in page coordinates.
///
/// Absent when the element has not been laid out yet (or detached mid-read);
/// callers model that as `Option<BoundingGeometry>` and treat `None` as
/// invalid rather than as an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Whether a widget bounding box is acceptable for the given viewport.
///
/// A box passes when both extents strictly exceed `min_size` and the whole
/// rectangle sits inside `[0, 0]..[viewport.width, viewport.height]`. The
/// strict inequality is deliberate: collapsed containers and loader spinners
/// render at or just under the threshold, and a real chat widget is an order
/// of magnitude larger.
pub fn is_valid_widget_geometry(
    geometry: Option<&BoundingGeometry>,
    viewport: &ViewportExtent,
    min_size: f64,
) -> bool {
    let Some(rect) = geometry else {
        return false;
    };

    if rect.width <= min_size || rect.height <= min_size {
        return false;
    }

    if rect.x < 0.0 || rect.y < 0.0 {
        return false;
    }

    rect.x + rect.width <= viewport.width && rect.y + rect.height <= viewport.height
}

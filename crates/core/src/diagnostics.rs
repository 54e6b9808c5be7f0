//! Failure diagnostics.
//!
//! Captures the page state when an activation scenario fails, so failures are
//! inspectable without re-running. Collection never propagates errors: the
//! original failure stays the reported one.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use crate::driver::HostPage;

/// Writes a `fail-<millis>.png` screenshot and a matching `.html` dump of the
/// current page into `dir`, creating the directory if needed.
///
/// Returns the screenshot path when one was written; artifacts are for human
/// debugging only and nothing downstream consumes them.
pub async fn capture_failure(page: &dyn HostPage, dir: &Path) -> Option<PathBuf> {
    if let Err(err) = std::fs::create_dir_all(dir) {
        warn!(target: "wv", %err, dir = %dir.display(), "failed to create artifacts directory");
        return None;
    }

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);

    let screenshot_path = dir.join(format!("fail-{millis}.png"));
    let screenshot = match page.screenshot(&screenshot_path).await {
        Ok(()) => {
            debug!(target: "wv", path = %screenshot_path.display(), "captured failure screenshot");
            Some(screenshot_path)
        }
        Err(err) => {
            warn!(target: "wv", %err, "failed to capture failure screenshot");
            None
        }
    };

    let html_path = dir.join(format!("fail-{millis}.html"));
    match page.html().await {
        Ok(html) => {
            if let Err(err) = std::fs::write(&html_path, &html) {
                warn!(target: "wv", %err, "failed to write failure html");
            } else {
                debug!(target: "wv", path = %html_path.display(), "captured failure html");
            }
        }
        Err(err) => warn!(target: "wv", %err, "failed to read page html"),
    }

    screenshot
}

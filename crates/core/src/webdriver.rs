//! WebDriver-backed implementation of the automation boundary.
//!
//! One [`WebDriverPage`] owns one WebDriver session. The session's browsing
//! context is stateful (switching into an iframe is global to the session),
//! so every frame operation re-resolves its container, switches in, acts, and
//! restores the top-level context before returning. A frame detached between
//! calls degrades that single probe instead of poisoning the session.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::error::WebDriverResult;
use thirtyfour::{By, DesiredCapabilities, WebDriver, WebElement};
use tracing::{debug, warn};

use crate::discovery::{ElementKind, WidgetCandidate};
use crate::driver::{FrameHandle, HostPage};
use crate::error::{Result, VerifyError};
use crate::geometry::{BoundingGeometry, ViewportExtent};

pub struct WebDriverPage {
    driver: WebDriver,
}

impl WebDriverPage {
    /// Starts a Chrome session against a WebDriver endpoint
    /// (e.g. a local chromedriver at `http://localhost:9515`).
    pub async fn connect(server_url: &str) -> Result<Self> {
        let caps = DesiredCapabilities::chrome();
        let driver = WebDriver::new(server_url, caps).await?;
        Ok(Self { driver })
    }

    /// Wraps an already-established session.
    pub fn new(driver: WebDriver) -> Self {
        Self { driver }
    }

    pub async fn quit(self) -> Result<()> {
        self.driver.quit().await?;
        Ok(())
    }

    /// Best-effort snapshot of one candidate; an element that detaches
    /// mid-read yields absent geometry, never an error.
    async fn snapshot(&self, element: &WebElement) -> WidgetCandidate {
        let kind = match element.tag_name().await {
            Ok(tag) if tag.eq_ignore_ascii_case("iframe") => ElementKind::Iframe,
            _ => ElementKind::Other,
        };
        let visible = element.is_displayed().await.unwrap_or(false);
        let geometry = element.rect().await.ok().map(|r| BoundingGeometry {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
        });

        WidgetCandidate {
            kind,
            visible,
            geometry,
        }
    }
}

#[async_trait]
impl HostPage for WebDriverPage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<()> {
        self.driver.set_page_load_timeout(timeout).await?;
        self.driver
            .goto(url)
            .await
            .map_err(|source| VerifyError::Navigation {
                url: url.to_string(),
                source: source.into(),
            })
    }

    async fn viewport(&self) -> Result<ViewportExtent> {
        let ret = self
            .driver
            .execute(
                "return [window.innerWidth, window.innerHeight];",
                Vec::new(),
            )
            .await?;
        let (width, height): (f64, f64) = ret.convert()?;
        Ok(ViewportExtent { width, height })
    }

    async fn marker_candidates(&self, marker: &str) -> Result<Vec<WidgetCandidate>> {
        self.driver.enter_default_frame().await?;
        let elements = self.driver.find_all(By::Css(marker)).await?;

        let mut candidates = Vec::with_capacity(elements.len());
        for element in &elements {
            candidates.push(self.snapshot(element).await);
        }
        Ok(candidates)
    }

    async fn frame<'a>(&'a self, marker: &str) -> Result<Box<dyn FrameHandle + 'a>> {
        Ok(Box::new(WebDriverFrame {
            driver: &self.driver,
            marker: marker.to_string(),
        }))
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        self.driver.enter_default_frame().await?;
        self.driver
            .screenshot(path)
            .await
            .map_err(|source| VerifyError::Screenshot {
                path: path.to_path_buf(),
                source: source.into(),
            })
    }

    async fn html(&self) -> Result<String> {
        self.driver.enter_default_frame().await?;
        Ok(self.driver.source().await?)
    }
}

/// Handle onto the embedded document of one container element.
struct WebDriverFrame<'a> {
    driver: &'a WebDriver,
    marker: String,
}

impl WebDriverFrame<'_> {
    /// Normalizes to the top-level context, re-resolves the container, and
    /// switches into its embedded document.
    async fn enter(&self) -> WebDriverResult<()> {
        self.driver.enter_default_frame().await?;
        let container = self.driver.find(By::Css(self.marker.as_str())).await?;
        container.enter_frame().await
    }

    async fn leave(&self) {
        if let Err(err) = self.driver.enter_default_frame().await {
            warn!(target: "wv", %err, "failed to restore top-level browsing context");
        }
    }

    async fn probe_visible(&self, by: By) -> WebDriverResult<bool> {
        let elements = self.driver.find_all(by).await?;
        for element in elements {
            if element.is_displayed().await.unwrap_or(false) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Clicks in-page rather than through a synthesized pointer event, so an
    /// overlay intercepting hit-testing cannot swallow the click.
    async fn force_click(&self, by: By) -> WebDriverResult<()> {
        let element = first_displayed_or_first(self.driver, by).await?;
        self.driver
            .execute("arguments[0].click();", vec![element.to_json()?])
            .await?;
        Ok(())
    }

    async fn visible_probe(&self, by: By) -> bool {
        let probed = match self.enter().await {
            Ok(()) => self.probe_visible(by).await.unwrap_or(false),
            Err(err) => {
                debug!(target: "wv", %err, marker = %self.marker, "frame not probeable");
                false
            }
        };
        self.leave().await;
        probed
    }

    async fn click(&self, by: By) -> Result<()> {
        let outcome = match self.enter().await {
            Ok(()) => self.force_click(by).await,
            Err(err) => Err(err),
        };
        self.leave().await;
        outcome.map_err(VerifyError::from)
    }
}

#[async_trait]
impl FrameHandle for WebDriverFrame<'_> {
    async fn text_visible(&self, text: &str) -> bool {
        self.visible_probe(By::XPath(text_xpath(text))).await
    }

    async fn click_text(&self, text: &str) -> Result<()> {
        self.click(By::XPath(text_xpath(text))).await
    }

    async fn click_css(&self, selector: &str) -> Result<()> {
        self.click(By::Css(selector)).await
    }

    async fn field_visible(&self, placeholder: &str) -> bool {
        self.visible_probe(By::Css(format!("input[placeholder='{placeholder}']")))
            .await
    }
}

/// Prefers a displayed match; falls back to the first match so that forced
/// clicks still reach elements an overlay reports as hidden.
async fn first_displayed_or_first(driver: &WebDriver, by: By) -> WebDriverResult<WebElement> {
    let elements = driver.find_all(by.clone()).await?;
    for element in elements {
        if element.is_displayed().await.unwrap_or(false) {
            return Ok(element);
        }
    }
    driver.find(by).await
}

/// Matches elements whose own text nodes contain `text` (inexact, trimmed),
/// skipping the ancestors that merely contain such an element.
fn text_xpath(text: &str) -> String {
    format!(r#"//*[text()[contains(normalize-space(.), "{text}")]]"#)
}

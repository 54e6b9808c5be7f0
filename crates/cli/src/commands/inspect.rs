//! Inspect command: one-page widget diagnostics.
//!
//! For debugging a misbehaving embed without running assertions: dumps every
//! container candidate with its geometry verdict, whether the notification
//! badge is attached, and whether the chat's action target is visible.

use anyhow::{Context, Result};
use url::Url;
use wv::{VerifyConfig, WebDriverPage, discovery};

use crate::cli::InspectArgs;

pub async fn execute(args: InspectArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => VerifyConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => VerifyConfig::default(),
    };
    Url::parse(&args.url).with_context(|| format!("invalid url: {}", args.url))?;

    let page = WebDriverPage::connect(&args.webdriver_url)
        .await
        .with_context(|| format!("connecting to webdriver at {}", args.webdriver_url))?;

    let outcome = inspect_page(&page, &config, &args.url).await;
    let _ = page.quit().await;
    outcome
}

async fn inspect_page(page: &WebDriverPage, config: &VerifyConfig, url: &str) -> Result<()> {
    use wv::HostPage;

    let selectors = &config.selectors;
    page.goto(url, config.navigation_timeout()).await?;

    let viewport = page.viewport().await?;
    println!("viewport: {:.0}x{:.0}", viewport.width, viewport.height);

    let widgets = discovery::find_widgets(page, &selectors.widget, config.widget_timeout()).await?;
    println!(
        "{} container(s) matching {}",
        widgets.len(),
        selectors.widget
    );
    for (index, candidate) in widgets.iter().enumerate() {
        let valid = discovery::is_valid(candidate, &viewport, config.min_widget_size_px);
        println!(
            "  [{index}] kind={:?} visible={} geometry={:?} valid={valid}",
            candidate.kind, candidate.visible, candidate.geometry
        );
    }

    let badge = page.marker_candidates(&selectors.secondary).await?;
    println!(
        "badge {}: {}",
        selectors.secondary,
        if badge.is_empty() { "absent" } else { "attached" }
    );

    let frame = page.frame(&selectors.widget).await?;
    let action_visible = frame.text_visible(&selectors.action_text).await;
    drop(frame);
    println!(
        "action target {:?} visible: {action_visible}",
        selectors.action_text
    );

    Ok(())
}

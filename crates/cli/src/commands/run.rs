//! Run command: verification scenarios across the configured partners.

use anyhow::{Context, Result, ensure};
use tracing::{info, warn};
use url::Url;
use wv::{ScenarioRunner, VerifyConfig, WebDriverPage};

use crate::cli::RunArgs;
use crate::report;

pub async fn execute(args: RunArgs) -> Result<bool> {
    let config = VerifyConfig::load(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;

    let partners: Vec<_> = config
        .partners
        .iter()
        .filter(|p| {
            args.partner
                .as_deref()
                .is_none_or(|needle| p.name.contains(needle))
        })
        .cloned()
        .collect();
    ensure!(
        !partners.is_empty(),
        "no partner targets selected (config has {}, filter: {:?})",
        config.partners.len(),
        args.partner
    );
    for partner in &partners {
        Url::parse(&partner.url)
            .with_context(|| format!("partner {} has an invalid url: {}", partner.name, partner.url))?;
    }

    let kinds = args.scenario.kinds();
    info!(
        target: "wv_cli",
        partners = partners.len(),
        scenarios = kinds.len(),
        webdriver = %args.webdriver_url,
        "starting verification run"
    );

    let page = WebDriverPage::connect(&args.webdriver_url)
        .await
        .with_context(|| format!("connecting to webdriver at {}", args.webdriver_url))?;

    let runner = ScenarioRunner::new(config, &args.artifacts_dir);
    let mut results = Vec::new();
    for partner in &partners {
        results.extend(runner.run_partner(&page, partner, &kinds).await);
    }

    if let Err(err) = page.quit().await {
        warn!(target: "wv_cli", %err, "failed to shut down the webdriver session");
    }

    if args.json {
        report::print_json(&results)?;
    } else {
        report::print_summary(&results);
    }

    Ok(results.iter().all(|r| r.passed()))
}

//! Result reporting for the run command.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use wv::{ActivationAttempt, ScenarioKind, ScenarioResult};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportEntry<'a> {
    partner: &'a str,
    url: &'a str,
    scenario: ScenarioKind,
    passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    screenshot: Option<&'a Path>,
    attempts: &'a [ActivationAttempt],
}

impl<'a> ReportEntry<'a> {
    fn from_result(result: &'a ScenarioResult) -> Self {
        Self {
            partner: &result.partner.name,
            url: &result.partner.url,
            scenario: result.scenario,
            passed: result.passed(),
            error: result.error.as_ref().map(|e| e.to_string()),
            screenshot: result.screenshot.as_deref(),
            attempts: &result.attempts,
        }
    }
}

pub fn print_summary(results: &[ScenarioResult]) {
    for result in results {
        let status = if result.passed() {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };
        println!(
            "{status} {} / {}",
            result.partner.name.bold(),
            result.scenario
        );
        if let Some(err) = &result.error {
            println!("     {}", err.to_string().red());
        }
        if let Some(screenshot) = &result.screenshot {
            println!("     screenshot: {}", screenshot.display());
        }
    }

    let passed = results.iter().filter(|r| r.passed()).count();
    let failed = results.len() - passed;
    let tally = format!("{passed} passed, {failed} failed");
    println!(
        "\n{}",
        if failed == 0 {
            tally.green().to_string()
        } else {
            tally.red().to_string()
        }
    );
}

pub fn print_json(results: &[ScenarioResult]) -> Result<()> {
    let entries: Vec<ReportEntry<'_>> = results.iter().map(ReportEntry::from_result).collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

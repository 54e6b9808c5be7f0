use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use wv::ScenarioKind;

/// Root CLI.
#[derive(Parser, Debug)]
#[command(name = "wv")]
#[command(about = "Verify embedded chat widgets on partner pages")]
#[command(version)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run verification scenarios against the configured partners.
    Run(RunArgs),
    /// Dump widget diagnostics for a single partner page.
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Path to the JSON run configuration.
    #[arg(short, long, value_name = "FILE")]
    pub config: PathBuf,

    /// WebDriver endpoint driving the browser.
    #[arg(long, value_name = "URL", default_value = "http://localhost:9515")]
    pub webdriver_url: String,

    /// Which scenarios to run.
    #[arg(long, value_enum, default_value = "all")]
    pub scenario: ScenarioFilter,

    /// Only run partners whose name contains this string.
    #[arg(long, value_name = "NAME")]
    pub partner: Option<String>,

    /// Directory for failure screenshots and page dumps.
    #[arg(long, value_name = "DIR", default_value = "screenshots")]
    pub artifacts_dir: PathBuf,

    /// Emit results as JSON instead of the text summary.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Partner page URL to inspect.
    #[arg(value_name = "URL")]
    pub url: String,

    /// Optional config for selector and timeout overrides.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// WebDriver endpoint driving the browser.
    #[arg(long, value_name = "URL", default_value = "http://localhost:9515")]
    pub webdriver_url: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioFilter {
    Visibility,
    Activation,
    All,
}

impl ScenarioFilter {
    pub fn kinds(self) -> Vec<ScenarioKind> {
        match self {
            ScenarioFilter::Visibility => vec![ScenarioKind::Visibility],
            ScenarioFilter::Activation => vec![ScenarioKind::Activation],
            ScenarioFilter::All => vec![ScenarioKind::Visibility, ScenarioKind::Activation],
        }
    }
}

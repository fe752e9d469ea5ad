//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use miette::Result;
use std::path::PathBuf;

use crate::cli::commands::{
    alt::AltArgs, categories::CategoriesArgs, completions::CompletionsArgs, marking::MarkingArgs,
    resolve::ResolveArgs, search::SearchArgs, show::ShowArgs,
};
use crate::core::entity::Lifecycle;
use crate::core::filter::FilterSpec;
use crate::core::predicates::RangeQuery;
use crate::entities::component::Flag;

#[derive(Parser)]
#[command(name = "chipdex")]
#[command(author, version, about = "Electronic component catalog lookup")]
#[command(long_about = "Look up chips by part number, browse and filter the catalog, list classified replacement parts and identify parts from their package markings.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Catalog snapshot file or directory
    #[arg(long, short = 'C', global = true, env = "CHIPDEX_CATALOG")]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the catalog by text and structured filters
    Search(SearchArgs),

    /// Resolve a part number to its component family
    Resolve(ResolveArgs),

    /// List replacement parts for an order variant
    Alt(AltArgs),

    /// Identify parts from a package marking
    Marking(MarkingArgs),

    /// Show the category tree
    Categories(CategoriesArgs),

    /// Show a component with its variants and best offers
    Show(ShowArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (yaml for show, tsv for lists)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

/// Structured filter options shared by `search` and `resolve`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Category path prefix (e.g., "Power/DC-DC")
    #[arg(long)]
    pub category: Option<String>,

    /// Allowed manufacturer(s)
    #[arg(long = "manufacturer", short = 'm', value_delimiter = ',')]
    pub manufacturers: Vec<String>,

    /// Allowed package(s)
    #[arg(long = "package", short = 'p', value_delimiter = ',')]
    pub packages: Vec<String>,

    /// Allowed lifecycle status(es)
    #[arg(long = "lifecycle", value_delimiter = ',')]
    pub lifecycles: Vec<Lifecycle>,

    /// Allowed interface(s) (e.g., I2C,SPI)
    #[arg(long = "interface", value_delimiter = ',')]
    pub interfaces: Vec<String>,

    /// Lowest voltage the part must reach
    #[arg(long, value_name = "VOLTS")]
    pub voltage_min: Option<f64>,

    /// Highest voltage the part must reach
    #[arg(long, value_name = "VOLTS")]
    pub voltage_max: Option<f64>,

    /// Lowest current the part must reach
    #[arg(long, value_name = "AMPS")]
    pub current_min: Option<f64>,

    /// Highest current the part must reach
    #[arg(long, value_name = "AMPS")]
    pub current_max: Option<f64>,

    /// Required capability flag(s)
    #[arg(long = "require", value_delimiter = ',')]
    pub require: Vec<Flag>,

    /// Parameter value constraint, repeatable
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,
}

impl FilterArgs {
    /// Build the filter specification these options describe
    pub fn to_spec(&self) -> Result<FilterSpec> {
        let mut spec = FilterSpec {
            category: self.category.clone(),
            manufacturers: self.manufacturers.iter().cloned().collect(),
            packages: self.packages.iter().cloned().collect(),
            lifecycles: self.lifecycles.iter().copied().collect(),
            interfaces: self.interfaces.iter().cloned().collect(),
            require: self.require.iter().copied().collect(),
            ..FilterSpec::default()
        };

        let voltage = RangeQuery::new(self.voltage_min, self.voltage_max);
        if !voltage.is_empty() {
            spec.voltage = Some(voltage);
        }
        let current = RangeQuery::new(self.current_min, self.current_max);
        if !current.is_empty() {
            spec.current = Some(current);
        }

        for param in &self.params {
            let (key, value) = param.split_once('=').ok_or_else(|| {
                miette::miette!(
                    help = "use --param \"Output Current=3A\"",
                    "invalid parameter filter '{}'",
                    param
                )
            })?;
            spec = spec.with_parameter(key.trim(), value.trim());
        }

        Ok(spec)
    }
}

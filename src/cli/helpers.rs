//! Shared helper functions for CLI commands

use clap::ValueEnum;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::CatalogIndex;
use crate::core::config::Config;
use crate::core::loader::load_catalog;

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Load the catalog named by `--catalog`/`CHIPDEX_CATALOG` or the config
pub fn open_catalog(global: &GlobalOpts, config: &Config) -> Result<CatalogIndex> {
    let path = global
        .catalog
        .clone()
        .or_else(|| config.catalog.clone())
        .ok_or_else(|| {
            miette::miette!(
                code = "chipdex::cli::no_catalog",
                help = "pass --catalog <PATH>, set CHIPDEX_CATALOG, or add `catalog:` to .chipdex.yaml",
                "no catalog configured"
            )
        })?;
    Ok(load_catalog(&path)?)
}

/// Pick the output format: explicit flag, then config default, then `fallback`
pub fn effective_format(global: &GlobalOpts, config: &Config, fallback: OutputFormat) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    config
        .default_format
        .as_deref()
        .and_then(|name| OutputFormat::from_str(name, true).ok())
        .filter(|f| *f != OutputFormat::Auto)
        .unwrap_or(fallback)
}

/// Print a value as YAML or JSON; returns false for table formats
pub fn print_structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
            Ok(true)
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(value).into_diagnostic()?);
            Ok(true)
        }
        _ => Ok(false),
    }
}

//! `chipdex marking` command - Identify parts from a package marking

use console::style;
use miette::Result;

use crate::cli::helpers::{effective_format, open_catalog, print_structured};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::entities::silkscreen::SilkscreenMapping;

#[derive(clap::Args, Debug)]
pub struct MarkingArgs {
    /// Marking text as printed on the part
    pub text: String,
}

const MARKING_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("marking", "MARKING", 12),
    ColumnDef::new("target", "ORDER CODE", 24),
    ColumnDef::new("manufacturer", "MANUFACTURER", 16),
    ColumnDef::new("category", "CATEGORY", 24),
    ColumnDef::new("pins", "PINS", 4),
    ColumnDef::new("alternates", "ALSO", 20),
];

fn marking_row(mapping: &SilkscreenMapping) -> TableRow {
    TableRow::new(&mapping.target)
        .cell("marking", CellValue::Id(mapping.marking.clone()))
        .cell("target", CellValue::Text(mapping.target.clone()))
        .cell(
            "manufacturer",
            CellValue::opt_text(mapping.manufacturer.as_deref()),
        )
        .cell("category", CellValue::opt_text(mapping.category.as_deref()))
        .cell(
            "pins",
            mapping
                .pins
                .map_or(CellValue::Empty, |p| CellValue::Number(i64::from(p))),
        )
        .cell("alternates", CellValue::Tags(mapping.alternate_markings.clone()))
}

/// Run the marking command
pub fn run(args: MarkingArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let index = open_catalog(global, &config)?;

    let hits = index.resolve_silkscreen(&args.text);
    let format = effective_format(global, &config, OutputFormat::Tsv);
    if print_structured(&hits, format)? {
        return Ok(());
    }

    if hits.is_empty() {
        if !global.quiet {
            println!("No parts carry marking '{}'.", style(&args.text).yellow());
        }
        return Ok(());
    }

    let visible: Vec<&str> = MARKING_COLUMNS.iter().map(|c| c.key).collect();
    let table_config = if global.quiet {
        TableConfig::for_pipe()
    } else {
        TableConfig::default()
    };
    TableFormatter::new(MARKING_COLUMNS, "marking")
        .with_config(table_config)
        .output(hits.into_iter().map(marking_row), format, &visible)
}

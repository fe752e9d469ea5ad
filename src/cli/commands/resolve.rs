//! `chipdex resolve` command - Resolve a part number to one component family

use console::style;
use miette::Result;

use crate::cli::helpers::{effective_format, open_catalog, print_structured};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{FilterArgs, GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::entities::variant::OrderVariant;

#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// Component id, model, order code or any fragment of one
    pub text: String,

    #[command(flatten)]
    pub filters: FilterArgs,
}

pub(crate) const VARIANT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ORDER CODE", 24),
    ColumnDef::new("package", "PACKAGE", 14),
    ColumnDef::new("marking", "MARKING", 10),
    ColumnDef::new("lifecycle", "LIFECYCLE", 11),
    ColumnDef::new("stock", "STOCK", 9),
    ColumnDef::new("price", "PRICE", 9),
    ColumnDef::new("supplier", "SUPPLIER", 16),
];

/// Table row for a variant, priced at `qty`
pub(crate) fn variant_row(variant: &OrderVariant, qty: u32) -> TableRow {
    let offer = variant.best_offer(qty);
    TableRow::new(&variant.id)
        .cell("id", CellValue::Id(variant.id.clone()))
        .cell("package", CellValue::opt_text(variant.package.as_deref()))
        .cell("marking", CellValue::opt_text(variant.marking.as_deref()))
        .cell("lifecycle", CellValue::Lifecycle(variant.lifecycle))
        .cell(
            "stock",
            CellValue::Number(i64::try_from(variant.total_stock()).unwrap_or(i64::MAX)),
        )
        .cell(
            "price",
            offer.map_or(CellValue::Empty, |o| CellValue::Float(o.price, 4)),
        )
        .cell(
            "supplier",
            CellValue::opt_text(offer.map(|o| o.name.as_str())),
        )
}

/// Run the resolve command
pub fn run(args: ResolveArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let index = open_catalog(global, &config)?;
    let spec = args.filters.to_spec()?;

    let result = index.resolve_query(&args.text, Some(&spec));
    let format = effective_format(global, &config, OutputFormat::Tsv);
    if print_structured(&result, format)? {
        return Ok(());
    }

    let Some(component) = result.component else {
        if !global.quiet {
            println!("No match for '{}'.", style(&args.text).yellow());
        }
        return Ok(());
    };

    if !global.quiet && format != OutputFormat::Id {
        let kind = if result.exact_match {
            style("exact").green()
        } else {
            style("partial").yellow()
        };
        println!(
            "{} {} ({}) - {} match, {} alternative(s)",
            style(&component.id).cyan().bold(),
            component.manufacturer,
            component.category,
            kind,
            result.total_alternatives
        );
        println!();
    }

    if result.variants.is_empty() {
        if !global.quiet {
            println!("No order variants match the filters.");
        }
        return Ok(());
    }

    let visible: Vec<&str> = VARIANT_COLUMNS.iter().map(|c| c.key).collect();
    let table_config = if global.quiet {
        TableConfig::for_pipe()
    } else {
        TableConfig::default()
    };
    TableFormatter::new(VARIANT_COLUMNS, "variant")
        .with_config(table_config)
        .output(
            result.variants.iter().map(|v| variant_row(v, 1)),
            format,
            &visible,
        )
}

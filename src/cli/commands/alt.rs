//! `chipdex alt` command - Replacement parts for an order variant

use clap::ValueEnum;
use console::style;
use miette::Result;

use crate::cli::helpers::{effective_format, open_catalog, print_structured};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::{
    filter_alternatives, group_by_brand, group_by_tier, tier_counts, BrandFilter, TierFilter,
};
use crate::core::config::Config;
use crate::entities::alternative::AlternativeCandidate;

#[derive(clap::Args, Debug)]
pub struct AltArgs {
    /// Order variant id (e.g., TPS563201DDCR)
    pub variant: String,

    /// Only this tier (BOM2BOM, P2P, FUNCTIONAL, PACKAGE or ALL)
    #[arg(long, short = 't', default_value = "all")]
    pub tier: TierFilter,

    /// Only this brand category (SAME_BRAND, DOMESTIC, FOREIGN or ALL)
    #[arg(long, short = 'b', default_value = "all")]
    pub brand: BrandFilter,

    /// Print one table per group
    #[arg(long, short = 'g')]
    pub group: Option<GroupBy>,

    /// Show per-tier counts only
    #[arg(long)]
    pub summary: bool,
}

/// Grouping for alternative output
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum GroupBy {
    Tier,
    Brand,
}

const ALT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("part", "PART NUMBER", 22),
    ColumnDef::new("manufacturer", "MANUFACTURER", 16),
    ColumnDef::new("tier", "TIER", 10),
    ColumnDef::new("brand", "BRAND", 10),
    ColumnDef::new("score", "SCORE", 5),
    ColumnDef::new("package", "PACKAGE", 14),
    ColumnDef::new("lifecycle", "LIFECYCLE", 11),
];

fn alt_row(alt: &AlternativeCandidate) -> TableRow {
    TableRow::new(&alt.part_number)
        .cell("part", CellValue::Id(alt.part_number.clone()))
        .cell("manufacturer", CellValue::Text(alt.manufacturer.clone()))
        .cell("tier", CellValue::Tier(alt.tier))
        .cell("brand", CellValue::Brand(alt.brand))
        .cell("score", CellValue::Score(alt.score))
        .cell("package", CellValue::opt_text(alt.package.as_deref()))
        .cell("lifecycle", CellValue::Lifecycle(alt.lifecycle))
}

/// Run the alt command
pub fn run(args: AltArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let index = open_catalog(global, &config)?;

    let listed = index.list_alternatives(&args.variant);
    let candidates = filter_alternatives(&listed, args.tier, args.brand);
    let format = effective_format(global, &config, OutputFormat::Tsv);

    if args.summary {
        let counts = tier_counts(&candidates);
        if print_structured(&counts, format)? {
            return Ok(());
        }
        for (tier, count) in counts {
            println!("{:<12} {}", tier, style(count).cyan());
        }
        return Ok(());
    }

    if print_structured(&candidates, format)? {
        return Ok(());
    }

    if candidates.is_empty() {
        if !global.quiet {
            println!(
                "No alternatives for '{}' (tier {}, brand {}).",
                style(&args.variant).yellow(),
                args.tier,
                args.brand
            );
        }
        return Ok(());
    }

    let visible: Vec<&str> = ALT_COLUMNS.iter().map(|c| c.key).collect();
    let groups: Vec<(String, Vec<&AlternativeCandidate>)> = match args.group {
        None => vec![(String::new(), candidates)],
        Some(GroupBy::Tier) => group_by_tier(&candidates)
            .into_iter()
            .map(|(tier, list)| (tier.to_string(), list))
            .collect(),
        Some(GroupBy::Brand) => group_by_brand(&candidates)
            .into_iter()
            .map(|(brand, list)| (brand.to_string(), list))
            .collect(),
    };

    for (title, list) in groups {
        if !title.is_empty() && !global.quiet && format != OutputFormat::Id {
            println!("{}", style(&title).bold());
        }
        let table_config = if global.quiet {
            TableConfig::for_pipe()
        } else {
            TableConfig::default()
        };
        TableFormatter::new(ALT_COLUMNS, "alternative")
            .with_config(table_config)
            .output(list.into_iter().map(alt_row), format, &visible)?;
    }
    Ok(())
}

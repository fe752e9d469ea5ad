//! `chipdex search` command - Search the catalog
//!
//! Text matches model, description, manufacturer, tags and variant ids;
//! structured filters narrow the result. Output keeps catalog order.

use clap::ValueEnum;
use console::style;
use miette::Result;

use crate::cli::helpers::{effective_format, open_catalog, print_structured};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{FilterArgs, GlobalOpts, OutputFormat};
use crate::core::catalog::CatalogIndex;
use crate::core::config::Config;
use crate::core::filter::Facets;
use crate::entities::component::ComponentRecord;

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Search text (empty lists everything)
    pub text: Option<String>,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Columns to display (can specify multiple)
    #[arg(long, value_delimiter = ',', default_values_t = vec![
        ListColumn::Id,
        ListColumn::Manufacturer,
        ListColumn::Category,
        ListColumn::Lifecycle,
        ListColumn::Variants,
        ListColumn::Description
    ])]
    pub columns: Vec<ListColumn>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,

    /// Show manufacturer/package/lifecycle counts instead of rows
    #[arg(long)]
    pub facets: bool,
}

/// Columns to display in search output
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListColumn {
    Id,
    Model,
    Manufacturer,
    Category,
    Lifecycle,
    Variants,
    Tags,
    Description,
}

impl ListColumn {
    fn key(&self) -> &'static str {
        match self {
            ListColumn::Id => "id",
            ListColumn::Model => "model",
            ListColumn::Manufacturer => "manufacturer",
            ListColumn::Category => "category",
            ListColumn::Lifecycle => "lifecycle",
            ListColumn::Variants => "variants",
            ListColumn::Tags => "tags",
            ListColumn::Description => "description",
        }
    }
}

impl std::fmt::Display for ListColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

const COMPONENT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 20),
    ColumnDef::new("model", "MODEL", 20),
    ColumnDef::new("manufacturer", "MANUFACTURER", 16),
    ColumnDef::new("category", "CATEGORY", 28),
    ColumnDef::new("lifecycle", "LIFECYCLE", 11),
    ColumnDef::new("variants", "VARIANTS", 8),
    ColumnDef::new("tags", "TAGS", 20),
    ColumnDef::new("description", "DESCRIPTION", 48),
];

/// Run the search command
pub fn run(args: SearchArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let index = open_catalog(global, &config)?;
    let spec = args.filters.to_spec()?;
    let text = args.text.as_deref().unwrap_or("");

    let mut results = index.search_components(text, Some(&spec));
    tracing::debug!("{} components before limit", results.len());

    if args.facets {
        let facets = index.facets(&results);
        return print_facets(&facets, effective_format(global, &config, OutputFormat::Tsv));
    }

    if let Some(limit) = args.limit.or(config.limit) {
        results.truncate(limit);
    }

    if args.count {
        println!("{}", results.len());
        return Ok(());
    }

    let format = effective_format(global, &config, OutputFormat::Tsv);
    if print_structured(&results, format)? {
        return Ok(());
    }

    if results.is_empty() {
        if !global.quiet {
            println!("No components found for '{}'.", style(text).yellow());
        }
        return Ok(());
    }

    let rows = results.iter().map(|c| component_row(&index, c));
    let visible: Vec<&str> = args.columns.iter().map(ListColumn::key).collect();
    let table_config = if global.quiet {
        TableConfig::for_pipe()
    } else {
        TableConfig::default()
    };
    TableFormatter::new(COMPONENT_COLUMNS, "component")
        .with_config(table_config)
        .output(rows, format, &visible)
}

fn component_row(index: &CatalogIndex, cmp: &ComponentRecord) -> TableRow {
    TableRow::new(&cmp.id)
        .cell("id", CellValue::Id(cmp.id.clone()))
        .cell("model", CellValue::Text(cmp.model.clone()))
        .cell("manufacturer", CellValue::Text(cmp.manufacturer.clone()))
        .cell("category", CellValue::opt_text(Some(&cmp.category)))
        .cell("lifecycle", CellValue::Lifecycle(cmp.lifecycle))
        .cell(
            "variants",
            CellValue::Number(index.variants_of(cmp).len() as i64),
        )
        .cell("tags", CellValue::Tags(cmp.tags.clone()))
        .cell("description", CellValue::opt_text(Some(&cmp.description)))
}

fn print_facets(facets: &Facets, format: OutputFormat) -> Result<()> {
    if print_structured(facets, format)? {
        return Ok(());
    }
    let groups = [
        ("Manufacturers", &facets.manufacturers),
        ("Packages", &facets.packages),
        ("Lifecycle", &facets.lifecycles),
    ];
    for (title, counts) in groups {
        println!("{}", style(title).bold());
        for facet in counts {
            println!("  {:<24} {:>5}", facet.value, style(facet.count).cyan());
        }
    }
    Ok(())
}

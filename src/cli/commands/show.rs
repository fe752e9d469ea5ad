//! `chipdex show` command - A component with its variants and offers

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::commands::resolve::{variant_row, VARIANT_COLUMNS};
use crate::cli::helpers::{effective_format, open_catalog, print_structured};
use crate::cli::table::{TableConfig, TableFormatter};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::entities::component::{Attribute, ComponentRecord, Flag};
use crate::entities::variant::OrderVariant;

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Component id, order variant id or model
    pub id: String,

    /// Order quantity used to pick the best offer
    #[arg(long, default_value_t = 1)]
    pub qty: u32,
}

#[derive(Serialize)]
struct ShowOutput<'a> {
    component: &'a ComponentRecord,
    variants: Vec<&'a OrderVariant>,
}

/// Run the show command
pub fn run(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let index = open_catalog(global, &config)?;

    let component = index
        .by_id(&args.id)
        .or_else(|| index.variant(&args.id).and_then(|v| index.owner_of(v)))
        .or_else(|| index.by_model_exact(&args.id).first().copied())
        .ok_or_else(|| {
            miette::miette!(
                code = "chipdex::cli::not_found",
                help = "use `chipdex resolve` for partial part numbers",
                "no component or order variant with id '{}'",
                args.id
            )
        })?;
    let variants = index.variants_of(component);

    let format = effective_format(global, &config, OutputFormat::Yaml);
    let output = ShowOutput {
        component,
        variants: variants.clone(),
    };
    if print_structured(&output, format)? {
        return Ok(());
    }

    if format != OutputFormat::Id {
        print_component(component);
        println!();
    }

    let visible: Vec<&str> = VARIANT_COLUMNS.iter().map(|c| c.key).collect();
    TableFormatter::new(VARIANT_COLUMNS, "variant")
        .with_config(TableConfig::for_pipe())
        .output(
            variants.iter().map(|v| variant_row(v, args.qty)),
            format,
            &visible,
        )
}

fn print_component(cmp: &ComponentRecord) {
    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&cmp.id).cyan());
    println!("{}: {}", style("Model").bold(), cmp.model);
    println!("{}: {}", style("Manufacturer").bold(), cmp.manufacturer);
    println!("{}: {}", style("Category").bold(), cmp.category);
    println!("{}: {}", style("Lifecycle").bold(), cmp.lifecycle);
    println!("{}", style("─".repeat(60)).dim());

    if !cmp.description.is_empty() {
        println!();
        println!("{}", cmp.description);
    }

    let ranges = [
        ("Voltage", Attribute::VoltageMin, Attribute::VoltageMax),
        ("Current", Attribute::CurrentMin, Attribute::CurrentMax),
    ];
    for (label, lo, hi) in ranges {
        let (lo, hi) = (cmp.attribute(lo), cmp.attribute(hi));
        if lo.is_some() || hi.is_some() {
            println!(
                "{}: {} .. {}",
                style(label).bold(),
                lo.map_or("?".to_string(), ToString::to_string),
                hi.map_or("?".to_string(), ToString::to_string)
            );
        }
    }

    let interfaces = cmp.interfaces();
    if !interfaces.is_empty() {
        println!("{}: {}", style("Interfaces").bold(), interfaces.join(", "));
    }

    let flags: Vec<String> = Flag::all()
        .iter()
        .filter(|f| f.is_set(&cmp.flags))
        .map(ToString::to_string)
        .collect();
    if !flags.is_empty() {
        println!("{}: {}", style("Flags").bold(), flags.join(", "));
    }
    if !cmp.tags.is_empty() {
        println!("{}: {}", style("Tags").bold(), cmp.tags.join(", "));
    }

    if !cmp.parameters.is_empty() {
        println!();
        println!("{}", style("Parameters").bold());
        for (key, value) in &cmp.parameters {
            println!("  {:<28} {}", key, value);
        }
    }
}

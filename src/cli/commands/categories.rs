//! `chipdex categories` command - Show the category tree

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{effective_format, open_catalog, print_structured};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::CatalogIndex;
use crate::core::config::Config;
use crate::core::selector::CategorySelector;
use crate::entities::category::{find, CategoryNode};

#[derive(clap::Args, Debug)]
pub struct CategoriesArgs {
    /// Start below this path (e.g., "Power/DC-DC")
    pub path: Option<String>,

    /// Maximum depth to print
    #[arg(long, short = 'd')]
    pub depth: Option<usize>,
}

/// A tree node with its component count, for structured output
#[derive(Debug, Serialize)]
struct CountedNode {
    name: String,
    path: String,
    count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<CountedNode>,
}

fn count_tree(
    index: &CatalogIndex,
    nodes: &[CategoryNode],
    parent: &str,
    depth_left: Option<usize>,
) -> Vec<CountedNode> {
    if depth_left == Some(0) {
        return Vec::new();
    }
    nodes
        .iter()
        .map(|node| {
            let path = if parent.is_empty() {
                node.name.clone()
            } else {
                format!("{}/{}", parent, node.name)
            };
            CountedNode {
                count: index.count_in_category(&path),
                children: count_tree(index, &node.children, &path, depth_left.map(|d| d - 1)),
                name: node.name.clone(),
                path,
            }
        })
        .collect()
}

fn print_tree(nodes: &[CountedNode], indent: usize) {
    for node in nodes {
        println!(
            "{}{} {}",
            "  ".repeat(indent),
            node.name,
            style(format!("({})", node.count)).dim()
        );
        print_tree(&node.children, indent + 1);
    }
}

/// Run the categories command
pub fn run(args: CategoriesArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let index = open_catalog(global, &config)?;

    // Walk to the starting node through the selector so bad paths are reported
    let full_tree = index.category_tree();
    let mut selector = CategorySelector::with_tree(full_tree.clone());
    if let Some(path) = args.path.as_deref() {
        selector.select_path(path)?;
    }
    let parent = selector.category_path().unwrap_or_default();
    let roots: Vec<CategoryNode> = if parent.is_empty() {
        full_tree
    } else {
        find(&full_tree, &selector.path())
            .map(|node| node.children.clone())
            .unwrap_or_default()
    };

    let tree = count_tree(&index, &roots, &parent, args.depth);
    let format = effective_format(global, &config, OutputFormat::Tsv);
    if print_structured(&tree, format)? {
        return Ok(());
    }

    if tree.is_empty() {
        if !global.quiet {
            println!("No categories below '{}'.", style(&parent).yellow());
        }
        return Ok(());
    }
    print_tree(&tree, 0);
    Ok(())
}

//! Table formatting utilities for CLI list commands
//!
//! Commands build [`TableRow`]s of typed [`CellValue`]s once and the
//! formatter renders them as aligned coloured text (TSV), CSV, Markdown or
//! bare ids.

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::truncate_str;
use crate::cli::OutputFormat;
use crate::core::entity::Lifecycle;
use crate::entities::alternative::{BrandCategory, CompatibilityScore, Tier};

/// Configuration for table output
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Show summary line after table (e.g., "5 component(s) found")
    pub show_summary: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { show_summary: true }
    }
}

impl TableConfig {
    /// Create config optimized for piping (no summary)
    pub fn for_pipe() -> Self {
        Self {
            show_summary: false,
        }
    }
}

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Record id (cyan)
    Id(String),
    /// Plain text, truncated to the column width
    Text(String),
    /// Lifecycle status with color coding
    Lifecycle(Lifecycle),
    /// Alternative tier with color coding
    Tier(Tier),
    /// Brand category
    Brand(BrandCategory),
    /// Compatibility score with color coding (>=90 green, >=70 yellow)
    Score(CompatibilityScore),
    /// Integer value, right aligned
    Number(i64),
    /// Float value with precision
    Float(f64, usize),
    /// Tags/labels as comma-separated
    Tags(Vec<String>),
    /// Empty/placeholder
    Empty,
}

impl CellValue {
    /// Text when present, otherwise [`CellValue::Empty`]
    pub fn opt_text(value: Option<&str>) -> Self {
        match value {
            Some(s) if !s.is_empty() => CellValue::Text(s.to_string()),
            _ => CellValue::Empty,
        }
    }

    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => {
                format!("{:<width$}", style(truncate_str(id, width)).cyan(), width = width)
            }
            CellValue::Text(s) => {
                format!("{:<width$}", truncate_str(s, width), width = width)
            }
            CellValue::Lifecycle(lifecycle) => {
                let s = lifecycle.to_string();
                let styled = match lifecycle {
                    Lifecycle::Active => style(s).green(),
                    Lifecycle::Preliminary => style(s).cyan(),
                    Lifecycle::Nrnd => style(s).yellow(),
                    Lifecycle::Eol | Lifecycle::Obsolete => style(s).red().dim(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Tier(tier) => {
                let s = tier.to_string();
                let styled = match tier {
                    Tier::Bom2Bom => style(s).green().bold(),
                    Tier::P2P => style(s).green(),
                    Tier::Functional => style(s).yellow(),
                    Tier::Package => style(s).dim(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Brand(brand) => {
                format!("{:<width$}", brand.to_string(), width = width)
            }
            CellValue::Score(score) => {
                let s = score.to_string();
                let styled = if score.value() >= 90 {
                    style(s).green()
                } else if score.value() >= 70 {
                    style(s).yellow()
                } else {
                    style(s).red()
                };
                format!("{:>width$}", styled, width = width)
            }
            CellValue::Number(n) => format!("{:>width$}", n, width = width),
            CellValue::Float(f, precision) => {
                format!("{:>width$.prec$}", f, width = width, prec = precision)
            }
            CellValue::Tags(tags) => {
                format!("{:<width$}", truncate_str(&tags.join(", "), width), width = width)
            }
            CellValue::Empty => format!("{:<width$}", style("-").dim(), width = width),
        }
    }

    /// Get raw string value (no formatting)
    pub fn raw(&self) -> String {
        match self {
            CellValue::Id(s) | CellValue::Text(s) => s.clone(),
            CellValue::Lifecycle(lifecycle) => lifecycle.to_string(),
            CellValue::Tier(tier) => tier.to_string(),
            CellValue::Brand(brand) => brand.to_string(),
            CellValue::Score(score) => score.to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Float(f, precision) => format!("{:.prec$}", f, prec = precision),
            CellValue::Tags(tags) => tags.join(", "),
            CellValue::Empty => String::new(),
        }
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        match self {
            CellValue::Empty => "-".to_string(),
            other => other.raw().replace('|', "\\|"),
        }
    }

    /// Display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Empty => 1,
            other => other.raw().chars().count(),
        }
    }
}

/// Column definition with header label and maximum width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A row of cell values for table output
#[derive(Debug, Clone)]
pub struct TableRow {
    pub id: String,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Table formatter that renders rows in various formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    record_name: &'static str,
    config: TableConfig,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], record_name: &'static str) -> Self {
        Self {
            columns,
            record_name,
            config: TableConfig::default(),
        }
    }

    /// Configure the formatter with custom settings
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Print rows in the specified format
    pub fn output<I>(&self, rows: I, format: OutputFormat, visible_columns: &[&str]) -> Result<()>
    where
        I: IntoIterator<Item = TableRow>,
    {
        let rows: Vec<TableRow> = rows.into_iter().collect();
        print!("{}", self.render(&rows, format, visible_columns)?);
        Ok(())
    }

    /// Render rows to a string in the specified format
    pub fn render(
        &self,
        rows: &[TableRow],
        format: OutputFormat,
        visible_columns: &[&str],
    ) -> Result<String> {
        let columns: Vec<&ColumnDef> = self
            .columns
            .iter()
            .filter(|c| visible_columns.contains(&c.key))
            .collect();

        match format {
            OutputFormat::Csv => render_csv(rows, &columns),
            OutputFormat::Md => Ok(render_md(rows, &columns)),
            OutputFormat::Id => Ok(rows.iter().map(|r| format!("{}\n", r.id)).collect()),
            _ => Ok(self.render_tsv(rows, &columns)),
        }
    }

    /// Calculate column widths from content, capped at each column's maximum
    fn calculate_widths(&self, rows: &[TableRow], columns: &[&ColumnDef]) -> Vec<usize> {
        columns
            .iter()
            .map(|col| {
                let max_content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(CellValue::display_width)
                    .max()
                    .unwrap_or(0);
                col.header.len().max(max_content).min(col.width)
            })
            .collect()
    }

    fn render_tsv(&self, rows: &[TableRow], columns: &[&ColumnDef]) -> String {
        let widths = self.calculate_widths(rows, columns);
        let mut out = String::new();

        let header: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<width$}", style(col.header).bold(), width = *w))
            .collect();
        out.push_str(header.join(" ").trim_end());
        out.push('\n');

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total_width));
        out.push('\n');

        for row in rows {
            let parts: Vec<String> = columns
                .iter()
                .zip(&widths)
                .map(|(col, w)| match row.get(col.key) {
                    Some(value) => value.format_tsv(*w),
                    None => CellValue::Empty.format_tsv(*w),
                })
                .collect();
            out.push_str(parts.join(" ").trim_end());
            out.push('\n');
        }

        if self.config.show_summary {
            out.push('\n');
            out.push_str(&format!(
                "{} {}(s) found.\n",
                style(rows.len()).cyan(),
                self.record_name
            ));
        }
        out
    }
}

fn render_csv(rows: &[TableRow], columns: &[&ColumnDef]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(columns.iter().map(|c| c.key))
        .into_diagnostic()?;
    for row in rows {
        writer
            .write_record(
                columns
                    .iter()
                    .map(|c| row.get(c.key).map(CellValue::raw).unwrap_or_default()),
            )
            .into_diagnostic()?;
    }
    let bytes = writer.into_inner().into_diagnostic()?;
    String::from_utf8(bytes).into_diagnostic()
}

fn render_md(rows: &[TableRow], columns: &[&ColumnDef]) -> String {
    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.header.to_string()));
    for row in rows {
        builder.push_record(columns.iter().map(|c| {
            row.get(c.key)
                .map(CellValue::format_md)
                .unwrap_or_else(|| "-".to_string())
        }));
    }
    format!("{}\n", builder.build().with(Style::markdown()))
}

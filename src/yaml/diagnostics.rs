//! Snapshot parse diagnostics with source locations

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Parse error in a catalog snapshot, pointing at the offending line
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(chipdex::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl YamlSyntaxError {
    /// Build from a serde_yml error
    pub fn from_yaml_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));
        Self::at_location(err.to_string(), source, filename, line, column)
    }

    /// Build from a serde_json error
    pub fn from_json_error(err: &serde_json::Error, source: &str, filename: &str) -> Self {
        Self::at_location(err.to_string(), source, filename, err.line().max(1), err.column().max(1))
    }

    fn at_location(
        message: String,
        source: &str,
        filename: &str,
        line: usize,
        column: usize,
    ) -> Self {
        let offset = line_col_to_offset(source, line, column);
        let help = generate_help(&message);
        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Byte offset of a 1-based line/column, clamped to the source length
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum::<usize>();
    let line_text = source[line_start.min(source.len())..]
        .split('\n')
        .next()
        .unwrap_or("");
    let col_offset = line_text
        .char_indices()
        .nth(column.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(line_text.len());
    (line_start + col_offset).min(source.len())
}

/// Suggest a fix for common snapshot mistakes
fn generate_help(message: &str) -> Option<String> {
    let msg = message.to_lowercase();

    if msg.contains("unknown variant") && msg.contains("bom2bom") {
        return Some("tier must be one of BOM2BOM, P2P, FUNCTIONAL, PACKAGE".to_string());
    }
    if msg.contains("unknown variant") && msg.contains("same_brand") {
        return Some("brand must be one of SAME_BRAND, DOMESTIC, FOREIGN".to_string());
    }
    if msg.contains("unknown variant") && msg.contains("nrnd") {
        return Some("lifecycle must be one of ACTIVE, EOL, NRND, PRELIMINARY, OBSOLETE".to_string());
    }
    if msg.contains("compatibility score") {
        return Some("score is a whole number from 0 to 100".to_string());
    }
    if msg.contains("missing field") {
        return Some("add the missing field to the record".to_string());
    }
    if msg.contains("tab") {
        return Some("YAML indentation must use spaces, not tabs".to_string());
    }
    if msg.contains("mapping values are not allowed") {
        return Some("check indentation or add a space after ':'".to_string());
    }
    if msg.contains("duplicate key") {
        return Some("each key may appear only once per record".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_to_offset() {
        let source = "line1\nline2\nline3";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 6);
        assert_eq!(line_col_to_offset(source, 3, 3), 14);
        assert_eq!(line_col_to_offset(source, 9, 9), source.len());
    }

    #[test]
    fn test_help_for_catalog_values() {
        assert!(generate_help("tier: unknown variant `PIN2PIN`, expected one of `BOM2BOM`, `P2P`")
            .is_some());
        assert!(generate_help("compatibility score 140 is outside 0..=100").is_some());
        assert!(generate_help("something else").is_none());
    }

    #[test]
    fn test_from_yaml_error_carries_message() {
        let source = "components:\n  - id: [unclosed\n";
        let err = serde_yml::from_str::<serde_yml::Value>(source).unwrap_err();
        let diag = YamlSyntaxError::from_yaml_error(&err, source, "catalog.yaml");
        assert!(!diag.message().is_empty());
    }
}

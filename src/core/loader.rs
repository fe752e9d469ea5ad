//! Catalog snapshot loading
//!
//! A snapshot is either a single YAML/JSON document or a directory tree of
//! such documents. Directory contents are merged in file-name order so the
//! resulting snapshot (and therefore "first match" behavior) is stable.

use miette::Diagnostic;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::catalog::{CatalogData, CatalogError, CatalogIndex};
use crate::yaml::YamlSyntaxError;

/// Serialization format of a snapshot document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Yaml,
    Json,
}

impl SnapshotFormat {
    /// Format implied by a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "yaml" | "yml" => Some(SnapshotFormat::Yaml),
            "json" => Some(SnapshotFormat::Json),
            _ => None,
        }
    }
}

/// Errors raised while reading a snapshot
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("catalog not found: {}", .0.display())]
    #[diagnostic(
        code(chipdex::load::not_found),
        help("pass --catalog <PATH> or set CHIPDEX_CATALOG")
    )]
    NotFound(PathBuf),

    #[error("unsupported catalog file: {}", .0.display())]
    #[diagnostic(
        code(chipdex::load::format),
        help("catalog files must end in .yaml, .yml or .json")
    )]
    UnsupportedFormat(PathBuf),

    #[error("failed to read {}", path.display())]
    #[diagnostic(code(chipdex::load::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),
}

/// Parse one snapshot document
pub fn parse_snapshot(
    content: &str,
    filename: &str,
    format: SnapshotFormat,
) -> Result<CatalogData, LoadError> {
    if content.trim().is_empty() {
        return Ok(CatalogData::default());
    }
    let data = match format {
        SnapshotFormat::Yaml => serde_yml::from_str(content)
            .map_err(|e| YamlSyntaxError::from_yaml_error(&e, content, filename))?,
        SnapshotFormat::Json => serde_json::from_str(content)
            .map_err(|e| YamlSyntaxError::from_json_error(&e, content, filename))?,
    };
    Ok(data)
}

fn read_snapshot_file(path: &Path) -> Result<CatalogData, LoadError> {
    let format =
        SnapshotFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat(path.into()))?;
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.into(),
        source,
    })?;
    debug!("Parsing {}", path.display());
    parse_snapshot(&content, &path.display().to_string(), format)
}

/// Snapshot files below `dir`, sorted by path
fn snapshot_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| LoadError::Io {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.into()),
            source: e.into(),
        })?;
        if entry.file_type().is_file() && SnapshotFormat::from_path(entry.path()).is_some() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Read the raw snapshot at `path` (file or directory)
pub fn load_catalog_data(path: &Path) -> Result<CatalogData, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.into()));
    }
    if path.is_file() {
        return read_snapshot_file(path);
    }

    let mut data = CatalogData::default();
    let files = snapshot_files(path)?;
    for file in &files {
        data.extend(read_snapshot_file(file)?);
    }
    debug!("Merged {} snapshot files from {}", files.len(), path.display());
    Ok(data)
}

/// Read and index the snapshot at `path`
pub fn load_catalog(path: &Path) -> Result<CatalogIndex, LoadError> {
    info!("Loading catalog from {}", path.display());
    let data = load_catalog_data(path)?;
    Ok(CatalogIndex::build(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const COMPONENTS: &str = r#"
components:
  - id: TPS563201
    model: TPS563201
    manufacturer: TI
    category: Power/DC-DC/Buck
variants:
  - id: TPS563201DDCR
    component: TPS563201
    package: SOT-23-6
"#;

    const ALTERNATIVES: &str = r#"
alternatives:
  - id: ALT-1
    source: TPS563201DDCR
    part_number: SY8089
    manufacturer: Silergy
    tier: P2P
    brand: DOMESTIC
    score: 85
"#;

    #[test]
    fn test_load_single_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.yaml");
        fs::write(&path, COMPONENTS).unwrap();

        let index = load_catalog(&path).unwrap();
        assert_eq!(index.stats().components, 1);
        assert_eq!(index.stats().variants, 1);
    }

    #[test]
    fn test_load_directory_merges_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a-components.yaml"), COMPONENTS).unwrap();
        fs::create_dir(dir.path().join("alts")).unwrap();
        fs::write(dir.path().join("alts").join("b.yml"), ALTERNATIVES).unwrap();
        fs::write(dir.path().join("README.md"), "# not a snapshot").unwrap();

        let index = load_catalog(dir.path()).unwrap();
        assert_eq!(index.list_alternatives("TPS563201DDCR").len(), 1);
    }

    #[test]
    fn test_load_json_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"{"components":[{"id":"LM1117","model":"LM1117","manufacturer":"TI","category":"Power/LDO"}]}"#,
        )
        .unwrap();
        let index = load_catalog(&path).unwrap();
        assert!(index.by_id("lm1117").is_some());
    }

    #[test]
    fn test_missing_path() {
        let err = load_catalog(Path::new("/nonexistent/catalog.yaml")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        fs::write(&path, "x = 1").unwrap();
        assert!(matches!(
            load_catalog_data(&path),
            Err(LoadError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_bad_tier_is_a_syntax_error() {
        let bad = ALTERNATIVES.replace("tier: P2P", "tier: PIN2PIN");
        let err = parse_snapshot(&bad, "alts.yaml", SnapshotFormat::Yaml).unwrap_err();
        assert!(matches!(err, LoadError::Syntax(_)));
    }

    #[test]
    fn test_orphan_variant_is_a_catalog_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.yaml");
        fs::write(
            &path,
            "variants:\n  - id: X1\n    component: MISSING\n",
        )
        .unwrap();
        assert!(matches!(
            load_catalog(&path),
            Err(LoadError::Catalog(CatalogError::UnknownOwner { .. }))
        ));
    }

    #[test]
    fn test_empty_file_is_empty_snapshot() {
        let data = parse_snapshot("  \n", "empty.yaml", SnapshotFormat::Yaml).unwrap();
        assert!(data.is_empty());
    }
}

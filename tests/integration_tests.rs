//! Integration tests for the chipdex CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CATALOG: &str = r#"
components:
  - id: TPS563201
    model: TPS563201
    manufacturer: TI
    category: Power/DC-DC/Buck
    description: 4.5V to 17V input, 3A synchronous step-down converter
    parameters:
      Input Voltage Min: 4.5
      Input Voltage Max: 17
      Output Current: 3
    tags: [buck, dc-dc]
  - id: LM1117
    model: LM1117
    manufacturer: TI
    category: Power/LDO
    description: 800mA low-dropout linear regulator
    lifecycle: NRND
  - id: STM32F411
    model: STM32F411
    manufacturer: ST
    category: MCU/ARM
    description: Cortex-M4 MCU with 512KB flash
    parameters:
      Interface: I2C/SPI/USB
      Supply Voltage Min: 1.7
      Supply Voltage Max: 3.6
    flags:
      automotive: true

variants:
  - id: TPS563201DDCR
    component: TPS563201
    package: SOT-23-6
    marking: "3201"
    offers:
      - name: Mouser
        price: 0.42
        stock: 1200
      - name: LCSC
        price: 0.18
        stock: 300
  - id: TPS563201DDCT
    component: TPS563201
    package: SOT-23-6
  - id: LM1117IMPX-3.3
    component: LM1117
    package: SOT-223
  - id: STM32F411CEU6
    component: STM32F411
    package: UFQFPN-48

alternatives:
  - id: ALT-1
    source: TPS563201DDCR
    part_number: SY8089
    manufacturer: Silergy
    tier: P2P
    brand: DOMESTIC
    score: 85
  - id: ALT-2
    source: TPS563201DDCR
    part_number: TPS563200DDCR
    manufacturer: TI
    tier: BOM2BOM
    brand: SAME_BRAND
    score: 100
  - id: ALT-3
    source: TPS563201DDCR
    part_number: MP2359
    manufacturer: MPS
    tier: P2P
    brand: FOREIGN
    score: 92
  - id: ALT-4
    source: TPS563201DDCR
    part_number: AP3417
    manufacturer: Diodes
    tier: FUNCTIONAL
    brand: FOREIGN
    score: 70

silkscreen:
  - marking: "33201"
    target: LM1117IMPX-3.3
    alternate_markings: [L17]
  - marking: "3201"
    target: TPS563201DDCR
    manufacturer: TI
"#;

/// Temp directory holding `catalog.yaml`
fn setup_catalog() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("catalog.yaml"), CATALOG).unwrap();
    tmp
}

/// A chipdex command isolated from the caller's environment
fn chipdex(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("chipdex").unwrap();
    cmd.current_dir(tmp.path())
        .env_remove("CHIPDEX_CATALOG")
        .env_remove("CHIPDEX_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

/// A chipdex command pointed at the temp catalog
fn chipdex_with_catalog(tmp: &TempDir) -> Command {
    let mut cmd = chipdex(tmp);
    cmd.arg("--catalog").arg(tmp.path().join("catalog.yaml"));
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn json_of(cmd: &mut Command) -> serde_json::Value {
    serde_json::from_str(&stdout_of(cmd)).unwrap()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    chipdex(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("marking"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    chipdex(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("chipdex"));
}

#[test]
fn test_missing_catalog_is_reported() {
    let tmp = TempDir::new().unwrap();
    chipdex(&tmp)
        .args(["search", "TPS"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no catalog configured"));
}

#[test]
fn test_nonexistent_catalog_path_fails() {
    let tmp = TempDir::new().unwrap();
    chipdex(&tmp)
        .args(["--catalog", "missing.yaml", "search"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.yaml"));
}

#[test]
fn test_catalog_from_env_var() {
    let tmp = setup_catalog();
    chipdex(&tmp)
        .env("CHIPDEX_CATALOG", tmp.path().join("catalog.yaml"))
        .args(["search", "--count"])
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn test_catalog_from_local_config() {
    let tmp = setup_catalog();
    fs::write(tmp.path().join(".chipdex.yaml"), "catalog: catalog.yaml\n").unwrap();
    chipdex(&tmp)
        .args(["search", "--count"])
        .assert()
        .success()
        .stdout("3\n");
}

// ============================================================================
// Resolve Tests
// ============================================================================

#[test]
fn test_resolve_component_id_returns_all_variants() {
    let tmp = setup_catalog();
    let value = json_of(chipdex_with_catalog(&tmp).args(["-f", "json", "resolve", "TPS563201"]));
    assert_eq!(value["exact_match"], true);
    assert_eq!(value["stage"], "exact_component");
    assert_eq!(value["component"]["id"], "TPS563201");
    assert_eq!(value["variants"].as_array().unwrap().len(), 2);
    assert_eq!(value["total_alternatives"], 4);
}

#[test]
fn test_resolve_order_code_returns_only_that_variant() {
    let tmp = setup_catalog();
    let value = json_of(chipdex_with_catalog(&tmp).args(["-f", "json", "resolve", "tps563201ddcr"]));
    assert_eq!(value["exact_match"], true);
    assert_eq!(value["component"]["id"], "TPS563201");
    let variants = value["variants"].as_array().unwrap();
    assert_eq!(variants.len(), 1);
    assert_eq!(variants[0]["id"], "TPS563201DDCR");
}

#[test]
fn test_resolve_fragment_is_partial_match() {
    let tmp = setup_catalog();
    chipdex_with_catalog(&tmp)
        .args(["resolve", "tps563"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TPS563201"))
        .stdout(predicate::str::contains("partial match"))
        .stdout(predicate::str::contains("TPS563201DDCT"));
}

#[test]
fn test_resolve_no_match() {
    let tmp = setup_catalog();
    chipdex_with_catalog(&tmp)
        .args(["resolve", "XYZ999"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No match"));

    let value = json_of(chipdex_with_catalog(&tmp).args(["-f", "json", "resolve", "XYZ999"]));
    assert!(value["component"].is_null());
    assert_eq!(value["exact_match"], false);
}

#[test]
fn test_resolve_with_package_filter_keeps_component() {
    let tmp = setup_catalog();
    let value = json_of(chipdex_with_catalog(&tmp).args([
        "-f",
        "json",
        "resolve",
        "TPS563201",
        "--package",
        "QFN-16",
    ]));
    assert_eq!(value["component"]["id"], "TPS563201");
    assert!(value["variants"].as_array().unwrap().is_empty());
    assert_eq!(value["total_alternatives"], 0);
}

// ============================================================================
// Alternative Tests
// ============================================================================

#[test]
fn test_alt_lists_strongest_tier_first() {
    let tmp = setup_catalog();
    let value = json_of(chipdex_with_catalog(&tmp).args(["-f", "json", "alt", "TPS563201DDCR"]));
    let list = value.as_array().unwrap();
    assert_eq!(list.len(), 4);
    assert_eq!(list[0]["part_number"], "TPS563200DDCR");
    assert_eq!(list[0]["tier"], "BOM2BOM");
    assert_eq!(list[0]["brand"], "SAME_BRAND");
    assert_eq!(list[0]["score"], 100);
    assert_eq!(list[1]["part_number"], "MP2359");
    assert_eq!(list[3]["tier"], "FUNCTIONAL");
}

#[test]
fn test_alt_tier_filter() {
    let tmp = setup_catalog();
    let out = stdout_of(chipdex_with_catalog(&tmp).args(["-f", "id", "alt", "TPS563201DDCR", "--tier", "P2P"]));
    let parts: Vec<&str> = out.lines().collect();
    assert_eq!(parts, vec!["MP2359", "SY8089"]);
}

#[test]
fn test_alt_brand_filter() {
    let tmp = setup_catalog();
    let out = stdout_of(chipdex_with_catalog(&tmp).args([
        "-f",
        "id",
        "alt",
        "TPS563201DDCR",
        "--brand",
        "FOREIGN",
    ]));
    let parts: Vec<&str> = out.lines().collect();
    assert_eq!(parts, vec!["MP2359", "AP3417"]);
}

#[test]
fn test_alt_summary_counts_every_tier() {
    let tmp = setup_catalog();
    let value = json_of(chipdex_with_catalog(&tmp).args([
        "-f",
        "json",
        "alt",
        "TPS563201DDCR",
        "--summary",
    ]));
    assert_eq!(value["BOM2BOM"], 1);
    assert_eq!(value["P2P"], 2);
    assert_eq!(value["FUNCTIONAL"], 1);
    assert_eq!(value["PACKAGE"], 0);
}

#[test]
fn test_alt_rejects_unknown_tier() {
    let tmp = setup_catalog();
    chipdex_with_catalog(&tmp)
        .args(["alt", "TPS563201DDCR", "--tier", "CLOSE"])
        .assert()
        .failure();
}

#[test]
fn test_alt_unknown_variant_is_empty() {
    let tmp = setup_catalog();
    chipdex_with_catalog(&tmp)
        .args(["alt", "NOPE123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No alternatives"));
}

// ============================================================================
// Marking Tests
// ============================================================================

#[test]
fn test_marking_exact_before_substring() {
    let tmp = setup_catalog();
    let out = stdout_of(chipdex_with_catalog(&tmp).args(["-f", "json", "marking", "3201"]));
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let list = value.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["marking"], "3201");
    assert_eq!(list[0]["target"], "TPS563201DDCR");
    assert_eq!(list[1]["marking"], "33201");
}

#[test]
fn test_marking_alternate() {
    let tmp = setup_catalog();
    chipdex_with_catalog(&tmp)
        .args(["marking", "l17"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LM1117IMPX-3.3"));
}

// ============================================================================
// Search Tests
// ============================================================================

#[test]
fn test_search_text_matches_description() {
    let tmp = setup_catalog();
    chipdex_with_catalog(&tmp)
        .args(["-f", "id", "search", "low-dropout"])
        .assert()
        .success()
        .stdout("LM1117\n");
}

#[test]
fn test_search_manufacturer_filter() {
    let tmp = setup_catalog();
    chipdex_with_catalog(&tmp)
        .args(["-f", "id", "search", "--manufacturer", "ST"])
        .assert()
        .success()
        .stdout("STM32F411\n");
}

#[test]
fn test_search_category_prefix() {
    let tmp = setup_catalog();
    chipdex_with_catalog(&tmp)
        .args(["search", "--category", "Power", "--count"])
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn test_search_interface_and_flag() {
    let tmp = setup_catalog();
    chipdex_with_catalog(&tmp)
        .args(["-f", "id", "search", "--interface", "SPI", "--require", "automotive"])
        .assert()
        .success()
        .stdout("STM32F411\n");
}

#[test]
fn test_search_voltage_range() {
    let tmp = setup_catalog();
    chipdex_with_catalog(&tmp)
        .args(["-f", "id", "search", "--voltage-min", "12"])
        .assert()
        .success()
        .stdout("TPS563201\n");
}

#[test]
fn test_search_lifecycle_filter() {
    let tmp = setup_catalog();
    chipdex_with_catalog(&tmp)
        .args(["-f", "id", "search", "--lifecycle", "nrnd"])
        .assert()
        .success()
        .stdout("LM1117\n");
}

#[test]
fn test_search_limit() {
    let tmp = setup_catalog();
    chipdex_with_catalog(&tmp)
        .args(["-f", "id", "search", "--limit", "1"])
        .assert()
        .success()
        .stdout("TPS563201\n");
}

#[test]
fn test_search_facets() {
    let tmp = setup_catalog();
    let value = json_of(chipdex_with_catalog(&tmp).args(["-f", "json", "search", "--facets"]));
    let manufacturers = value["manufacturers"].as_array().unwrap();
    assert!(manufacturers
        .iter()
        .any(|f| f["value"] == "TI" && f["count"] == 2));
}

#[test]
fn test_search_no_results() {
    let tmp = setup_catalog();
    chipdex_with_catalog(&tmp)
        .args(["search", "flux capacitor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No components found"));
}

// ============================================================================
// Categories and Show Tests
// ============================================================================

#[test]
fn test_categories_tree_with_counts() {
    let tmp = setup_catalog();
    chipdex_with_catalog(&tmp)
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("Power"))
        .stdout(predicate::str::contains("(2)"))
        .stdout(predicate::str::contains("Buck"));
}

#[test]
fn test_categories_below_path() {
    let tmp = setup_catalog();
    let value = json_of(chipdex_with_catalog(&tmp).args(["-f", "json", "categories", "Power"]));
    let names: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"DC-DC"));
    assert!(names.contains(&"LDO"));
    assert!(!names.contains(&"ARM"));
}

#[test]
fn test_categories_unknown_path_fails() {
    let tmp = setup_catalog();
    chipdex_with_catalog(&tmp)
        .args(["categories", "Analog"])
        .assert()
        .failure();
}

#[test]
fn test_categories_path_deeper_than_three_levels_fails() {
    let tmp = setup_catalog();
    chipdex_with_catalog(&tmp)
        .args(["categories", "Power/DC-DC/Buck/Sync"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("4 levels"));
}

#[test]
fn test_category_filter_matches_whole_segments() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("catalog.yaml"),
        r#"
components:
  - id: A
    model: A
    manufacturer: X
    category: "Power / LDO"
  - id: B
    model: B
    manufacturer: X
    category: PowerMgmt/PMIC
  - id: C
    model: C
    manufacturer: X
    category: Power/Buck
"#,
    )
    .unwrap();
    chipdex_with_catalog(&tmp)
        .args(["-f", "id", "search", "--category", "Power/LDO"])
        .assert()
        .success()
        .stdout("A\n");
    chipdex_with_catalog(&tmp)
        .args(["-f", "id", "search", "--category", "Power"])
        .assert()
        .success()
        .stdout("A\nC\n");
}

#[test]
fn test_show_variant_resolves_owner() {
    let tmp = setup_catalog();
    chipdex_with_catalog(&tmp)
        .args(["show", "TPS563201DDCT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("id: TPS563201"))
        .stdout(predicate::str::contains("TPS563201DDCR"));
}

#[test]
fn test_show_table_picks_cheapest_offer() {
    let tmp = setup_catalog();
    chipdex_with_catalog(&tmp)
        .args(["-f", "tsv", "show", "TPS563201", "--qty", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LCSC"));
}

#[test]
fn test_show_unknown_id_fails() {
    let tmp = setup_catalog();
    chipdex_with_catalog(&tmp)
        .args(["show", "NOPE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NOPE"));
}

// ============================================================================
// Completions and Loading Tests
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    chipdex(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("chipdex"));
}

#[test]
fn test_malformed_catalog_reports_location() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("bad.yaml"), "components:\n  - id: [unclosed\n").unwrap();
    chipdex(&tmp)
        .args(["--catalog", "bad.yaml", "search"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.yaml"));
}

#[test]
fn test_catalog_directory_is_merged() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("catalog");
    fs::create_dir(&dir).unwrap();
    fs::write(
        dir.join("a.yaml"),
        "components:\n  - id: A1\n    model: A1\n    manufacturer: X\n    category: Misc\n",
    )
    .unwrap();
    fs::write(
        dir.join("b.json"),
        r#"{"components":[{"id":"B1","model":"B1","manufacturer":"Y","category":"Misc"}]}"#,
    )
    .unwrap();
    chipdex(&tmp)
        .args(["--catalog", "catalog", "-f", "id", "search"])
        .assert()
        .success()
        .stdout("A1\nB1\n");
}

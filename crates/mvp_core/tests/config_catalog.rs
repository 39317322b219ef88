use mvp_core::{ConfigError, UpgradeCatalog};
use serde_json::json;

#[test]
fn load_reads_and_validates_catalog_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("upgrades.json");
    let document = json!({
        "name": "fixture",
        "tables": {
            "GoldPerClick": { "values": [1, 4, 9], "costs": [0, 30, 90] }
        }
    });
    std::fs::write(&path, document.to_string()).unwrap();

    let catalog = UpgradeCatalog::load(&path).unwrap();
    let table = catalog.require("GoldPerClick").unwrap();
    assert_eq!(catalog.name, "fixture");
    assert_eq!(table.value_at(2), Some(9));
    assert_eq!(table.next_cost(1), Some(90));
    assert_eq!(table.next_cost(2), None);

    match catalog.require("GoldPerSec").unwrap_err() {
        ConfigError::MissingTable { catalog, table } => {
            assert_eq!(catalog, "fixture");
            assert_eq!(table, "GoldPerSec");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn load_reports_missing_file_and_bad_json() {
    let dir = tempfile::tempdir().unwrap();

    let missing = UpgradeCatalog::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(missing, ConfigError::Io { .. }));

    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let broken = UpgradeCatalog::load(&path).unwrap_err();
    assert!(matches!(broken, ConfigError::Parse(_)));
}

use mvp_core::{SettingsStore, SqliteSettingsStore};

#[test]
fn sqlite_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.db");

    let store = SqliteSettingsStore::open(&path).unwrap();
    assert_eq!(store.get_int("ClickerGoldPerSecLevel", 0), 0);
    store.set_int("ClickerGoldPerSecLevel", 3);
    drop(store);

    let reopened = SqliteSettingsStore::open(&path).unwrap();
    assert_eq!(reopened.get_int("ClickerGoldPerSecLevel", 0), 3);
    assert_eq!(reopened.get_int("Unknown", -1), -1);
}

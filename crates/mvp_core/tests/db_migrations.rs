use mvp_core::db::migrations::{current_version, latest_version};
use mvp_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "settings");
}

#[test]
fn reopening_a_migrated_file_keeps_its_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.db");

    let first = open_db(&path).unwrap();
    first
        .execute(
            "INSERT INTO settings (key, value) VALUES ('ClickerGold', 12);",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(current_version(&second).unwrap(), latest_version());
    let gold: i64 = second
        .query_row(
            "SELECT value FROM settings WHERE key = 'ClickerGold';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(gold, 12);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert_eq!(err.code(), "schema_too_new");
    assert!(err.to_string().contains("settings database schema v999"));
    match err {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn open_failure_names_the_target() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("settings.db");

    let err = open_db(&path).unwrap_err();
    assert_eq!(err.code(), "settings_open_failed");
    match err {
        DbError::Open { target, .. } => assert_eq!(target, path.display().to_string()),
        other => panic!("unexpected error: {other}"),
    }
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}

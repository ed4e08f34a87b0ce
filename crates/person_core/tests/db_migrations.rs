use person_core::db::migrations::latest_version;
use person_core::db::{open_db, open_db_in_memory, open_store, DbError};
use person_core::{PersonRepository, SqlitePersonRepository, StoreConfig};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "people");
}

#[test]
fn opening_same_store_twice_keeps_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.db");

    let conn_first = open_db(&path).unwrap();
    {
        let repo = SqlitePersonRepository::try_new(&conn_first).unwrap();
        repo.insert_person(&person_core::NewPerson::new("Peter"))
            .unwrap();
    }
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let repo = SqlitePersonRepository::try_new(&conn_second).unwrap();
    assert_eq!(repo.count_people().unwrap(), 1);
}

#[test]
fn opening_store_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn open_store_follows_parsed_uri() {
    let memory = StoreConfig::from_uri("sqlite::memory:").unwrap();
    let conn = open_store(&memory).unwrap();
    assert_table_exists(&conn, "people");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("from-uri.db");
    let file = StoreConfig::from_uri(&format!("sqlite://{}", path.display())).unwrap();
    let conn = open_store(&file).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert!(path.exists());
}

#[test]
fn opening_unreachable_path_returns_sqlite_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("people.db");

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
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

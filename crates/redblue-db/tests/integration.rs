use redblue_db::{DbRuntimeSettings, Storage, IN_MEMORY};

#[test]
fn storage_initialization_creates_schema() {
    let storage =
        Storage::initialize(IN_MEMORY, DbRuntimeSettings::default()).expect("should initialize");

    let tables = storage.tables().expect("should list tables");
    assert_eq!(tables, vec!["games".to_string(), "rounds".to_string()]);
    assert_eq!(storage.pool().max_size(), 1, "in-memory store uses one connection");
}

#[test]
fn storage_reopens_existing_file() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("red-blue.sqlite");
    let path = path.to_str().expect("utf-8 path");

    {
        let storage =
            Storage::initialize(path, DbRuntimeSettings::default()).expect("first open");
        let conn = storage.session().expect("should get a session");
        conn.execute(
            "INSERT INTO games (id, code, player1_name) VALUES ('g1', 'ABC234', 'Ann')",
            [],
        )
        .expect("insert should succeed");
    }

    let storage = Storage::initialize(path, DbRuntimeSettings::default()).expect("second open");
    let conn = storage.session().expect("should get a session");
    let name: String = conn
        .query_row("SELECT player1_name FROM games WHERE id = 'g1'", [], |row| {
            row.get(0)
        })
        .expect("row should survive reopen");
    assert_eq!(name, "Ann");

    let applied: i64 = conn
        .query_row("SELECT COUNT(*) FROM _redblue_migrations", [], |row| {
            row.get(0)
        })
        .expect("should count migrations");
    assert_eq!(applied, 2, "migrations should be recorded once");
}

#[test]
fn sessions_share_one_store() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("shared.sqlite");
    let storage = Storage::initialize(path.to_str().expect("utf-8 path"), DbRuntimeSettings::default())
        .expect("should initialize");

    let writer = storage.session().expect("writer session");
    writer
        .execute(
            "INSERT INTO games (id, code, player1_name) VALUES ('g1', 'ABC234', 'Ann')",
            [],
        )
        .expect("insert should succeed");

    let reader = storage.clone().session().expect("reader session");
    let count: i64 = reader
        .query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))
        .expect("should count games");
    assert_eq!(count, 1);
}

#[test]
fn rounds_require_existing_game() {
    let storage =
        Storage::initialize(IN_MEMORY, DbRuntimeSettings::default()).expect("should initialize");
    let conn = storage.session().expect("should get a session");

    let result = conn.execute(
        "INSERT INTO rounds (id, game_id, round_number) VALUES ('r1', 'missing', 1)",
        [],
    );
    assert!(result.is_err(), "foreign key should reject orphan rounds");
}

use sql_query_builder::prelude::*;

fn options(dir: &std::path::Path, mode: DatabaseMode) -> ConnectionOptions {
    Database::builder(dir, "app")
        .test_database("app_test")
        .mode(mode)
        .finish()
}

#[test]
fn test_mode_opens_the_test_database() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut db = Database::new(options(dir.path(), DatabaseMode::Test));
    assert!(!db.is_connected());

    db.connect()?;
    assert!(db.is_connected());
    assert_eq!(db.active_database(), Some("app_test"));
    assert!(dir.path().join("app_test.db").is_file());
    assert!(!dir.path().join("app.db").exists());
    Ok(())
}

#[test]
fn disconnect_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut db = Database::new(options(dir.path(), DatabaseMode::Production));

    db.disconnect()?;
    db.connect()?;
    db.disconnect()?;
    db.disconnect()?;
    assert!(!db.is_connected());
    assert_eq!(db.active_database(), None);
    Ok(())
}

#[test]
fn switch_database_without_connection_does_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut db = Database::new(options(dir.path(), DatabaseMode::Production));

    db.switch_database("other")?;
    assert!(!db.is_connected());
    assert!(!dir.path().join("other.db").exists());
    Ok(())
}

#[test]
fn switch_database_moves_the_live_connection() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut db = Database::new(options(dir.path(), DatabaseMode::Production));
    db.connect()?;
    db.execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT)")?;
    db.query().insert("notes", [("body", RowValues::from("in app"))])?;

    db.switch_database("archive")?;
    assert_eq!(db.active_database(), Some("archive"));
    let err = db.query().get("notes").unwrap_err();
    assert!(matches!(err, QueryBuilderError::PrepareFailed { .. }));

    db.switch_database("app")?;
    assert_eq!(db.query().num_rows("notes")?, 1);
    Ok(())
}

#[test]
fn failed_switch_keeps_the_current_connection() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut db = Database::new(options(dir.path(), DatabaseMode::Production));
    db.connect()?;
    db.execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT)")?;
    db.query().insert("notes", [("body", RowValues::from("still here"))])?;

    let err = db.switch_database("missing_dir/other").unwrap_err();
    assert!(matches!(err, QueryBuilderError::ConnectionError(_)));
    assert!(db.is_connected());
    assert_eq!(db.active_database(), Some("app"));
    assert_eq!(db.query().num_rows("notes")?, 1);
    Ok(())
}

#[test]
fn committed_mutations_survive_reconnect() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    {
        let mut db = Database::new(options(dir.path(), DatabaseMode::Production));
        db.connect()?;
        db.execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT)")?;
        let id = db.query().insert("notes", [("body", RowValues::from("kept"))])?;
        assert_eq!(id, Some(1));
    }

    let mut db = Database::new(options(dir.path(), DatabaseMode::Production));
    db.connect()?;
    // connecting again replaces the handle rather than failing
    db.connect()?;
    let rows = db.query().get("notes")?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("body").and_then(RowValues::as_text), Some("kept"));
    Ok(())
}

#[test]
fn foreign_keys_are_enforced() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open_in_memory()?;
    db.execute_batch(
        "CREATE TABLE owners (id INTEGER PRIMARY KEY);
         CREATE TABLE pets (id INTEGER PRIMARY KEY, owner_id INTEGER NOT NULL REFERENCES owners(id));",
    )?;

    let err = db
        .query()
        .insert("pets", [("owner_id", RowValues::from(42))])
        .unwrap_err();
    match err {
        QueryBuilderError::MutationFailed { message, .. } => {
            assert!(message.contains("FOREIGN KEY constraint failed"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn invalid_configuration_is_rejected() {
    let mut db = Database::new(ConnectionOptions::new("/definitely/not/here", "app"));
    assert!(matches!(db.connect(), Err(QueryBuilderError::ConfigError(_))));

    let mut db = Database::new(ConnectionOptions::in_memory());
    let mut unnamed = db.options().clone();
    unnamed.database.clear();
    let mut db_unnamed = Database::new(unnamed);
    assert!(matches!(db_unnamed.connect(), Err(QueryBuilderError::ConfigError(_))));
    assert!(db.connect().is_ok());
}

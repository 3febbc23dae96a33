use sqlite_compat::prelude::*;
use tempfile::tempdir;

fn seeded() -> Result<Database, SqliteCompatError> {
    let db = Database::open(":memory:")?;
    db.exec(
        "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT NOT NULL, age INTEGER);
         INSERT INTO people (name, age) VALUES ('carol', 41);
         INSERT INTO people (name, age) VALUES ('alice', 30);
         INSERT INTO people (name, age) VALUES ('bob', NULL);",
        None,
    )?;
    Ok(db)
}

#[test]
fn all_preserves_engine_order() -> Result<(), Box<dyn std::error::Error>> {
    let db = seeded()?;
    let names: Vec<String> = db
        .all("SELECT name FROM people", ())?
        .iter()
        .filter_map(|r| r.get("name").and_then(Value::as_text).map(str::to_owned))
        .collect();
    assert_eq!(names, vec!["carol", "alice", "bob"]);

    let sorted: Vec<String> = db
        .all("SELECT name FROM people ORDER BY name DESC", ())?
        .iter()
        .filter_map(|r| r.get("name").and_then(Value::as_text).map(str::to_owned))
        .collect();
    assert_eq!(sorted, vec!["carol", "bob", "alice"]);
    Ok(())
}

#[test]
fn all_delivers_through_completion_too() -> Result<(), Box<dyn std::error::Error>> {
    let db = seeded()?;
    let mut delivered = None;
    let rows = db.all(
        "SELECT name FROM people WHERE age > ?",
        AllArgs::with(Value::Int(35), |res| delivered = Some(res)),
    )?;
    assert_eq!(rows.len(), 1);
    assert_eq!(delivered.expect("completion called")?, rows);
    Ok(())
}

#[test]
fn each_visits_every_row_once_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let db = seeded()?;
    let expected = db.all("SELECT id, name FROM people", ())?;

    let mut visited = Vec::new();
    let mut total = None;
    let count = db.each(
        "SELECT id, name FROM people",
        EachArgs::then(
            EachCallbacks::new(|row| visited.push(row.expect("row").clone()))
                .on_done(|res| total = Some(res)),
        ),
    )?;

    assert_eq!(visited, expected);
    assert_eq!(count, expected.len());
    assert_eq!(total.expect("done called")?, visited.len());
    Ok(())
}

#[test]
fn each_with_params_on_a_prepared_statement() -> Result<(), Box<dyn std::error::Error>> {
    let db = seeded()?;
    let mut stmt = db
        .prepare("SELECT name FROM people WHERE id > ?", ())?
        .expect("prepared");
    let mut names = Vec::new();
    let count = stmt.each(EachArgs::with(
        Value::Int(1),
        EachCallbacks::new(|row| {
            if let Ok(row) = row {
                names.push(row.get("name").cloned());
            }
        }),
    ))?;
    assert_eq!(count, 2);
    assert_eq!(
        names,
        vec![
            Some(Value::Text("alice".into())),
            Some(Value::Text("bob".into()))
        ]
    );
    Ok(())
}

#[test]
fn each_failure_reaches_both_callbacks() -> Result<(), Box<dyn std::error::Error>> {
    let db = seeded()?;
    let mut row_errors = 0;
    let mut done_error = false;
    let count = db.each(
        "SELECT nope FROM missing_table",
        EachArgs::then(
            EachCallbacks::new(|row| {
                if row.is_err() {
                    row_errors += 1;
                }
            })
            .on_done(|res| done_error = res.is_err()),
        ),
    )?;
    assert_eq!(count, 0);
    assert_eq!(row_errors, 1);
    assert!(done_error);
    Ok(())
}

#[test]
fn prepare_errors_follow_the_dual_contract() -> Result<(), Box<dyn std::error::Error>> {
    let db = seeded()?;
    assert!(db.prepare("SELEC oops", ()).is_err());
    assert!(db.get("SELEC oops", ()).is_err());

    let mut seen = None;
    let stmt = db.prepare(
        "SELEC oops",
        PrepareArgs::then(|res| seen = Some(res.is_err())),
    )?;
    assert!(stmt.is_none());
    assert_eq!(seen, Some(true));

    let mut seen = None;
    let rows = db.all("SELEC oops", AllArgs::then(|res| seen = Some(res.is_err())))?;
    assert!(rows.is_empty());
    assert_eq!(seen, Some(true));
    Ok(())
}

#[test]
fn prepare_with_params_prebinds_them() -> Result<(), Box<dyn std::error::Error>> {
    let db = seeded()?;
    let mut ok = false;
    let mut stmt = db
        .prepare(
            "SELECT name FROM people WHERE name = ?",
            PrepareArgs::with(Value::Text("bob".into()), |res| ok = res.is_ok()),
        )?
        .expect("prepared");
    let row = stmt.get(())?.expect("bob exists");
    assert_eq!(row.get("name"), Some(&Value::Text("bob".into())));
    stmt.finalize(None)?;
    assert!(ok);
    Ok(())
}

#[test]
fn exec_runs_scripts_and_reports_failures() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open(":memory:")?;
    let mut outcome = None;
    db.exec(
        "CREATE TABLE a (x); CREATE TABLE b (y); INSERT INTO a VALUES (1);",
        Some(completion(|res| outcome = Some(res.is_ok()))),
    )?;
    assert_eq!(outcome, Some(true));
    assert_eq!(db.all("SELECT * FROM a", ())?.len(), 1);

    assert!(db.exec("CREATE TABLE a (x)", None).is_err());
    let mut outcome = None;
    db.exec(
        "CREATE TABLE a (x)",
        Some(completion(|res| outcome = Some(res.is_ok()))),
    )?;
    assert_eq!(outcome, Some(false));
    Ok(())
}

#[test]
fn serialize_and_parallelize_invoke_their_closures() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open(":memory:")?;
    let mut calls = Vec::new();
    db.serialize(|| calls.push("serialize"));
    db.parallelize(|| calls.push("parallelize"));
    assert_eq!(calls, vec!["serialize", "parallelize"]);
    Ok(())
}

#[test]
fn file_database_persists_across_close_and_reopen() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("persist.db");
    let path = path.to_string_lossy().into_owned();

    let db = Database::builder(path.clone())
        .pragmas("PRAGMA foreign_keys = ON;")
        .build()?;
    db.exec("CREATE TABLE kv (k TEXT PRIMARY KEY, v TEXT)", None)?;
    db.run(
        "INSERT INTO kv (k, v) VALUES (?, ?)",
        vec![Value::Text("a".into()), Value::Text("1".into())],
    )?;
    let mut closed = None;
    db.close(Some(completion(|res| closed = Some(res.is_ok()))))?;
    assert_eq!(closed, Some(true));

    let db = Database::open_with_mode(&path, OpenMode::READONLY)?;
    assert_eq!(db.path(), path);
    let row = db.get("SELECT v FROM kv WHERE k = ?", Value::Text("a".into()))?;
    assert_eq!(
        row.and_then(|r| r.get("v").cloned()),
        Some(Value::Text("1".into()))
    );
    // read-only connections reject writes
    assert!(db.run("INSERT INTO kv VALUES ('b', '2')", ()).is_err());
    db.close(None)?;
    Ok(())
}

#[test]
fn readwrite_without_create_needs_an_existing_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("absent.db");
    let err = Database::open_with_mode(&path.to_string_lossy(), OpenMode::READWRITE).unwrap_err();
    assert!(matches!(err, SqliteCompatError::OpenError { .. }));
    Ok(())
}

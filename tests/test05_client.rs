#![cfg(feature = "dialect")]

use sqlite_compat::prelude::*;
use sqlite_compat::{ClientConfig, detect_adapter};

fn client() -> Result<SqliteCompatClient, Box<dyn std::error::Error>> {
    let cfg = ClientConfig::from_json_str(
        r#"{"client":"sqlite3","connection":{"filename":":memory:"},"useNullAsDefault":true}"#,
    )?;
    Ok(detect_adapter()
        .client(cfg.to_options()?)
        .expect("rich adapter when the dialect feature is on"))
}

#[test]
fn client_reports_driver_and_dialect() -> Result<(), Box<dyn std::error::Error>> {
    let client = client()?;
    assert_eq!(client.driver_name(), "rusqlite");
    assert_eq!(client.dialect(), "sqlite3");
    Ok(())
}

#[test]
fn builder_methods_shape_responses() -> Result<(), Box<dyn std::error::Error>> {
    let client = client()?;
    let db = client.acquire_raw_connection()?;
    db.exec(
        "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, age INTEGER)",
        None,
    )?;

    let inserted = client.query(
        &db,
        &QueryObject::new(
            "insert into `users` (`age`, `name`) values (?, ?)",
            vec![Value::Int(30), Value::Text("alice".into())],
            QueryMethod::Insert,
        ),
    )?;
    assert_eq!(inserted, Response::Ids(vec![1]));
    client.query(
        &db,
        &QueryObject::new(
            "insert into `users` (`age`, `name`) values (?, ?)",
            vec![Value::Int(25), Value::Text("bob".into())],
            QueryMethod::Insert,
        ),
    )?;

    let updated = client.query(
        &db,
        &QueryObject::new(
            "update `users` set `age` = `age` + 1 where `age` > ?",
            vec![Value::Int(20)],
            QueryMethod::Update,
        ),
    )?;
    assert_eq!(updated, Response::Changes(2));

    let names = client.query(
        &db,
        &QueryObject::new(
            "select `name` from `users` order by `id` asc",
            vec![],
            QueryMethod::Pluck("name".into()),
        ),
    )?;
    assert_eq!(
        names,
        Response::Values(vec![Value::Text("alice".into()), Value::Text("bob".into())])
    );

    let first = client.query(
        &db,
        &QueryObject::new(
            "select * from `users` where `name` = ? limit ?",
            vec![Value::Text("bob".into()), Value::Int(1)],
            QueryMethod::First,
        ),
    )?;
    let Response::Row(Some(row)) = &first else {
        panic!("expected a row, got {first:?}");
    };
    assert_eq!(row.get("age"), Some(&Value::Int(26)));

    let all = client.query(
        &db,
        &QueryObject::new("select * from `users`", vec![], QueryMethod::Select),
    )?;
    assert!(matches!(all, Response::Rows(ref rows) if rows.len() == 2));

    let deleted = client.query(
        &db,
        &QueryObject::new(
            "delete from `users` where `id` = ?",
            vec![Value::Int(99)],
            QueryMethod::Del,
        ),
    )?;
    assert_eq!(deleted, Response::Changes(0));

    client.destroy_raw_connection(db)?;
    Ok(())
}

#[test]
fn client_surfaces_engine_errors() -> Result<(), Box<dyn std::error::Error>> {
    let client = client()?;
    let db = client.acquire_raw_connection()?;
    let res = client.query(
        &db,
        &QueryObject::new("select * from `nowhere`", vec![], QueryMethod::Select),
    );
    assert!(matches!(res, Err(SqliteCompatError::SqliteError(_))));
    Ok(())
}

#[test]
fn raw_queries_return_rows_or_run_results() -> Result<(), Box<dyn std::error::Error>> {
    let client = client()?;
    let db = client.acquire_raw_connection()?;
    db.exec("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT)", None)?;

    let written = client.query(
        &db,
        &QueryObject::new(
            "insert into notes (body) values (?)",
            vec![Value::Text("hello".into())],
            QueryMethod::Raw,
        ),
    )?;
    assert_eq!(
        written,
        Response::Run(RunResult {
            last_id: Some(1),
            changes: 1
        })
    );

    let read = client.query(
        &db,
        &QueryObject::new("select body from notes", vec![], QueryMethod::Raw),
    )?;
    let Response::Rows(rows) = &read else {
        panic!("expected rows, got {read:?}");
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("body"), Some(&Value::Text("hello".into())));

    client.destroy_raw_connection(db)?;
    Ok(())
}

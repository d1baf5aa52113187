#![cfg(feature = "sqlite")]

use chrono::NaiveDateTime;
use serde_json::json;
use sql_unitwork::prelude::*;
use tokio::runtime::Runtime;

#[test]
fn values_survive_the_sqlite_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    let dir = tempfile::tempdir()?;
    let db_path = dir.path().join("types.db");
    let opts = SqliteOptions::new(db_path.to_string_lossy());

    rt.block_on(async {
        {
            let mut factory = LazyFactory::new(opts.clone());
            let conn = factory.connection().await?;
            conn.execute_batch(
                "CREATE TABLE sample (
                    recid INTEGER PRIMARY KEY,
                    a INTEGER,
                    b TEXT,
                    c DATETIME,
                    d REAL,
                    e BOOLEAN,
                    f BLOB,
                    g JSON,
                    h TEXT
                );",
            )
            .await?;
        }

        let stamp =
            NaiveDateTime::parse_from_str("2024-01-01 08:00:01", "%Y-%m-%d %H:%M:%S")?;
        let operator = DbOperator::new();
        let insert = DbCommand::new(
            "INSERT INTO sample (recid, a, b, c, d, e, f, g, h)
             VALUES (:recid, :a, :b, :c, :d, :e, :f, :g, :h)",
        )
        .param("recid", DbValue::Int(1))
        .param("a", DbValue::Int(42))
        .param("b", DbValue::Text("Alpha".into()))
        .param("c", DbValue::Timestamp(stamp))
        .param("d", DbValue::Float(10.5))
        .param("e", DbValue::Bool(true))
        .param("f", DbValue::Blob(b"Blob12".to_vec()))
        .param("g", DbValue::Json(json!({"name": "Alice", "age": 30})))
        .param("h", DbValue::Null);
        assert!(
            operator
                .try_execute(LazyFactory::new(opts.clone()), &insert)
                .await
        );

        let rows: Vec<DbRow> = operator
            .query(
                LazyFactory::new(opts.clone()),
                &DbCommand::new("SELECT * FROM sample WHERE recid = :recid")
                    .param("recid", DbValue::Int(1)),
            )
            .await;
        assert_eq!(rows.len(), 1);
        let row = &rows[0];

        assert_eq!(*row.require("a")?.as_int().unwrap(), 42);
        assert_eq!(row.require("b")?.as_text().unwrap(), "Alpha");
        assert_eq!(row.require("c")?.as_timestamp().unwrap(), stamp);
        assert_eq!(row.require("d")?.as_float().unwrap(), 10.5);
        // booleans come back as 0/1 integers
        assert!(*row.require("e")?.as_bool().unwrap());
        assert_eq!(row.require("f")?.as_blob().unwrap(), b"Blob12");
        // JSON is stored as its serialized text
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(row.require("g")?.as_text().unwrap())?,
            json!({"name": "Alice", "age": 30})
        );
        assert!(row.require("h")?.is_null());

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}

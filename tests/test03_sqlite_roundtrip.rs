#![cfg(feature = "sqlite")]

use sql_unitwork::prelude::*;
use tokio::runtime::Runtime;

struct Score {
    id: i64,
    x: i64,
    y: i64,
}

impl FromRow for Score {
    fn from_row(row: &DbRow) -> Result<Self, SqlUnitworkError> {
        let int = |col: &str| -> Result<i64, SqlUnitworkError> {
            row.require(col)?
                .as_int()
                .copied()
                .ok_or_else(|| SqlUnitworkError::MappingError(format!("{col} is not an integer")))
        };
        Ok(Self {
            id: int("id")?,
            x: int("x")?,
            y: int("y")?,
        })
    }
}

async fn seed(opts: &SqliteOptions) -> Result<(), SqlUnitworkError> {
    let mut factory = LazyFactory::new(opts.clone());
    let conn = factory.connection().await?;
    conn.execute_batch(
        "CREATE TABLE t (id INTEGER PRIMARY KEY, x INTEGER NOT NULL, y INTEGER NOT NULL);
         INSERT INTO t (id, x, y) VALUES (1, 0, 0);
         INSERT INTO t (id, x, y) VALUES (2, 0, 0);",
    )
    .await
}

async fn scores(opts: &SqliteOptions, operator: &DbOperator) -> Vec<Score> {
    operator
        .query(
            LazyFactory::new(opts.clone()),
            &DbCommand::new("SELECT id, x, y FROM t ORDER BY id"),
        )
        .await
}

#[test]
fn all_or_nothing_updates_against_sqlite() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    let dir = tempfile::tempdir()?;
    let db_path = dir.path().join("roundtrip.db");
    let opts = SqliteOptions::new(db_path.to_string_lossy());

    rt.block_on(async {
        seed(&opts).await?;
        let operator = DbOperator::new();

        // both updates hit a row, so the batch commits
        let commands = vec![
            DbCommand::new("UPDATE t SET x = :x WHERE id = :id")
                .param("x", DbValue::Int(10))
                .param("id", DbValue::Int(1)),
            DbCommand::new("UPDATE t SET y = :y WHERE id = :id")
                .param("y", DbValue::Int(20))
                .param("id", DbValue::Int(2)),
        ];
        assert!(
            operator
                .try_execute_all(LazyFactory::new(opts.clone()), &commands)
                .await
        );

        let rows = scores(&opts, &operator).await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].x, 10);
        assert_eq!(rows[1].y, 20);

        // the second update misses, so the first is rolled back too
        let commands = vec![
            DbCommand::new("UPDATE t SET x = :x WHERE id = :id")
                .param("x", DbValue::Int(111))
                .param("id", DbValue::Int(1)),
            DbCommand::new("UPDATE t SET y = :y WHERE id = :id")
                .param("y", DbValue::Int(222))
                .param("id", DbValue::Int(99)),
        ];
        assert!(
            !operator
                .try_execute_all(LazyFactory::new(opts.clone()), &commands)
                .await
        );

        let rows = scores(&opts, &operator).await;
        assert_eq!(rows[0].x, 10, "missed batch must leave earlier updates undone");
        assert_eq!(rows[1].y, 20);

        Ok::<(), SqlUnitworkError>(())
    })?;

    Ok(())
}

#[test]
fn single_execute_and_queries_against_sqlite() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    let dir = tempfile::tempdir()?;
    let db_path = dir.path().join("single.db");
    let opts = SqliteOptions::new(db_path.to_string_lossy());

    rt.block_on(async {
        seed(&opts).await?;
        let operator = DbOperator::new();

        // autocommit insert
        let insert = DbCommand::new("INSERT INTO t (id, x, y) VALUES (:id, :x, :y)")
            .param("id", DbValue::Int(3))
            .param("x", DbValue::Int(7))
            .param("y", DbValue::Int(8));
        assert!(
            operator
                .try_execute(LazyFactory::new(opts.clone()), &insert)
                .await
        );

        let rows = scores(&opts, &operator).await;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].id, 3);

        // try_query distinguishes success-with-rows from failure
        let (ok, rows) = operator
            .try_query::<Score, _>(
                LazyFactory::new(opts.clone()),
                &DbCommand::new("SELECT id, x, y FROM t WHERE x = :x")
                    .param("x", DbValue::Int(7)),
            )
            .await;
        assert!(ok);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].y, 8);

        // zero matches is a success with an empty result
        let (ok, rows) = operator
            .try_query::<Score, _>(
                LazyFactory::new(opts.clone()),
                &DbCommand::new("SELECT id, x, y FROM t WHERE id = :id")
                    .param("id", DbValue::Int(1234)),
            )
            .await;
        assert!(ok);
        assert!(rows.is_empty());

        // a genuinely broken statement is a silent negative on the return
        // value, observable through the hub
        let hub_hits = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        {
            let hub_hits = std::sync::Arc::clone(&hub_hits);
            operator.error_hub().subscribe(move |_| {
                hub_hits.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            });
        }
        let (ok, rows) = operator
            .try_query::<Score, _>(
                LazyFactory::new(opts.clone()),
                &DbCommand::new("SELECT nope FROM missing_table"),
            )
            .await;
        assert!(!ok);
        assert!(rows.is_empty());
        assert_eq!(hub_hits.load(std::sync::atomic::Ordering::SeqCst), 1);

        Ok::<(), SqlUnitworkError>(())
    })?;

    Ok(())
}

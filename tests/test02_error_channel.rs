use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use sql_unitwork::prelude::*;
use sql_unitwork::test_util::FakeDb;
use tokio::runtime::Runtime;

fn counting_operator() -> (DbOperator, Arc<AtomicUsize>, Arc<Mutex<Vec<String>>>) {
    let operator = DbOperator::new();
    let count = Arc::new(AtomicUsize::new(0));
    let messages = Arc::new(Mutex::new(Vec::new()));
    {
        let count = Arc::clone(&count);
        let messages = Arc::clone(&messages);
        operator.error_hub().subscribe(move |err| {
            count.fetch_add(1, Ordering::SeqCst);
            messages.lock().unwrap().push(err.to_string());
        });
    }
    (operator, count, messages)
}

#[test]
fn failing_statement_notifies_exactly_once() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let db = FakeDb::new();
        db.script_rows(1);
        db.script_fail("synthetic constraint violation");

        let (operator, count, messages) = counting_operator();
        let commands = vec![
            DbCommand::new("UPDATE t SET x = 1 WHERE id = 1"),
            DbCommand::new("UPDATE t SET y = 2 WHERE id = 2"),
        ];
        let ok = operator
            .try_execute_all(LazyFactory::new(db.clone()), &commands)
            .await;

        assert!(!ok);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(
            messages.lock().unwrap()[0].contains("synthetic constraint violation"),
            "notification should carry the original error"
        );
        // the error broke the loop before any commit/rollback decision
        assert_eq!(db.commits(), 0);
        assert_eq!(db.rollbacks(), 0);
        assert!(db.disposed());
    });
    Ok(())
}

#[test]
fn try_query_reports_and_returns_empty() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let db = FakeDb::new();
        db.script_fail("no such table");

        let (operator, count, _) = counting_operator();
        let (ok, rows) = operator
            .try_query::<DbRow, _>(
                LazyFactory::new(db.clone()),
                &DbCommand::new("SELECT * FROM missing"),
            )
            .await;

        assert!(!ok);
        assert!(rows.is_empty());
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(db.disposed());
    });
    Ok(())
}

#[test]
fn empty_result_is_not_an_error() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let db = FakeDb::new();
        // no script: the fake answers selects with an empty set

        let (operator, count, _) = counting_operator();
        let rows: Vec<DbRow> = operator
            .query(
                LazyFactory::new(db.clone()),
                &DbCommand::new("SELECT * FROM t WHERE 0 = 1"),
            )
            .await;

        assert!(rows.is_empty());
        assert_eq!(count.load(Ordering::SeqCst), 0);
        // queries run inside the lazy transaction
        assert_eq!(db.begins(), 1);
    });
    Ok(())
}

#[test]
fn every_subscriber_hears_a_failure() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let db = FakeDb::new();
        db.script_fail("boom");

        let operator = DbOperator::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        {
            let first = Arc::clone(&first);
            operator.error_hub().subscribe(move |_| {
                first.fetch_add(1, Ordering::SeqCst);
            });
        }
        {
            let second = Arc::clone(&second);
            operator.error_hub().subscribe(move |_| {
                second.fetch_add(1, Ordering::SeqCst);
            });
        }

        let ok = operator
            .try_execute(
                LazyFactory::new(db.clone()),
                &DbCommand::new("UPDATE t SET x = 1"),
            )
            .await;

        assert!(!ok);
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    });
    Ok(())
}

#[test]
fn shared_hub_reports_across_operators() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let hub = ErrorHub::new();
        let count = Arc::new(AtomicUsize::new(0));
        {
            let count = Arc::clone(&count);
            hub.subscribe(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }

        let db = FakeDb::new();
        db.script_fail("first");
        let operator_a = DbOperator::with_error_hub(hub.clone());
        operator_a
            .try_execute(
                LazyFactory::new(db.clone()),
                &DbCommand::new("UPDATE t SET x = 1"),
            )
            .await;

        db.script_fail("second");
        let operator_b = DbOperator::with_error_hub(hub.clone());
        operator_b
            .try_execute(
                LazyFactory::new(db.clone()),
                &DbCommand::new("UPDATE t SET x = 2"),
            )
            .await;

        assert_eq!(count.load(Ordering::SeqCst), 2);
    });
    Ok(())
}

use super::*;

#[tokio::test]
async fn test_in_memory() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert_eq!(db.db_type(), "duckdb");
}

#[tokio::test]
async fn test_new_memory_path() {
    let db = DuckDbBackend::new(":memory:").unwrap();
    assert!(!db.relation_exists("anything").await.unwrap());
}

#[tokio::test]
async fn test_from_path_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.duckdb");
    {
        let db = DuckDbBackend::from_path(&path).unwrap();
        db.execute_batch("CREATE TABLE kept (id VARCHAR)")
            .await
            .unwrap();
    }
    let db = DuckDbBackend::from_path(&path).unwrap();
    assert!(db.relation_exists("kept").await.unwrap());
}

#[tokio::test]
async fn test_query_count() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE nums AS SELECT * FROM range(10) t(n)")
        .await
        .unwrap();

    let count = db.query_count("SELECT * FROM nums").await.unwrap();
    assert_eq!(count, 10);
}

#[tokio::test]
async fn test_execute_returns_affected_rows() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INTEGER); INSERT INTO t VALUES (1), (2), (3);")
        .await
        .unwrap();

    let deleted = db.execute("DELETE FROM t WHERE id < 3").await.unwrap();
    assert_eq!(deleted, 2);
}

#[tokio::test]
async fn test_query_rows_with_names() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE people (id VARCHAR, age INTEGER, tags VARCHAR[]);
         INSERT INTO people VALUES ('a', 31, ['x', 'y']);",
    )
    .await
    .unwrap();

    let rows = db.query_rows("SELECT id, age, tags FROM people").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].columns(), &["id", "age", "tags"]);
    assert_eq!(rows[0].text("id"), Some("a"));
    assert_eq!(rows[0].get("age"), Some(&Value::Int(31)));
    assert_eq!(
        rows[0].get("tags"),
        Some(&Value::TextList(vec!["x".to_string(), "y".to_string()]))
    );
}

#[tokio::test]
async fn test_query_rows_empty_result() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE empty_t (id VARCHAR)")
        .await
        .unwrap();
    let rows = db.query_rows("SELECT id FROM empty_t").await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_query_scalar() {
    let db = DuckDbBackend::in_memory().unwrap();
    let value = db.query_scalar("SELECT 42").await.unwrap();
    assert_eq!(value, Some(Value::Int(42)));
}

#[tokio::test]
async fn test_timestamp_round_trip() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ts = chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap();
    db.execute_batch("CREATE TABLE events (happened_at TIMESTAMP)")
        .await
        .unwrap();
    db.execute(&format!(
        "INSERT INTO events VALUES ({})",
        Value::Timestamp(ts).to_sql_literal()
    ))
    .await
    .unwrap();

    let value = db.query_scalar("SELECT happened_at FROM events").await.unwrap();
    assert_eq!(value, Some(Value::Timestamp(ts)));
}

#[tokio::test]
async fn test_not_null_is_constraint_violation() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE strict_t (id VARCHAR NOT NULL)")
        .await
        .unwrap();

    let err = db
        .execute("INSERT INTO strict_t VALUES (NULL)")
        .await
        .unwrap_err();
    assert!(err.is_constraint_violation(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_check_is_constraint_violation() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE rated (rating INTEGER CHECK (rating BETWEEN 1 AND 5))")
        .await
        .unwrap();

    let err = db.execute("INSERT INTO rated VALUES (9)").await.unwrap_err();
    assert!(err.is_constraint_violation(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_missing_table_classified() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.execute("DELETE FROM nowhere").await.unwrap_err();
    assert!(matches!(err, DbError::TableNotFound(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn test_transaction_rollback_discards_changes() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INTEGER)").await.unwrap();

    db.begin().await.unwrap();
    db.execute("INSERT INTO t VALUES (1)").await.unwrap();
    db.rollback().await.unwrap();

    assert_eq!(db.query_count("SELECT * FROM t").await.unwrap(), 0);
}

#[tokio::test]
async fn test_transaction_commit_keeps_changes() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INTEGER)").await.unwrap();

    db.begin().await.unwrap();
    db.execute("INSERT INTO t VALUES (1)").await.unwrap();
    db.commit().await.unwrap();

    assert_eq!(db.query_count("SELECT * FROM t").await.unwrap(), 1);
}

#[tokio::test]
async fn test_relation_exists_schema_qualified() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE SCHEMA staging; CREATE TABLE staging.t (id INTEGER);")
        .await
        .unwrap();

    assert!(db.relation_exists("staging.t").await.unwrap());
    assert!(!db.relation_exists("t").await.unwrap());
}

use super::*;
use al_db::DuckDbBackend;

#[tokio::test]
async fn empty_store_has_empty_snapshot() {
    let db = DuckDbBackend::in_memory().unwrap();
    let catalog = LiveSchema::new(&db).snapshot().await.unwrap();
    assert_eq!(catalog, Catalog::new());
}

#[tokio::test]
async fn snapshot_reads_columns_and_ignores_views() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE wallets (
             id VARCHAR NOT NULL,
             reserve_balance DECIMAL(12,2) NOT NULL DEFAULT 0,
             tags VARCHAR[]
         );
         CREATE VIEW wallet_ids AS SELECT id FROM wallets;",
    )
    .await
    .unwrap();

    let live = LiveSchema::new(&db);
    let catalog = live.snapshot().await.unwrap();
    assert_eq!(catalog.tables.len(), 1);

    let balance = catalog.column("wallets", "reserve_balance").unwrap();
    assert_eq!(balance.data_type, "DECIMAL(12,2)");
    assert!(!balance.nullable);
    assert!(balance.has_default);

    let tags = catalog.column("wallets", "tags").unwrap();
    assert_eq!(tags.data_type, "VARCHAR[]");
    assert!(tags.nullable);
    assert!(!tags.has_default);

    assert!(live.has_table("wallets").await.unwrap());
    assert!(!live.has_table("wallet_ids").await.unwrap());
    assert!(live.has_column("wallets", "tags").await.unwrap());
    assert!(!live.has_constraint("wallets_id_key").await.unwrap());
}

#[tokio::test]
async fn registry_enums_are_visible() {
    let db = DuckDbBackend::in_memory().unwrap();
    metadata::ensure(&db).await.unwrap();
    db.execute(&metadata::insert_enum_sql(
        "referral_status",
        &["inprogress".to_string(), "completed".to_string()],
    ))
    .await
    .unwrap();

    let live = LiveSchema::new(&db);
    assert!(live.has_enum("referral_status").await.unwrap());
    assert_eq!(
        live.enum_values("referral_status").await.unwrap(),
        Some(vec!["inprogress".to_string(), "completed".to_string()])
    );
    assert_eq!(live.enum_values("missing").await.unwrap(), None);
}

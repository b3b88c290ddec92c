use super::*;
use al_db::DuckDbBackend;

async fn meta_db() -> DuckDbBackend {
    let db = DuckDbBackend::in_memory().unwrap();
    ensure(&db).await.unwrap();
    db
}

#[tokio::test]
async fn ensure_is_repeatable() {
    let db = meta_db().await;
    ensure(&db).await.unwrap();
    assert!(db.relation_exists("al_meta.schema_migrations").await.unwrap());
    assert!(db.relation_exists("al_meta.constraints").await.unwrap());
    assert!(db.relation_exists("al_meta.enum_values").await.unwrap());
}

#[tokio::test]
async fn constraints_round_trip_through_registry() {
    let db = meta_db().await;
    let constraints = vec![
        Constraint::check("reviews_rating_check", "reviews", "rating", "rating BETWEEN 1 AND 5"),
        Constraint::foreign_key("messages", "conversation_id", "conversations", OnDelete::Cascade),
        Constraint::unique("users", "email"),
        Constraint::enum_binding("users", "role", "user_role"),
    ];
    for c in &constraints {
        db.execute(&insert_constraint_sql(c)).await.unwrap();
    }

    let mut read = read_constraints(&db).await.unwrap();
    let mut expected = constraints.clone();
    read.sort_by(|a, b| a.name.cmp(&b.name));
    expected.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(read, expected);
}

#[tokio::test]
async fn renames_rewrite_both_sides_of_foreign_keys() {
    let db = meta_db().await;
    let fk = Constraint::foreign_key(
        "notifications",
        "test_drive_request_id",
        "test_drive_requests",
        OnDelete::Cascade,
    );
    db.execute(&insert_constraint_sql(&fk)).await.unwrap();

    db.execute_batch(&rename_table_sql("notifications", "test_drive_notifications"))
        .await
        .unwrap();
    db.execute_batch(&rename_column_sql("test_drive_requests", "id", "request_id"))
        .await
        .unwrap();

    let read = read_constraints(&db).await.unwrap();
    assert_eq!(read[0].table, "test_drive_notifications");
    match &read[0].kind {
        ConstraintKind::ForeignKey { ref_column, .. } => assert_eq!(ref_column, "request_id"),
        other => panic!("unexpected kind {other:?}"),
    }
}

#[tokio::test]
async fn enums_keep_declaration_order() {
    let db = meta_db().await;
    db.execute(&insert_enum_sql(
        "user_role",
        &["user".to_string(), "admin".to_string()],
    ))
    .await
    .unwrap();
    db.execute(&add_enum_value_sql("user_role", "dealer", 2))
        .await
        .unwrap();

    let enums = read_enums(&db).await.unwrap();
    assert_eq!(enums["user_role"], ["user", "admin", "dealer"]);

    db.execute(&delete_enum_sql("user_role")).await.unwrap();
    assert!(read_enums(&db).await.unwrap().is_empty());
}

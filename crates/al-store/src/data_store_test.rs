use super::*;
use crate::entities::UserRole;
use crate::migrations::marketplace_migrations;
use al_db::DuckDbBackend;
use al_schema::{apply_op, ColumnDef, ColumnType, Constraint, MigrationRunner, SchemaOp};

async fn installed() -> DuckDbBackend {
    let db = DuckDbBackend::in_memory().unwrap();
    MigrationRunner::new(&db, marketplace_migrations().unwrap())
        .unwrap()
        .apply_pending()
        .await
        .unwrap();
    db
}

async fn user(store: &DataStore<'_>, email: &str) -> String {
    store
        .insert(
            tables::USERS,
            record([("email", email), ("password", "hash")]),
        )
        .await
        .unwrap()
}

async fn vehicle(store: &DataStore<'_>, dealer: &str, slug: &str) -> String {
    store
        .insert(
            tables::VEHICLES,
            record([("dealer_id", dealer), ("slug", slug)]),
        )
        .await
        .unwrap()
}

fn assert_integrity<T: std::fmt::Debug>(result: StoreResult<T>) {
    match result {
        Err(StoreError::IntegrityViolation { .. }) => {}
        other => panic!("expected integrity violation, got {other:?}"),
    }
}

#[tokio::test]
async fn insert_assigns_id_and_timestamps() {
    let db = installed().await;
    let store = DataStore::new(&db);

    let id = user(&store, "ada@example.com").await;
    assert!(Uuid::parse_str(&id).is_ok());

    let row = store.get(tables::USERS, &id).await.unwrap().unwrap();
    assert_eq!(row["email"], Value::from("ada@example.com"));
    assert_eq!(row["role"], Value::from("user"));
    assert!(row["created_at"].as_timestamp().is_some());
    assert!(row["updated_at"].as_timestamp().is_some());
}

#[tokio::test]
async fn explicit_id_must_be_unique() {
    let db = installed().await;
    let store = DataStore::new(&db);
    let row = || record([("id", "u1"), ("email", "a@x"), ("password", "p")]);

    assert_eq!(store.insert(tables::USERS, row()).await.unwrap(), "u1");
    let mut again = row();
    again.insert("email".into(), Value::from("b@x"));
    assert_integrity(store.insert(tables::USERS, again).await);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let db = installed().await;
    let store = DataStore::new(&db);
    user(&store, "dup@example.com").await;

    assert_integrity(
        store
            .insert(
                tables::USERS,
                record([("email", "dup@example.com"), ("password", "p")]),
            )
            .await,
    );
    assert_eq!(store.count(tables::USERS).await.unwrap(), 1);
}

#[tokio::test]
async fn rejected_insert_leaves_no_open_transaction() {
    let db = installed().await;
    let store = DataStore::new(&db);
    user(&store, "dup@example.com").await;

    assert_integrity(
        store
            .insert(
                tables::USERS,
                record([("email", "dup@example.com"), ("password", "p")]),
            )
            .await,
    );
    // Fails inside the store on NOT NULL, after the registry checks passed.
    assert_integrity(
        store
            .insert(tables::USERS, record([("email", "nopass@example.com")]))
            .await,
    );

    db.begin().await.unwrap();
    db.rollback().await.unwrap();
    user(&store, "next@example.com").await;
    assert_eq!(store.count(tables::USERS).await.unwrap(), 2);
}

#[tokio::test]
async fn enum_values_are_checked() {
    let db = installed().await;
    let store = DataStore::new(&db);

    assert_integrity(
        store
            .insert(
                tables::USERS,
                record([("email", "x@x"), ("password", "p"), ("role", "superuser")]),
            )
            .await,
    );
    let detailer = store
        .insert(
            tables::USERS,
            record([
                ("email", Value::from("d@x")),
                ("password", Value::from("p")),
                ("role", UserRole::Detailer.into()),
            ]),
        )
        .await
        .unwrap();
    let row = store.get(tables::USERS, &detailer).await.unwrap().unwrap();
    assert_eq!(row["role"], Value::from("detailer"));
}

#[tokio::test]
async fn foreign_key_target_must_exist() {
    let db = installed().await;
    let store = DataStore::new(&db);

    assert_integrity(
        store
            .insert(
                tables::VEHICLES,
                record([("dealer_id", "nobody"), ("slug", "s")]),
            )
            .await,
    );
}

#[tokio::test]
async fn not_null_and_check_come_from_the_store() {
    let db = installed().await;
    let store = DataStore::new(&db);
    let a = user(&store, "a@x").await;
    let b = user(&store, "b@x").await;

    assert_integrity(
        store
            .insert(tables::USERS, record([("email", "no-password@x")]))
            .await,
    );

    let review = |rating: i64| {
        let mut row = record([("reviewer_id", a.as_str()), ("reviewed_user_id", b.as_str())]);
        row.insert("rating".into(), Value::Int(rating));
        row
    };
    assert_integrity(store.insert(tables::REVIEWS, review(6)).await);
    assert_integrity(store.insert(tables::REVIEWS, review(0)).await);
    store.insert(tables::REVIEWS, review(5)).await.unwrap();
    assert_eq!(store.count(tables::REVIEWS).await.unwrap(), 1);
}

#[tokio::test]
async fn unknown_table_and_column() {
    let db = installed().await;
    let store = DataStore::new(&db);

    assert!(matches!(
        store.insert("garages", Record::new()).await,
        Err(StoreError::UnknownTable(_))
    ));
    assert!(matches!(
        store
            .insert(tables::USERS, record([("nickname", "x")]))
            .await,
        Err(StoreError::UnknownColumn { .. })
    ));
    assert!(matches!(
        store.find_by(tables::USERS, "kilometres", &Value::Null).await,
        Err(StoreError::UnknownColumn { .. })
    ));
}

#[tokio::test]
async fn update_changes_row_and_keeps_uniqueness() {
    let db = installed().await;
    let store = DataStore::new(&db);
    let a = user(&store, "a@x").await;
    user(&store, "b@x").await;

    store
        .update(tables::USERS, &a, record([("first_name", "Ada")]))
        .await
        .unwrap();
    // Re-writing its own email is not a duplicate.
    store
        .update(tables::USERS, &a, record([("email", "a@x")]))
        .await
        .unwrap();
    assert_integrity(
        store
            .update(tables::USERS, &a, record([("email", "b@x")]))
            .await,
    );
    assert_integrity(store.update(tables::USERS, &a, record([("id", "other")])).await);

    let row = store.get(tables::USERS, &a).await.unwrap().unwrap();
    assert_eq!(row["first_name"], Value::from("Ada"));
    assert!(matches!(
        store
            .update(tables::USERS, "missing", record([("first_name", "x")]))
            .await,
        Err(StoreError::NotFound { .. })
    ));
}

#[tokio::test]
async fn find_by_value_and_null() {
    let db = installed().await;
    let store = DataStore::new(&db);
    let dealer = user(&store, "dealer@x").await;
    vehicle(&store, &dealer, "a").await;
    let b = vehicle(&store, &dealer, "b").await;
    store
        .update(tables::VEHICLES, &b, record([("city", "Leeds")]))
        .await
        .unwrap();

    let in_leeds = store
        .find_by(tables::VEHICLES, "city", &Value::from("Leeds"))
        .await
        .unwrap();
    assert_eq!(in_leeds.len(), 1);
    assert_eq!(in_leeds[0]["slug"], Value::from("b"));

    let no_city = store
        .find_by(tables::VEHICLES, "city", &Value::Null)
        .await
        .unwrap();
    assert_eq!(no_city.len(), 1);
}

#[tokio::test]
async fn deleting_a_conversation_cascades_to_messages() {
    let db = installed().await;
    let store = DataStore::new(&db);
    let a = user(&store, "a@x").await;
    let b = user(&store, "b@x").await;
    let conversation = store
        .insert(
            tables::CONVERSATIONS,
            record([("user1_id", a.as_str()), ("user2_id", b.as_str())]),
        )
        .await
        .unwrap();
    for content in ["hi", "hello"] {
        store
            .insert(
                tables::MESSAGES,
                record([
                    ("sender_id", a.as_str()),
                    ("receiver_id", b.as_str()),
                    ("conversation_id", conversation.as_str()),
                    ("content", content),
                ]),
            )
            .await
            .unwrap();
    }

    assert_eq!(store.delete(tables::CONVERSATIONS, &conversation).await.unwrap(), 3);
    assert_eq!(store.count(tables::MESSAGES).await.unwrap(), 0);
    assert_eq!(store.count(tables::USERS).await.unwrap(), 2);
}

#[tokio::test]
async fn deleting_a_user_cascades_through_vehicles() {
    let db = installed().await;
    let store = DataStore::new(&db);
    let dealer = user(&store, "dealer@x").await;
    let reporter = user(&store, "reporter@x").await;
    let car = vehicle(&store, &dealer, "car").await;
    store
        .insert(
            tables::REPORTED_CONTENTS,
            record([("vehicle_id", car.as_str()), ("user_id", reporter.as_str())]),
        )
        .await
        .unwrap();

    store.delete(tables::USERS, &dealer).await.unwrap();
    assert_eq!(store.count(tables::VEHICLES).await.unwrap(), 0);
    assert_eq!(store.count(tables::REPORTED_CONTENTS).await.unwrap(), 0);
    assert_eq!(store.count(tables::USERS).await.unwrap(), 1);
}

#[tokio::test]
async fn deleting_a_reporter_nulls_the_report() {
    let db = installed().await;
    let store = DataStore::new(&db);
    let dealer = user(&store, "dealer@x").await;
    let reporter = user(&store, "reporter@x").await;
    let car = vehicle(&store, &dealer, "car").await;
    let report = store
        .insert(
            tables::REPORTED_CONTENTS,
            record([("vehicle_id", car.as_str()), ("user_id", reporter.as_str())]),
        )
        .await
        .unwrap();

    assert_eq!(store.delete(tables::USERS, &reporter).await.unwrap(), 1);
    let row = store
        .get(tables::REPORTED_CONTENTS, &report)
        .await
        .unwrap()
        .unwrap();
    assert!(row["user_id"].is_null());
}

#[tokio::test]
async fn restrict_blocks_delete_and_rolls_back() {
    let db = installed().await;
    let store = DataStore::new(&db);
    let buyer = user(&store, "buyer@x").await;
    let mut package = record([("package_name", "Gold"), ("package_category", "dealer")]);
    package.insert("price".into(), Value::Float(49.0));
    let package = store.insert(tables::PACKAGES, package).await.unwrap();
    store
        .insert(
            tables::SUBSCRIPTIONS,
            record([("user_id", buyer.as_str()), ("package_id", package.as_str())]),
        )
        .await
        .unwrap();

    assert_integrity(store.delete(tables::PACKAGES, &package).await);
    assert_eq!(store.count(tables::PACKAGES).await.unwrap(), 1);
    assert_eq!(store.count(tables::SUBSCRIPTIONS).await.unwrap(), 1);

    // Cascading the subscription away through its user unblocks the package.
    store.delete(tables::USERS, &buyer).await.unwrap();
    assert_eq!(store.delete(tables::PACKAGES, &package).await.unwrap(), 1);
}

#[tokio::test]
async fn cascade_through_a_reference_cycle_terminates() {
    let db = DuckDbBackend::in_memory().unwrap();
    apply_op(
        &db,
        &SchemaOp::create_table(
            "nodes",
            [ColumnDef::id(), ColumnDef::new("parent_id", ColumnType::Text)],
            [Constraint::foreign_key("nodes", "parent_id", "nodes", OnDelete::Cascade)],
        ),
    )
    .await
    .unwrap();
    let store = DataStore::new(&db);
    let a = store
        .insert("nodes", record([("id", "a")]))
        .await
        .unwrap();
    let b = store
        .insert("nodes", record([("id", "b"), ("parent_id", "a")]))
        .await
        .unwrap();
    store
        .update("nodes", &a, record([("parent_id", b.as_str())]))
        .await
        .unwrap();

    assert_eq!(store.delete("nodes", &a).await.unwrap(), 2);
    assert_eq!(store.count("nodes").await.unwrap(), 0);
}

#[tokio::test]
async fn delete_missing_row() {
    let db = installed().await;
    let store = DataStore::new(&db);
    assert!(matches!(
        store.delete(tables::USERS, "missing").await,
        Err(StoreError::NotFound { .. })
    ));
}

#[tokio::test]
async fn referral_status_moves_forward_only() {
    let db = installed().await;
    let store = DataStore::new(&db);
    let customer = user(&store, "c@x").await;
    let referral = store
        .insert(
            tables::REFERRALS,
            record([("customer_id", customer.as_str()), ("job_type", "detailer")]),
        )
        .await
        .unwrap();

    store
        .set_referral_status(&referral, ReferralStatus::Completed)
        .await
        .unwrap();
    let row = store.get(tables::REFERRALS, &referral).await.unwrap().unwrap();
    assert_eq!(row["status"], Value::from("completed"));

    assert_integrity(
        store
            .set_referral_status(&referral, ReferralStatus::InProgress)
            .await,
    );
}

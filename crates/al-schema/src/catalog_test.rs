use super::*;
use crate::types::{ColumnType, DefaultValue, OnDelete};

fn conversations_and_messages() -> Catalog {
    let mut catalog = Catalog::new();
    catalog
        .apply(&SchemaOp::create_table(
            "conversations",
            [ColumnDef::id(), ColumnDef::new("title", ColumnType::Text)],
            [],
        ))
        .unwrap();
    catalog
        .apply(&SchemaOp::create_table(
            "messages",
            [
                ColumnDef::id(),
                ColumnDef::new("conversation_id", ColumnType::Text).not_null(),
                ColumnDef::new("body", ColumnType::Text),
            ],
            [Constraint::foreign_key(
                "messages",
                "conversation_id",
                "conversations",
                OnDelete::Cascade,
            )],
        ))
        .unwrap();
    catalog
}

fn rejected(result: SchemaResult<OpOutcome>) -> bool {
    matches!(result, Err(SchemaError::SchemaOperation { .. }))
}

#[test]
fn create_table_records_columns_and_constraints() {
    let catalog = conversations_and_messages();
    let body = catalog.column("messages", "body").unwrap();
    assert_eq!(body.data_type, "VARCHAR");
    assert!(body.nullable);
    assert!(!catalog.column("messages", "id").unwrap().nullable);
    assert!(catalog.constraint("messages_conversation_id_fkey").is_some());
}

#[test]
fn create_table_twice_is_skipped() {
    let mut catalog = conversations_and_messages();
    let outcome = catalog
        .apply(&SchemaOp::create_table("conversations", [ColumnDef::id()], []))
        .unwrap();
    assert!(matches!(outcome, OpOutcome::Skipped(_)));
}

#[test]
fn drop_table_referenced_by_foreign_key_is_rejected() {
    let mut catalog = conversations_and_messages();
    assert!(rejected(catalog.apply(&SchemaOp::drop_table("conversations"))));

    catalog.apply(&SchemaOp::drop_table("messages")).unwrap();
    assert!(catalog.constraint("messages_conversation_id_fkey").is_none());
    catalog.apply(&SchemaOp::drop_table("conversations")).unwrap();
    assert!(catalog.tables.is_empty());
}

#[test]
fn rename_table_moves_constraints() {
    let mut catalog = conversations_and_messages();
    catalog
        .apply(&SchemaOp::rename_table("conversations", "threads"))
        .unwrap();
    let fk = catalog.constraint("messages_conversation_id_fkey").unwrap();
    assert!(fk.references_table("threads"));

    let again = catalog
        .apply(&SchemaOp::rename_table("conversations", "threads"))
        .unwrap();
    assert!(matches!(again, OpOutcome::Skipped(_)));
    assert!(rejected(
        catalog.apply(&SchemaOp::rename_table("nowhere", "nothing"))
    ));
}

#[test]
fn rename_table_rejected_when_both_exist() {
    let mut catalog = conversations_and_messages();
    assert!(rejected(
        catalog.apply(&SchemaOp::rename_table("conversations", "messages"))
    ));
}

#[test]
fn add_column_guards() {
    let mut catalog = conversations_and_messages();
    let column = ColumnDef::new("last_message_at", ColumnType::Timestamp);
    catalog
        .apply(&SchemaOp::add_column("conversations", column.clone()))
        .unwrap();
    let again = catalog
        .apply(&SchemaOp::add_column("conversations", column.clone()))
        .unwrap();
    assert!(matches!(again, OpOutcome::Skipped(_)));
    assert!(rejected(catalog.apply(&SchemaOp::add_column("missing", column))));
}

#[test]
fn remove_column_rejects_constrained_columns() {
    let mut catalog = conversations_and_messages();
    assert!(rejected(
        catalog.apply(&SchemaOp::remove_column("messages", "conversation_id"))
    ));
    assert!(rejected(catalog.apply(&SchemaOp::remove_column("messages", "id"))));

    catalog
        .apply(&SchemaOp::remove_column("messages", "body"))
        .unwrap();
    let again = catalog
        .apply(&SchemaOp::remove_column("messages", "body"))
        .unwrap();
    assert!(matches!(again, OpOutcome::Skipped(_)));
}

#[test]
fn rename_column_updates_constraint_column() {
    let mut catalog = conversations_and_messages();
    catalog
        .apply(&SchemaOp::rename_column("messages", "conversation_id", "thread_id"))
        .unwrap();
    let fk = catalog.constraint("messages_conversation_id_fkey").unwrap();
    assert_eq!(fk.column(), "thread_id");
    assert!(catalog.column("messages", "thread_id").is_some());
    assert!(catalog.column("messages", "conversation_id").is_none());
}

#[test]
fn enum_columns_bind_and_validate_defaults() {
    let mut catalog = Catalog::new();
    catalog
        .apply(&SchemaOp::create_enum("vehicle_status", &["live", "draft", "sold"]))
        .unwrap();
    let bad = SchemaOp::create_table(
        "vehicles",
        [
            ColumnDef::id(),
            ColumnDef::new("status", ColumnType::enumeration("vehicle_status"))
                .default(DefaultValue::text("archived")),
        ],
        [],
    );
    assert!(rejected(catalog.apply(&bad)));

    catalog
        .apply(&SchemaOp::create_table(
            "vehicles",
            [
                ColumnDef::id(),
                ColumnDef::new("status", ColumnType::enumeration("vehicle_status"))
                    .default(DefaultValue::text("draft")),
            ],
            [],
        ))
        .unwrap();
    assert!(catalog.enum_binding("vehicles", "status").is_some());
    assert!(rejected(catalog.apply(&SchemaOp::drop_enum("vehicle_status"))));

    catalog
        .apply(&SchemaOp::remove_column("vehicles", "status"))
        .unwrap();
    assert!(catalog.enum_binding("vehicles", "status").is_none());
    catalog.apply(&SchemaOp::drop_enum("vehicle_status")).unwrap();
}

#[test]
fn lookups_outlive_their_keys() {
    let mut catalog = conversations_and_messages();
    catalog
        .apply(&SchemaOp::create_enum("message_kind", &["text", "image"]))
        .unwrap();
    catalog
        .apply(&SchemaOp::add_column(
            "messages",
            ColumnDef::new("kind", ColumnType::enumeration("message_kind")),
        ))
        .unwrap();

    let binding = {
        let table = String::from("messages");
        let column = String::from("kind");
        catalog.enum_binding(&table, &column)
    };
    assert!(matches!(
        &binding.unwrap().kind,
        ConstraintKind::EnumBinding { column, .. } if column == "kind"
    ));
    assert!(catalog.enum_binding("messages", "body").is_none());

    let owned: Vec<&Constraint> = {
        let table = String::from("messages");
        catalog.constraints_on(&table).collect()
    };
    assert_eq!(owned.len(), 2);
}

#[test]
fn enum_values_are_append_only_and_deduplicated() {
    let mut catalog = Catalog::new();
    catalog
        .apply(&SchemaOp::create_enum("user_role", &["user", "admin"]))
        .unwrap();
    catalog
        .apply(&SchemaOp::add_enum_value("user_role", "detailer"))
        .unwrap();
    let again = catalog
        .apply(&SchemaOp::add_enum_value("user_role", "detailer"))
        .unwrap();
    assert!(matches!(again, OpOutcome::Skipped(_)));
    assert_eq!(
        catalog.enum_values("user_role").unwrap(),
        ["user", "admin", "detailer"]
    );
    assert!(rejected(
        catalog.apply(&SchemaOp::create_enum("empty", &[]))
    ));
    assert!(rejected(
        catalog.apply(&SchemaOp::create_enum("dup", &["a", "a"]))
    ));
}

#[test]
fn change_column_type_skips_when_unchanged() {
    let mut catalog = Catalog::new();
    catalog
        .apply(&SchemaOp::create_table(
            "vehicles",
            [
                ColumnDef::id(),
                ColumnDef::new("price", ColumnType::decimal(10, 2)),
            ],
            [],
        ))
        .unwrap();
    let widen = SchemaOp::change_column_type("vehicles", "price", ColumnType::decimal(12, 2));
    assert_eq!(catalog.apply(&widen).unwrap(), OpOutcome::Applied);
    assert!(matches!(catalog.apply(&widen).unwrap(), OpOutcome::Skipped(_)));
    assert_eq!(
        catalog.column("vehicles", "price").unwrap().data_type,
        "DECIMAL(12,2)"
    );
}

#[test]
fn nullability_toggles_are_idempotent() {
    let mut catalog = conversations_and_messages();
    let drop = SchemaOp::drop_not_null("messages", "conversation_id");
    assert_eq!(catalog.apply(&drop).unwrap(), OpOutcome::Applied);
    assert!(matches!(catalog.apply(&drop).unwrap(), OpOutcome::Skipped(_)));
    assert!(rejected(catalog.apply(&SchemaOp::drop_not_null("messages", "id"))));
}

#[test]
fn constraints_add_and_drop_by_name() {
    let mut catalog = conversations_and_messages();
    let unique = Constraint::unique("conversations", "title");
    catalog
        .apply(&SchemaOp::add_constraint(unique.clone()))
        .unwrap();
    assert!(matches!(
        catalog.apply(&SchemaOp::add_constraint(unique)).unwrap(),
        OpOutcome::Skipped(_)
    ));
    catalog
        .apply(&SchemaOp::drop_constraint("conversations_title_key"))
        .unwrap();
    assert!(matches!(
        catalog
            .apply(&SchemaOp::drop_constraint("conversations_title_key"))
            .unwrap(),
        OpOutcome::Skipped(_)
    ));
}

#[test]
fn table_order_puts_parents_first() {
    let catalog = conversations_and_messages();
    let order = catalog.table_order().unwrap();
    let parent = order.iter().position(|t| t == "conversations").unwrap();
    let child = order.iter().position(|t| t == "messages").unwrap();
    assert!(parent < child);
}

#[test]
fn table_order_detects_cycles() {
    let mut catalog = conversations_and_messages();
    catalog
        .apply(&SchemaOp::add_column(
            "conversations",
            ColumnDef::new("pinned_message_id", ColumnType::Text),
        ))
        .unwrap();
    catalog
        .apply(&SchemaOp::add_constraint(Constraint::foreign_key(
            "conversations",
            "pinned_message_id",
            "messages",
            OnDelete::SetNull,
        )))
        .unwrap();
    assert!(matches!(
        catalog.table_order(),
        Err(SchemaError::CircularDependency(_))
    ));
}

#[test]
fn without_enum_values_keeps_enum_names() {
    let mut catalog = Catalog::new();
    catalog
        .apply(&SchemaOp::create_enum("ad_type", &["featured", "sponsored"]))
        .unwrap();
    let stripped = catalog.without_enum_values();
    assert_eq!(stripped.enums.get("ad_type"), Some(&Vec::new()));
}

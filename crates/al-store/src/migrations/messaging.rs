use super::{entity, reference, text};
use al_schema::{
    ColumnDef, ColumnType, Constraint, DefaultValue, Migration, OnDelete, SchemaOp, SchemaResult,
};

pub(super) fn migrations() -> SchemaResult<Vec<Migration>> {
    Ok(vec![
        Migration::new(
            "20231122100000-create-conversations",
            vec![SchemaOp::create_table(
                "conversations",
                entity([reference("user1_id"), reference("user2_id")]),
                [
                    Constraint::foreign_key("conversations", "user1_id", "users", OnDelete::Cascade),
                    Constraint::foreign_key("conversations", "user2_id", "users", OnDelete::Cascade),
                ],
            )],
        )?
        .with_down(vec![SchemaOp::drop_table("conversations")]),
        Migration::new(
            "20231122103000-create-messages",
            vec![SchemaOp::create_table(
                "messages",
                entity([
                    reference("sender_id"),
                    reference("receiver_id"),
                    reference("conversation_id"),
                    text("content").not_null(),
                    ColumnDef::new("is_read", ColumnType::Boolean)
                        .not_null()
                        .default(DefaultValue::Bool(false)),
                ]),
                [
                    Constraint::foreign_key(
                        "messages",
                        "conversation_id",
                        "conversations",
                        OnDelete::Cascade,
                    ),
                    Constraint::foreign_key("messages", "sender_id", "users", OnDelete::Cascade),
                    Constraint::foreign_key("messages", "receiver_id", "users", OnDelete::Cascade),
                ],
            )],
        )?
        .with_down(vec![SchemaOp::drop_table("messages")]),
        Migration::new(
            "20240125110000-add-last-message-at-to-conversations",
            vec![SchemaOp::add_column(
                "conversations",
                ColumnDef::new("last_message_at", ColumnType::Timestamp),
            )],
        )?
        .with_down(vec![SchemaOp::remove_column(
            "conversations",
            "last_message_at",
        )]),
    ])
}

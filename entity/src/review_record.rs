use sea_orm::entity::prelude::*;

/// A pending spam review awaiting staff action.
///
/// `review_id` is the Discord message ID of the staff alert, so each record
/// maps 1:1 to the message carrying the action buttons. The record is deleted
/// on resolution; deletion doubles as the atomic claim between racing
/// resolvers.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "review_record")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub review_id: String,
    pub actor_id: String,
    pub realm_id: String,
    pub created_at: DateTimeUtc,
    pub expires_at: DateTimeUtc,
    pub pattern_kind: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

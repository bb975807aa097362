use sea_orm::entity::prelude::*;

/// An active timed mute, keyed by (actor, guild).
///
/// Written when containment is applied, overwritten when staff confirm the
/// mute or the default action fires, and deleted when the mute is lifted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "mute_record")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub actor_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub realm_id: String,
    pub unmute_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

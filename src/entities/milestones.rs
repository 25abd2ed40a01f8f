use sea_orm::entity::prelude::*;

/// Keyed by (participant email, date); the pair may change under edit, so
/// updates locate rows via the pre-edit key.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "milestones")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub participant_email: String,

    /// ISO date string (YYYY-MM-DD)
    #[sea_orm(primary_key, auto_increment = false)]
    pub achieved_on: String,

    pub title: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

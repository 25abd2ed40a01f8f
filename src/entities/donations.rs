use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub participant_email: String,

    /// ISO date string (YYYY-MM-DD)
    #[sea_orm(primary_key, auto_increment = false)]
    pub donated_on: String,

    /// Bare numeric amount; currency symbols are stripped before save
    pub amount: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

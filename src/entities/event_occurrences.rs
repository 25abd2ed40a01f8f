use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "event_occurrences")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// References `event_templates.name` by value; deleting a template does
    /// not cascade to its occurrences.
    pub template_name: String,

    /// Canonical datetime string (YYYY-MM-DD HH:MM)
    pub starts_at: String,

    pub ends_at: Option<String>,

    pub location: Option<String>,

    pub capacity: Option<i32>,

    pub registration_deadline: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;

/// A reusable event kind; occurrences reference it by name.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "event_templates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,

    pub event_type: Option<String>,

    pub description: Option<String>,

    /// Free-form recurrence pattern ("weekly", "first Monday", ...)
    pub recurrence: Option<String>,

    pub default_capacity: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

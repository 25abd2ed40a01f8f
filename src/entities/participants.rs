use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "participants")]
pub struct Model {
    /// Natural key: participants are identified by email, not a surrogate id.
    #[sea_orm(primary_key, auto_increment = false)]
    pub email: String,

    pub first_name: String,

    pub last_name: String,

    /// ISO date string (YYYY-MM-DD)
    pub date_of_birth: Option<String>,

    pub role: Option<String>,

    pub phone: Option<String>,

    pub city: Option<String>,

    pub state: Option<String>,

    pub zip: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

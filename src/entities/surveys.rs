use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "surveys")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// References a participant by email value, without FK enforcement.
    pub participant_email: String,

    pub event_name: String,

    /// Canonical datetime string (YYYY-MM-DD HH:MM); formatted at render time
    pub occurrence_start: Option<String>,

    pub submitted_at: String,

    pub satisfaction_score: Option<f64>,

    pub usefulness_score: Option<f64>,

    pub instructor_score: Option<f64>,

    pub recommendation_score: Option<f64>,

    pub overall_score: Option<f64>,

    /// NPS classification ("Promoter", "Passive", "Detractor")
    pub nps_bucket: Option<String>,

    pub comments: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

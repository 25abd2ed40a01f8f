use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::db::search;
use crate::entities::{prelude::*, surveys};

/// Repository for event feedback surveys
pub struct SurveyRepository {
    conn: DatabaseConnection,
}

const SEARCH_COLUMNS: &[surveys::Column] = &[
    surveys::Column::Id,
    surveys::Column::ParticipantEmail,
    surveys::Column::EventName,
    surveys::Column::OccurrenceStart,
    surveys::Column::SubmittedAt,
    surveys::Column::SatisfactionScore,
    surveys::Column::UsefulnessScore,
    surveys::Column::InstructorScore,
    surveys::Column::RecommendationScore,
    surveys::Column::OverallScore,
    surveys::Column::NpsBucket,
    surveys::Column::Comments,
];

impl SurveyRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, search_term: Option<&str>) -> Result<Vec<Survey>> {
        let mut query = Surveys::find().order_by_asc(surveys::Column::Id);

        if let Some(condition) =
            search_term.and_then(|term| search::text_filter(SEARCH_COLUMNS, term))
        {
            query = query.filter(condition);
        }

        let rows = query.all(&self.conn).await?;
        Ok(rows.into_iter().map(Survey::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Survey>> {
        let row = Surveys::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Survey::from))
    }

    /// Insert a new survey, or update the row an existing id locates.
    /// `submitted_at` is stamped at insert and never rewritten.
    pub async fn save(&self, id: Option<i32>, input: &SurveyInput) -> Result<()> {
        if let Some(id) = id {
            Surveys::update_many()
                .col_expr(
                    surveys::Column::ParticipantEmail,
                    Expr::value(input.participant_email.clone()),
                )
                .col_expr(
                    surveys::Column::EventName,
                    Expr::value(input.event_name.clone()),
                )
                .col_expr(
                    surveys::Column::OccurrenceStart,
                    Expr::value(input.occurrence_start.clone()),
                )
                .col_expr(
                    surveys::Column::SatisfactionScore,
                    Expr::value(input.satisfaction_score),
                )
                .col_expr(
                    surveys::Column::UsefulnessScore,
                    Expr::value(input.usefulness_score),
                )
                .col_expr(
                    surveys::Column::InstructorScore,
                    Expr::value(input.instructor_score),
                )
                .col_expr(
                    surveys::Column::RecommendationScore,
                    Expr::value(input.recommendation_score),
                )
                .col_expr(surveys::Column::OverallScore, Expr::value(input.overall_score))
                .col_expr(
                    surveys::Column::NpsBucket,
                    Expr::value(input.nps_bucket.clone()),
                )
                .col_expr(surveys::Column::Comments, Expr::value(input.comments.clone()))
                .filter(surveys::Column::Id.eq(id))
                .exec(&self.conn)
                .await?;
        } else {
            let model = surveys::ActiveModel {
                participant_email: Set(input.participant_email.clone()),
                event_name: Set(input.event_name.clone()),
                occurrence_start: Set(input.occurrence_start.clone()),
                submitted_at: Set(chrono::Utc::now().to_rfc3339()),
                satisfaction_score: Set(input.satisfaction_score),
                usefulness_score: Set(input.usefulness_score),
                instructor_score: Set(input.instructor_score),
                recommendation_score: Set(input.recommendation_score),
                overall_score: Set(input.overall_score),
                nps_bucket: Set(input.nps_bucket.clone()),
                comments: Set(input.comments.clone()),
                ..Default::default()
            };
            Surveys::insert(model).exec(&self.conn).await?;
        }

        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Surveys::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Surveys::find().count(&self.conn).await?)
    }
}

// ============================================================================
// Data Types
// ============================================================================

#[derive(Debug, Clone)]
pub struct Survey {
    pub id: i32,
    pub participant_email: String,
    pub event_name: String,
    pub occurrence_start: Option<String>,
    pub submitted_at: String,
    pub satisfaction_score: Option<f64>,
    pub usefulness_score: Option<f64>,
    pub instructor_score: Option<f64>,
    pub recommendation_score: Option<f64>,
    pub overall_score: Option<f64>,
    pub nps_bucket: Option<String>,
    pub comments: Option<String>,
}

impl From<surveys::Model> for Survey {
    fn from(model: surveys::Model) -> Self {
        Self {
            id: model.id,
            participant_email: model.participant_email,
            event_name: model.event_name,
            occurrence_start: model.occurrence_start,
            submitted_at: model.submitted_at,
            satisfaction_score: model.satisfaction_score,
            usefulness_score: model.usefulness_score,
            instructor_score: model.instructor_score,
            recommendation_score: model.recommendation_score,
            overall_score: model.overall_score,
            nps_bucket: model.nps_bucket,
            comments: model.comments,
        }
    }
}

/// Cleaned field values ready to persist; blank scores arrive as `None`
#[derive(Debug, Clone)]
pub struct SurveyInput {
    pub participant_email: String,
    pub event_name: String,
    pub occurrence_start: Option<String>,
    pub satisfaction_score: Option<f64>,
    pub usefulness_score: Option<f64>,
    pub instructor_score: Option<f64>,
    pub recommendation_score: Option<f64>,
    pub overall_score: Option<f64>,
    pub nps_bucket: Option<String>,
    pub comments: Option<String>,
}

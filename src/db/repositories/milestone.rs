use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::db::search;
use crate::entities::{milestones, prelude::*};

/// Repository for milestones, keyed by (participant email, date)
pub struct MilestoneRepository {
    conn: DatabaseConnection,
}

const SEARCH_COLUMNS: &[milestones::Column] = &[
    milestones::Column::ParticipantEmail,
    milestones::Column::AchievedOn,
    milestones::Column::Title,
];

impl MilestoneRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, search_term: Option<&str>) -> Result<Vec<Milestone>> {
        let mut query = Milestones::find()
            .order_by_asc(milestones::Column::ParticipantEmail)
            .order_by_asc(milestones::Column::AchievedOn);

        if let Some(condition) =
            search_term.and_then(|term| search::text_filter(SEARCH_COLUMNS, term))
        {
            query = query.filter(condition);
        }

        let rows = query.all(&self.conn).await?;
        Ok(rows.into_iter().map(Milestone::from).collect())
    }

    pub async fn get(&self, email: &str, date: &str) -> Result<Option<Milestone>> {
        let row = Milestones::find_by_id((email.to_string(), date.to_string()))
            .one(&self.conn)
            .await?;
        Ok(row.map(Milestone::from))
    }

    /// Insert, or update the row located by the pre-edit key pair. Both key
    /// halves may change under edit.
    pub async fn save(&self, original: Option<(&str, &str)>, input: &MilestoneInput) -> Result<()> {
        if let Some((original_email, original_date)) = original {
            Milestones::update_many()
                .col_expr(
                    milestones::Column::ParticipantEmail,
                    Expr::value(input.participant_email.clone()),
                )
                .col_expr(
                    milestones::Column::AchievedOn,
                    Expr::value(input.achieved_on.clone()),
                )
                .col_expr(milestones::Column::Title, Expr::value(input.title.clone()))
                .filter(milestones::Column::ParticipantEmail.eq(original_email))
                .filter(milestones::Column::AchievedOn.eq(original_date))
                .exec(&self.conn)
                .await?;
        } else {
            let model = milestones::ActiveModel {
                participant_email: Set(input.participant_email.clone()),
                achieved_on: Set(input.achieved_on.clone()),
                title: Set(input.title.clone()),
            };
            Milestones::insert(model).exec(&self.conn).await?;
        }

        Ok(())
    }

    pub async fn delete(&self, email: &str, date: &str) -> Result<bool> {
        let result = Milestones::delete_many()
            .filter(milestones::Column::ParticipantEmail.eq(email))
            .filter(milestones::Column::AchievedOn.eq(date))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Milestones::find().count(&self.conn).await?)
    }
}

// ============================================================================
// Data Types
// ============================================================================

#[derive(Debug, Clone)]
pub struct Milestone {
    pub participant_email: String,
    pub achieved_on: String,
    pub title: String,
}

impl From<milestones::Model> for Milestone {
    fn from(model: milestones::Model) -> Self {
        Self {
            participant_email: model.participant_email,
            achieved_on: model.achieved_on,
            title: model.title,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MilestoneInput {
    pub participant_email: String,
    pub achieved_on: String,
    pub title: String,
}

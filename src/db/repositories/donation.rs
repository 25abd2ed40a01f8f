use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::db::search;
use crate::entities::{donations, prelude::*};

/// Repository for donations, keyed by (participant email, date)
pub struct DonationRepository {
    conn: DatabaseConnection,
}

const SEARCH_COLUMNS: &[donations::Column] = &[
    donations::Column::ParticipantEmail,
    donations::Column::DonatedOn,
    donations::Column::Amount,
];

impl DonationRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, search_term: Option<&str>) -> Result<Vec<Donation>> {
        let mut query = Donations::find()
            .order_by_asc(donations::Column::ParticipantEmail)
            .order_by_asc(donations::Column::DonatedOn);

        if let Some(condition) =
            search_term.and_then(|term| search::text_filter(SEARCH_COLUMNS, term))
        {
            query = query.filter(condition);
        }

        let rows = query.all(&self.conn).await?;
        Ok(rows.into_iter().map(Donation::from).collect())
    }

    pub async fn get(&self, email: &str, date: &str) -> Result<Option<Donation>> {
        let row = Donations::find_by_id((email.to_string(), date.to_string()))
            .one(&self.conn)
            .await?;
        Ok(row.map(Donation::from))
    }

    /// Insert, or update the row located by the pre-edit key pair.
    /// The amount is already cleaned to a bare numeric by the caller.
    pub async fn save(&self, original: Option<(&str, &str)>, input: &DonationInput) -> Result<()> {
        if let Some((original_email, original_date)) = original {
            Donations::update_many()
                .col_expr(
                    donations::Column::ParticipantEmail,
                    Expr::value(input.participant_email.clone()),
                )
                .col_expr(
                    donations::Column::DonatedOn,
                    Expr::value(input.donated_on.clone()),
                )
                .col_expr(donations::Column::Amount, Expr::value(input.amount))
                .filter(donations::Column::ParticipantEmail.eq(original_email))
                .filter(donations::Column::DonatedOn.eq(original_date))
                .exec(&self.conn)
                .await?;
        } else {
            let model = donations::ActiveModel {
                participant_email: Set(input.participant_email.clone()),
                donated_on: Set(input.donated_on.clone()),
                amount: Set(input.amount),
            };
            Donations::insert(model).exec(&self.conn).await?;
        }

        Ok(())
    }

    pub async fn delete(&self, email: &str, date: &str) -> Result<bool> {
        let result = Donations::delete_many()
            .filter(donations::Column::ParticipantEmail.eq(email))
            .filter(donations::Column::DonatedOn.eq(date))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Donations::find().count(&self.conn).await?)
    }
}

// ============================================================================
// Data Types
// ============================================================================

#[derive(Debug, Clone)]
pub struct Donation {
    pub participant_email: String,
    pub donated_on: String,
    pub amount: f64,
}

impl From<donations::Model> for Donation {
    fn from(model: donations::Model) -> Self {
        Self {
            participant_email: model.participant_email,
            donated_on: model.donated_on,
            amount: model.amount,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DonationInput {
    pub participant_email: String,
    pub donated_on: String,
    pub amount: f64,
}

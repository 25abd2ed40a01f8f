use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::db::search;
use crate::entities::{participants, prelude::*};

/// Repository for participant records, keyed by email
pub struct ParticipantRepository {
    conn: DatabaseConnection,
}

/// Columns the free-text search sweeps over
const SEARCH_COLUMNS: &[participants::Column] = &[
    participants::Column::Email,
    participants::Column::FirstName,
    participants::Column::LastName,
    participants::Column::DateOfBirth,
    participants::Column::Role,
    participants::Column::Phone,
    participants::Column::City,
    participants::Column::State,
    participants::Column::Zip,
];

impl ParticipantRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, search_term: Option<&str>) -> Result<Vec<Participant>> {
        let mut query = Participants::find().order_by_asc(participants::Column::Email);

        if let Some(condition) =
            search_term.and_then(|term| search::text_filter(SEARCH_COLUMNS, term))
        {
            query = query.filter(condition);
        }

        let rows = query.all(&self.conn).await?;
        Ok(rows.into_iter().map(Participant::from).collect())
    }

    pub async fn get(&self, email: &str) -> Result<Option<Participant>> {
        let row = Participants::find_by_id(email.to_string())
            .one(&self.conn)
            .await?;
        Ok(row.map(Participant::from))
    }

    /// Insert a new participant, or when `original_email` is supplied, update
    /// the row it locates. The email itself may change under edit; an update
    /// whose original key no longer exists touches zero rows.
    pub async fn save(&self, original_email: Option<&str>, input: &ParticipantInput) -> Result<()> {
        if let Some(original) = original_email {
            Participants::update_many()
                .col_expr(
                    participants::Column::Email,
                    Expr::value(input.email.clone()),
                )
                .col_expr(
                    participants::Column::FirstName,
                    Expr::value(input.first_name.clone()),
                )
                .col_expr(
                    participants::Column::LastName,
                    Expr::value(input.last_name.clone()),
                )
                .col_expr(
                    participants::Column::DateOfBirth,
                    Expr::value(input.date_of_birth.clone()),
                )
                .col_expr(participants::Column::Role, Expr::value(input.role.clone()))
                .col_expr(
                    participants::Column::Phone,
                    Expr::value(input.phone.clone()),
                )
                .col_expr(participants::Column::City, Expr::value(input.city.clone()))
                .col_expr(
                    participants::Column::State,
                    Expr::value(input.state.clone()),
                )
                .col_expr(participants::Column::Zip, Expr::value(input.zip.clone()))
                .filter(participants::Column::Email.eq(original))
                .exec(&self.conn)
                .await?;
        } else {
            let model = participants::ActiveModel {
                email: Set(input.email.clone()),
                first_name: Set(input.first_name.clone()),
                last_name: Set(input.last_name.clone()),
                date_of_birth: Set(input.date_of_birth.clone()),
                role: Set(input.role.clone()),
                phone: Set(input.phone.clone()),
                city: Set(input.city.clone()),
                state: Set(input.state.clone()),
                zip: Set(input.zip.clone()),
            };
            Participants::insert(model).exec(&self.conn).await?;
        }

        Ok(())
    }

    /// Deleting an absent email is a no-op and reports `false`.
    pub async fn delete(&self, email: &str) -> Result<bool> {
        let result = Participants::delete_by_id(email.to_string())
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Participants::find().count(&self.conn).await?)
    }
}

// ============================================================================
// Data Types
// ============================================================================

#[derive(Debug, Clone)]
pub struct Participant {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl From<participants::Model> for Participant {
    fn from(model: participants::Model) -> Self {
        Self {
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            date_of_birth: model.date_of_birth,
            role: model.role,
            phone: model.phone,
            city: model.city,
            state: model.state,
            zip: model.zip,
        }
    }
}

/// Cleaned field values ready to persist
#[derive(Debug, Clone)]
pub struct ParticipantInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

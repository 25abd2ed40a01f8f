use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::db::search;
use crate::entities::{event_occurrences, event_templates, prelude::*};

/// Repository for event templates and their scheduled occurrences.
/// Templates are keyed by name; occurrences by a surrogate id. Deleting a
/// template leaves its occurrences untouched.
pub struct EventRepository {
    conn: DatabaseConnection,
}

const TEMPLATE_SEARCH_COLUMNS: &[event_templates::Column] = &[
    event_templates::Column::Name,
    event_templates::Column::EventType,
    event_templates::Column::Description,
    event_templates::Column::Recurrence,
    event_templates::Column::DefaultCapacity,
];

const OCCURRENCE_SEARCH_COLUMNS: &[event_occurrences::Column] = &[
    event_occurrences::Column::Id,
    event_occurrences::Column::TemplateName,
    event_occurrences::Column::StartsAt,
    event_occurrences::Column::EndsAt,
    event_occurrences::Column::Location,
    event_occurrences::Column::Capacity,
    event_occurrences::Column::RegistrationDeadline,
];

impl EventRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Templates
    // ========================================================================

    pub async fn list_templates(&self, search_term: Option<&str>) -> Result<Vec<EventTemplate>> {
        let mut query = EventTemplates::find().order_by_asc(event_templates::Column::Name);

        if let Some(condition) =
            search_term.and_then(|term| search::text_filter(TEMPLATE_SEARCH_COLUMNS, term))
        {
            query = query.filter(condition);
        }

        let rows = query.all(&self.conn).await?;
        Ok(rows.into_iter().map(EventTemplate::from).collect())
    }

    pub async fn get_template(&self, name: &str) -> Result<Option<EventTemplate>> {
        let row = EventTemplates::find_by_id(name.to_string())
            .one(&self.conn)
            .await?;
        Ok(row.map(EventTemplate::from))
    }

    pub async fn template_exists(&self, name: &str) -> Result<bool> {
        Ok(self.get_template(name).await?.is_some())
    }

    pub async fn save_template(
        &self,
        original_name: Option<&str>,
        input: &EventTemplateInput,
    ) -> Result<()> {
        if let Some(original) = original_name {
            EventTemplates::update_many()
                .col_expr(event_templates::Column::Name, Expr::value(input.name.clone()))
                .col_expr(
                    event_templates::Column::EventType,
                    Expr::value(input.event_type.clone()),
                )
                .col_expr(
                    event_templates::Column::Description,
                    Expr::value(input.description.clone()),
                )
                .col_expr(
                    event_templates::Column::Recurrence,
                    Expr::value(input.recurrence.clone()),
                )
                .col_expr(
                    event_templates::Column::DefaultCapacity,
                    Expr::value(input.default_capacity),
                )
                .filter(event_templates::Column::Name.eq(original))
                .exec(&self.conn)
                .await?;
        } else {
            let model = event_templates::ActiveModel {
                name: Set(input.name.clone()),
                event_type: Set(input.event_type.clone()),
                description: Set(input.description.clone()),
                recurrence: Set(input.recurrence.clone()),
                default_capacity: Set(input.default_capacity),
            };
            EventTemplates::insert(model).exec(&self.conn).await?;
        }

        Ok(())
    }

    pub async fn delete_template(&self, name: &str) -> Result<bool> {
        let result = EventTemplates::delete_by_id(name.to_string())
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count_templates(&self) -> Result<u64> {
        Ok(EventTemplates::find().count(&self.conn).await?)
    }

    // ========================================================================
    // Occurrences
    // ========================================================================

    pub async fn list_occurrences(&self, search_term: Option<&str>) -> Result<Vec<EventOccurrence>> {
        let mut query = EventOccurrences::find().order_by_asc(event_occurrences::Column::StartsAt);

        if let Some(condition) =
            search_term.and_then(|term| search::text_filter(OCCURRENCE_SEARCH_COLUMNS, term))
        {
            query = query.filter(condition);
        }

        let rows = query.all(&self.conn).await?;
        Ok(rows.into_iter().map(EventOccurrence::from).collect())
    }

    pub async fn get_occurrence(&self, id: i32) -> Result<Option<EventOccurrence>> {
        let row = EventOccurrences::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(EventOccurrence::from))
    }

    pub async fn save_occurrence(&self, id: Option<i32>, input: &EventOccurrenceInput) -> Result<()> {
        if let Some(id) = id {
            EventOccurrences::update_many()
                .col_expr(
                    event_occurrences::Column::TemplateName,
                    Expr::value(input.template_name.clone()),
                )
                .col_expr(
                    event_occurrences::Column::StartsAt,
                    Expr::value(input.starts_at.clone()),
                )
                .col_expr(
                    event_occurrences::Column::EndsAt,
                    Expr::value(input.ends_at.clone()),
                )
                .col_expr(
                    event_occurrences::Column::Location,
                    Expr::value(input.location.clone()),
                )
                .col_expr(event_occurrences::Column::Capacity, Expr::value(input.capacity))
                .col_expr(
                    event_occurrences::Column::RegistrationDeadline,
                    Expr::value(input.registration_deadline.clone()),
                )
                .filter(event_occurrences::Column::Id.eq(id))
                .exec(&self.conn)
                .await?;
        } else {
            let model = event_occurrences::ActiveModel {
                template_name: Set(input.template_name.clone()),
                starts_at: Set(input.starts_at.clone()),
                ends_at: Set(input.ends_at.clone()),
                location: Set(input.location.clone()),
                capacity: Set(input.capacity),
                registration_deadline: Set(input.registration_deadline.clone()),
                ..Default::default()
            };
            EventOccurrences::insert(model).exec(&self.conn).await?;
        }

        Ok(())
    }

    pub async fn delete_occurrence(&self, id: i32) -> Result<bool> {
        let result = EventOccurrences::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count_occurrences(&self) -> Result<u64> {
        Ok(EventOccurrences::find().count(&self.conn).await?)
    }
}

// ============================================================================
// Data Types
// ============================================================================

#[derive(Debug, Clone)]
pub struct EventTemplate {
    pub name: String,
    pub event_type: Option<String>,
    pub description: Option<String>,
    pub recurrence: Option<String>,
    pub default_capacity: Option<i32>,
}

impl From<event_templates::Model> for EventTemplate {
    fn from(model: event_templates::Model) -> Self {
        Self {
            name: model.name,
            event_type: model.event_type,
            description: model.description,
            recurrence: model.recurrence,
            default_capacity: model.default_capacity,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventTemplateInput {
    pub name: String,
    pub event_type: Option<String>,
    pub description: Option<String>,
    pub recurrence: Option<String>,
    pub default_capacity: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct EventOccurrence {
    pub id: i32,
    pub template_name: String,
    pub starts_at: String,
    pub ends_at: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<String>,
}

impl From<event_occurrences::Model> for EventOccurrence {
    fn from(model: event_occurrences::Model) -> Self {
        Self {
            id: model.id,
            template_name: model.template_name,
            starts_at: model.starts_at,
            ends_at: model.ends_at,
            location: model.location,
            capacity: model.capacity,
            registration_deadline: model.registration_deadline,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventOccurrenceInput {
    pub template_name: String,
    pub starts_at: String,
    pub ends_at: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub registration_deadline: Option<String>,
}

use crate::entities::prelude::*;
use crate::entities::users;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Development accounts seeded at first startup; rotate these before any
/// real deployment.
const SEED_USERS: &[(&str, &str, &str)] = &[
    ("admin", "admin123", "M"),
    ("user", "user123", "U"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(Participants)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(EventTemplates)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(EventOccurrences)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(Surveys)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(Milestones)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(Donations)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        let now = chrono::Utc::now().to_rfc3339();

        for (username, password, role) in SEED_USERS {
            let password_hash = crate::db::repositories::user::hash_password(password, None)
                .map_err(|e| DbErr::Migration(e.to_string()))?;

            let insert = sea_orm_migration::sea_query::Query::insert()
                .into_table(Users)
                .columns([
                    users::Column::Username,
                    users::Column::PasswordHash,
                    users::Column::Role,
                    users::Column::CreatedAt,
                    users::Column::UpdatedAt,
                ])
                .values_panic([
                    (*username).into(),
                    password_hash.into(),
                    (*role).into(),
                    now.clone().into(),
                    now.clone().into(),
                ])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Donations).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Milestones).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Surveys).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EventOccurrences).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EventTemplates).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Participants).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}

use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;
pub mod search;

pub use repositories::donation::{Donation, DonationInput};
pub use repositories::event::{
    EventOccurrence, EventOccurrenceInput, EventTemplate, EventTemplateInput,
};
pub use repositories::milestone::{Milestone, MilestoneInput};
pub use repositories::participant::{Participant, ParticipantInput};
pub use repositories::survey::{Survey, SurveyInput};
pub use repositories::user::User;

/// Record counts shown on the dashboard landing page
#[derive(Debug, Clone, Copy)]
pub struct DashboardCounts {
    pub participants: u64,
    pub event_templates: u64,
    pub event_occurrences: u64,
    pub surveys: u64,
    pub milestones: u64,
    pub donations: u64,
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if db_url.starts_with("sqlite:") && !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn participant_repo(&self) -> repositories::participant::ParticipantRepository {
        repositories::participant::ParticipantRepository::new(self.conn.clone())
    }

    fn event_repo(&self) -> repositories::event::EventRepository {
        repositories::event::EventRepository::new(self.conn.clone())
    }

    fn survey_repo(&self) -> repositories::survey::SurveyRepository {
        repositories::survey::SurveyRepository::new(self.conn.clone())
    }

    fn milestone_repo(&self) -> repositories::milestone::MilestoneRepository {
        repositories::milestone::MilestoneRepository::new(self.conn.clone())
    }

    fn donation_repo(&self) -> repositories::donation::DonationRepository {
        repositories::donation::DonationRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    // ========== Participants ==========

    pub async fn list_participants(&self, search: Option<&str>) -> Result<Vec<Participant>> {
        self.participant_repo().list(search).await
    }

    pub async fn get_participant(&self, email: &str) -> Result<Option<Participant>> {
        self.participant_repo().get(email).await
    }

    pub async fn save_participant(
        &self,
        original_email: Option<&str>,
        input: &ParticipantInput,
    ) -> Result<()> {
        self.participant_repo().save(original_email, input).await
    }

    pub async fn delete_participant(&self, email: &str) -> Result<bool> {
        self.participant_repo().delete(email).await
    }

    // ========== Event templates ==========

    pub async fn list_event_templates(&self, search: Option<&str>) -> Result<Vec<EventTemplate>> {
        self.event_repo().list_templates(search).await
    }

    pub async fn get_event_template(&self, name: &str) -> Result<Option<EventTemplate>> {
        self.event_repo().get_template(name).await
    }

    pub async fn event_template_exists(&self, name: &str) -> Result<bool> {
        self.event_repo().template_exists(name).await
    }

    pub async fn save_event_template(
        &self,
        original_name: Option<&str>,
        input: &EventTemplateInput,
    ) -> Result<()> {
        self.event_repo().save_template(original_name, input).await
    }

    pub async fn delete_event_template(&self, name: &str) -> Result<bool> {
        self.event_repo().delete_template(name).await
    }

    // ========== Event occurrences ==========

    pub async fn list_event_occurrences(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<EventOccurrence>> {
        self.event_repo().list_occurrences(search).await
    }

    pub async fn get_event_occurrence(&self, id: i32) -> Result<Option<EventOccurrence>> {
        self.event_repo().get_occurrence(id).await
    }

    pub async fn save_event_occurrence(
        &self,
        id: Option<i32>,
        input: &EventOccurrenceInput,
    ) -> Result<()> {
        self.event_repo().save_occurrence(id, input).await
    }

    pub async fn delete_event_occurrence(&self, id: i32) -> Result<bool> {
        self.event_repo().delete_occurrence(id).await
    }

    // ========== Surveys ==========

    pub async fn list_surveys(&self, search: Option<&str>) -> Result<Vec<Survey>> {
        self.survey_repo().list(search).await
    }

    pub async fn get_survey(&self, id: i32) -> Result<Option<Survey>> {
        self.survey_repo().get(id).await
    }

    pub async fn save_survey(&self, id: Option<i32>, input: &SurveyInput) -> Result<()> {
        self.survey_repo().save(id, input).await
    }

    pub async fn delete_survey(&self, id: i32) -> Result<bool> {
        self.survey_repo().delete(id).await
    }

    // ========== Milestones ==========

    pub async fn list_milestones(&self, search: Option<&str>) -> Result<Vec<Milestone>> {
        self.milestone_repo().list(search).await
    }

    pub async fn get_milestone(&self, email: &str, date: &str) -> Result<Option<Milestone>> {
        self.milestone_repo().get(email, date).await
    }

    pub async fn save_milestone(
        &self,
        original: Option<(&str, &str)>,
        input: &MilestoneInput,
    ) -> Result<()> {
        self.milestone_repo().save(original, input).await
    }

    pub async fn delete_milestone(&self, email: &str, date: &str) -> Result<bool> {
        self.milestone_repo().delete(email, date).await
    }

    // ========== Donations ==========

    pub async fn list_donations(&self, search: Option<&str>) -> Result<Vec<Donation>> {
        self.donation_repo().list(search).await
    }

    pub async fn get_donation(&self, email: &str, date: &str) -> Result<Option<Donation>> {
        self.donation_repo().get(email, date).await
    }

    pub async fn save_donation(
        &self,
        original: Option<(&str, &str)>,
        input: &DonationInput,
    ) -> Result<()> {
        self.donation_repo().save(original, input).await
    }

    pub async fn delete_donation(&self, email: &str, date: &str) -> Result<bool> {
        self.donation_repo().delete(email, date).await
    }

    // ========== Users ==========

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    // ========== Dashboard ==========

    pub async fn dashboard_counts(&self) -> Result<DashboardCounts> {
        Ok(DashboardCounts {
            participants: self.participant_repo().count().await?,
            event_templates: self.event_repo().count_templates().await?,
            event_occurrences: self.event_repo().count_occurrences().await?,
            surveys: self.survey_repo().count().await?,
            milestones: self.milestone_repo().count().await?,
            donations: self.donation_repo().count().await?,
        })
    }
}

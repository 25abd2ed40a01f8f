pub use super::donations::Entity as Donations;
pub use super::event_occurrences::Entity as EventOccurrences;
pub use super::event_templates::Entity as EventTemplates;
pub use super::milestones::Entity as Milestones;
pub use super::participants::Entity as Participants;
pub use super::surveys::Entity as Surveys;
pub use super::users::Entity as Users;

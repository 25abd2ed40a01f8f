pub mod prelude;

pub mod donations;
pub mod event_occurrences;
pub mod event_templates;
pub mod milestones;
pub mod participants;
pub mod surveys;
pub mod users;

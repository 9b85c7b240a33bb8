pub use super::achievements::Entity as Achievements;
pub use super::score_entries::Entity as ScoreEntries;

pub mod prelude;

pub mod achievements;
pub mod score_entries;

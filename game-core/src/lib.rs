pub mod achievements;
pub mod clock;
pub mod game_events;
pub mod leveling;
pub mod number_sequence;
pub mod pattern_matching;
pub mod puzzle;
pub mod puzzle_generator;
pub mod question_bank;
pub mod quiz_generator;
pub mod quiz_session;
pub mod scoring;
pub mod statistics;
pub mod store;
pub mod word_search;

// Re-export main components
pub use achievements::*;
pub use clock::*;
pub use game_events::*;
pub use leveling::*;
pub use number_sequence::*;
pub use pattern_matching::*;
pub use puzzle::*;
pub use puzzle_generator::*;
pub use question_bank::*;
pub use quiz_generator::*;
pub use quiz_session::*;
pub use scoring::*;
pub use statistics::*;
pub use store::*;
pub use word_search::*;

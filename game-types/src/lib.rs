pub mod errors;
pub mod game;
pub mod puzzle;
pub mod quiz;
pub mod score;
pub mod stats;

// Re-export all types
pub use errors::*;
pub use game::*;
pub use puzzle::*;
pub use quiz::*;
pub use score::*;
pub use stats::*;

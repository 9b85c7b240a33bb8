use game_core::{Clock, GameStore, PuzzleGenerator, QuestionBank, QuizGenerator};
use std::sync::Arc;

pub mod config;
pub mod puzzle_controller;
pub mod quiz_controller;
pub mod records;
pub mod report;
pub mod summary;

pub use config::{Config, ControllerSettings};
pub use puzzle_controller::{PuzzleController, PuzzleMove, PuzzleSnapshot};
pub use quiz_controller::{QuizController, QuizSnapshot};
pub use summary::GameSummary;

/// Both controllers wired to one store and clock, quizzes drawn from `bank`.
pub struct GameApp {
    pub quiz: QuizController,
    pub puzzles: PuzzleController,
}

impl GameApp {
    pub fn new(
        settings: ControllerSettings,
        bank: QuestionBank,
        store: Arc<dyn GameStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            quiz: QuizController::new(
                settings.clone(),
                QuizGenerator::new(bank),
                store.clone(),
                clock.clone(),
            ),
            puzzles: PuzzleController::new(settings, PuzzleGenerator::default(), store, clock),
        }
    }
}

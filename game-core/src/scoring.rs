use game_types::{PuzzleDifficulty, QuizDifficulty};

/// Base points before the difficulty multiplier is applied.
pub const QUIZ_CORRECT_ANSWER_POINTS: u32 = 100;
pub const WORD_FOUND_POINTS: u32 = 100;
pub const SEQUENCE_ANSWER_POINTS: u32 = 50;
pub const SEQUENCE_COMPLETION_BONUS: u32 = 200;
pub const PATTERN_MATCH_POINTS: u32 = 75;
pub const PATTERN_COMPLETION_BONUS: u32 = 150;
pub const PERFECT_PUZZLE_POINTS: u32 = 500;

pub struct ScoringEngine;

impl ScoringEngine {
    /// Scale `base` by a multiplier expressed in hundredths, rounding down.
    pub fn apply_multiplier(base: u32, multiplier_percent: u32) -> i32 {
        let scaled = u64::from(base) * u64::from(multiplier_percent) / 100;
        i32::try_from(scaled).unwrap_or(i32::MAX)
    }

    pub fn quiz_answer_points(difficulty: QuizDifficulty) -> i32 {
        Self::apply_multiplier(QUIZ_CORRECT_ANSWER_POINTS, difficulty.multiplier_percent())
    }

    pub fn puzzle_points(base: u32, difficulty: PuzzleDifficulty) -> i32 {
        Self::apply_multiplier(base, difficulty.multiplier_percent())
    }

    /// Score at or above which a puzzle counts as perfect.
    pub fn perfect_puzzle_threshold(difficulty: PuzzleDifficulty) -> i32 {
        Self::puzzle_points(PERFECT_PUZZLE_POINTS, difficulty)
    }

    /// Maximum a quiz can award when every answer is correct.
    pub fn quiz_maximum<'a>(difficulties: impl IntoIterator<Item = &'a QuizDifficulty>) -> i32 {
        difficulties
            .into_iter()
            .map(|difficulty| Self::quiz_answer_points(*difficulty))
            .sum()
    }
}

use chrono::{DateTime, Utc};
use game_types::{
    IgnoreReason, MoveOutcome, PatternId, PuzzleDifficulty, PuzzleId, PuzzleType, SessionStatus,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::{remaining_secs, seconds_between};
use crate::number_sequence::NumberSequence;
use crate::pattern_matching::PatternMatching;
use crate::scoring::{
    PATTERN_COMPLETION_BONUS, PATTERN_MATCH_POINTS, SEQUENCE_ANSWER_POINTS,
    SEQUENCE_COMPLETION_BONUS, ScoringEngine, WORD_FOUND_POINTS,
};
use crate::word_search::WordSearch;

pub const WORD_SEARCH_HINT: &str = "Look for words horizontally, vertically, and diagonally";
pub const PATTERN_MATCHING_HINT: &str = "Match patterns based on shape, color, and size";

/// Variant-specific puzzle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PuzzleKind {
    WordSearch(WordSearch),
    NumberSequence(NumberSequence),
    PatternMatching(PatternMatching),
}

impl PuzzleKind {
    pub fn puzzle_type(&self) -> PuzzleType {
        match self {
            PuzzleKind::WordSearch(_) => PuzzleType::WordSearch,
            PuzzleKind::NumberSequence(_) => PuzzleType::NumberSequence,
            PuzzleKind::PatternMatching(_) => PuzzleType::PatternMatching,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: PuzzleId,
    pub title: String,
    pub difficulty: PuzzleDifficulty,
    pub estimated_time_secs: u32,
    pub is_completed: bool,
    pub score: i32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub kind: PuzzleKind,
}

impl Puzzle {
    pub fn new(
        title: impl Into<String>,
        difficulty: PuzzleDifficulty,
        estimated_time_secs: u32,
        kind: PuzzleKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            difficulty,
            estimated_time_secs,
            is_completed: false,
            score: 0,
            started_at: None,
            completed_at: None,
            kind,
        }
    }

    pub fn puzzle_type(&self) -> PuzzleType {
        self.kind.puzzle_type()
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_completed {
            SessionStatus::Completed
        } else {
            SessionStatus::Active
        }
    }

    /// Stamp the start time. Calling it again keeps the first stamp.
    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
            info!("Started puzzle {} ({})", self.title, self.id);
        }
    }

    pub fn mark_word_found(&mut self, word: &str, now: DateTime<Utc>) -> MoveOutcome {
        if self.is_completed {
            return MoveOutcome::ignored(IgnoreReason::SessionCompleted);
        }
        let PuzzleKind::WordSearch(search) = &mut self.kind else {
            return MoveOutcome::ignored(IgnoreReason::WrongPuzzleType);
        };

        if let Err(reason) = search.mark_found(word) {
            debug!("Ignored word '{}': {:?}", word, reason);
            return MoveOutcome::ignored(reason);
        }

        let solved = search.is_solved();
        let points = ScoringEngine::puzzle_points(WORD_FOUND_POINTS, self.difficulty);
        self.score += points;
        if solved {
            self.complete(now);
        }

        MoveOutcome::Accepted {
            points_awarded: points,
            completed: solved,
        }
    }

    pub fn submit_sequence_answer(
        &mut self,
        index: usize,
        value: i64,
        now: DateTime<Utc>,
    ) -> MoveOutcome {
        if self.is_completed {
            return MoveOutcome::ignored(IgnoreReason::SessionCompleted);
        }
        let PuzzleKind::NumberSequence(sequence) = &mut self.kind else {
            return MoveOutcome::ignored(IgnoreReason::WrongPuzzleType);
        };

        let first_correct = match sequence.submit(index, value) {
            Ok(first_correct) => first_correct,
            Err(reason) => return MoveOutcome::ignored(reason),
        };
        let solved = sequence.is_solved();

        let mut points = 0;
        if first_correct {
            points += ScoringEngine::puzzle_points(SEQUENCE_ANSWER_POINTS, self.difficulty);
        }
        if solved {
            points += ScoringEngine::puzzle_points(SEQUENCE_COMPLETION_BONUS, self.difficulty);
        }
        self.score += points;
        if solved {
            self.complete(now);
        }

        MoveOutcome::Accepted {
            points_awarded: points,
            completed: solved,
        }
    }

    pub fn make_match(
        &mut self,
        pattern_id: PatternId,
        option_id: PatternId,
        now: DateTime<Utc>,
    ) -> MoveOutcome {
        if self.is_completed {
            return MoveOutcome::ignored(IgnoreReason::SessionCompleted);
        }
        let PuzzleKind::PatternMatching(matching) = &mut self.kind else {
            return MoveOutcome::ignored(IgnoreReason::WrongPuzzleType);
        };

        let first_correct = match matching.make_match(pattern_id, option_id) {
            Ok(first_correct) => first_correct,
            Err(reason) => return MoveOutcome::ignored(reason),
        };
        let solved = matching.is_solved();

        let mut points = 0;
        if first_correct {
            points += ScoringEngine::puzzle_points(PATTERN_MATCH_POINTS, self.difficulty);
        }
        if solved {
            points += ScoringEngine::puzzle_points(PATTERN_COMPLETION_BONUS, self.difficulty);
        }
        self.score += points;
        if solved {
            self.complete(now);
        }

        MoveOutcome::Accepted {
            points_awarded: points,
            completed: solved,
        }
    }

    pub fn progress(&self) -> f64 {
        match &self.kind {
            PuzzleKind::WordSearch(search) => search.progress(),
            PuzzleKind::NumberSequence(sequence) => sequence.progress(),
            PuzzleKind::PatternMatching(matching) => matching.progress(),
        }
    }

    pub fn hint(&self) -> &str {
        match &self.kind {
            PuzzleKind::WordSearch(_) => WORD_SEARCH_HINT,
            PuzzleKind::NumberSequence(sequence) => &sequence.hint,
            PuzzleKind::PatternMatching(_) => PATTERN_MATCHING_HINT,
        }
    }

    /// Seconds since the start, frozen at completion. Zero before `start`.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> f64 {
        match self.started_at {
            Some(started) => seconds_between(started, self.completed_at.unwrap_or(now)),
            None => 0.0,
        }
    }

    pub fn remaining_secs(&self, now: DateTime<Utc>) -> f64 {
        remaining_secs(f64::from(self.estimated_time_secs), self.elapsed_secs(now))
    }

    /// Start-to-completion duration, once completed.
    pub fn completion_time_secs(&self) -> Option<f64> {
        match (self.started_at, self.completed_at) {
            (Some(started), Some(completed)) => Some(seconds_between(started, completed)),
            _ => None,
        }
    }

    fn complete(&mut self, now: DateTime<Utc>) {
        self.is_completed = true;
        self.completed_at = Some(now);
        info!(
            "Completed puzzle {} with score {} ({})",
            self.title, self.score, self.id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn cat_dog_puzzle(difficulty: PuzzleDifficulty) -> Puzzle {
        let grid = vec![
            vec!['C', 'A', 'T', 'Q'],
            vec!['D', 'O', 'G', 'W'],
            vec!['E', 'R', 'T', 'Y'],
            vec!['U', 'I', 'O', 'P'],
        ];
        Puzzle::new(
            "Test Word Search",
            difficulty,
            300,
            PuzzleKind::WordSearch(WordSearch::new(grid, &["CAT", "DOG"])),
        )
    }

    #[test]
    fn test_word_search_completion() {
        let now = Utc::now();
        let mut puzzle = cat_dog_puzzle(PuzzleDifficulty::Intermediate);
        puzzle.start(now);

        let first = puzzle.mark_word_found("CAT", now);
        assert_eq!(first.points_awarded(), 130);
        assert!(!first.completed());

        let again = puzzle.mark_word_found("CAT", now);
        assert_eq!(again, MoveOutcome::ignored(IgnoreReason::WordAlreadyFound));

        let second = puzzle.mark_word_found("DOG", now + Duration::seconds(40));
        assert!(second.completed());
        assert!(puzzle.is_completed);
        assert_eq!(puzzle.score, 260);
        assert_eq!(puzzle.completion_time_secs(), Some(40.0));
        assert_eq!(puzzle.status(), SessionStatus::Completed);
    }

    #[test]
    fn test_moves_after_completion_are_ignored() {
        let now = Utc::now();
        let mut puzzle = cat_dog_puzzle(PuzzleDifficulty::Beginner);
        puzzle.mark_word_found("CAT", now);
        puzzle.mark_word_found("DOG", now);

        assert_eq!(
            puzzle.mark_word_found("CAT", now),
            MoveOutcome::ignored(IgnoreReason::SessionCompleted)
        );
        assert_eq!(puzzle.score, 200);
    }

    #[test]
    fn test_wrong_kind_move_is_ignored() {
        let now = Utc::now();
        let mut puzzle = cat_dog_puzzle(PuzzleDifficulty::Beginner);
        assert_eq!(
            puzzle.submit_sequence_answer(0, 1, now),
            MoveOutcome::ignored(IgnoreReason::WrongPuzzleType)
        );
        assert_eq!(
            puzzle.make_match(Uuid::new_v4(), Uuid::new_v4(), now),
            MoveOutcome::ignored(IgnoreReason::WrongPuzzleType)
        );
    }

    #[test]
    fn test_sequence_scoring_and_bonus() {
        let now = Utc::now();
        let sequence = NumberSequence::new(vec![1, 4, 9, 16, 25, 36], &[1, 3, 5], "squares");
        let mut puzzle = Puzzle::new(
            "Advanced Number Sequence",
            PuzzleDifficulty::Advanced,
            420,
            PuzzleKind::NumberSequence(sequence),
        );

        assert_eq!(puzzle.submit_sequence_answer(1, 4, now).points_awarded(), 85);
        assert_eq!(puzzle.submit_sequence_answer(3, 16, now).points_awarded(), 85);
        let wrong = puzzle.submit_sequence_answer(5, 35, now);
        assert_eq!(wrong.points_awarded(), 0);
        assert!(!puzzle.is_completed);

        // Correcting the last answer earns the item points plus the bonus
        let fixed = puzzle.submit_sequence_answer(5, 36, now);
        assert_eq!(fixed.points_awarded(), 85 + 340);
        assert!(puzzle.is_completed);
        assert_eq!(puzzle.score, 85 * 3 + 340);
    }

    #[test]
    fn test_hints() {
        let puzzle = cat_dog_puzzle(PuzzleDifficulty::Beginner);
        assert_eq!(puzzle.hint(), WORD_SEARCH_HINT);
    }

    #[test]
    fn test_elapsed_and_remaining() {
        let start = Utc::now();
        let mut puzzle = cat_dog_puzzle(PuzzleDifficulty::Beginner);
        assert_eq!(puzzle.elapsed_secs(start), 0.0);

        puzzle.start(start);
        puzzle.start(start + Duration::seconds(10));
        let later = start + Duration::seconds(100);
        assert_eq!(puzzle.elapsed_secs(later), 100.0);
        assert_eq!(puzzle.remaining_secs(later), 200.0);
        assert_eq!(puzzle.remaining_secs(start + Duration::seconds(400)), 0.0);
    }
}

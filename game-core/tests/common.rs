#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use game_core::{GameEvent, GameEventHandler, Puzzle, PuzzleKind, QuestionBank, WordSearch};
use game_types::{
    GameType, PuzzleDifficulty, QuizCategory, QuizDifficulty, QuizQuestion, ScoreEntry,
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Fixed instant so time-based assertions are exact
pub fn test_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Creates a question with the correct answer at index 1
pub fn create_test_question(category: QuizCategory, difficulty: QuizDifficulty) -> QuizQuestion {
    QuizQuestion::new(
        &format!("{} {} question", difficulty, category),
        ["Wrong", "Right", "Also wrong", "Still wrong"],
        1,
        category,
        difficulty,
        "The right answer is always the second one here.",
    )
}

/// Bank holding exactly two easy science questions plus a few others
pub fn create_small_bank() -> QuestionBank {
    QuestionBank::from_questions(vec![
        create_test_question(QuizCategory::Science, QuizDifficulty::Easy),
        create_test_question(QuizCategory::Science, QuizDifficulty::Easy),
        create_test_question(QuizCategory::Science, QuizDifficulty::Hard),
        create_test_question(QuizCategory::History, QuizDifficulty::Easy),
        create_test_question(QuizCategory::Art, QuizDifficulty::Medium),
    ])
    .unwrap()
}

/// Word search with CAT across the top row and DOG down the first column
pub fn create_cat_dog_puzzle(difficulty: PuzzleDifficulty) -> Puzzle {
    let grid = vec![
        vec!['C', 'A', 'T', 'X', 'Q'],
        vec!['D', 'Z', 'P', 'L', 'M'],
        vec!['O', 'B', 'R', 'N', 'V'],
        vec!['G', 'H', 'J', 'K', 'Y'],
        vec!['W', 'E', 'U', 'I', 'S'],
    ];
    Puzzle::new(
        format!("{} Word Search", difficulty),
        difficulty,
        300,
        PuzzleKind::WordSearch(WordSearch::new(grid, &["CAT", "DOG"])),
    )
}

pub fn create_score_entry(player: &str, score: i32, game_type: GameType) -> ScoreEntry {
    ScoreEntry {
        id: Uuid::new_v4(),
        player_name: player.to_string(),
        score,
        game_type,
        difficulty: "Easy".to_string(),
        date: test_time(),
        time_spent_secs: 90.0,
        achievements: Vec::new(),
        details: None,
    }
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&GameEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }
}

impl GameEventHandler for EventCollector {
    fn handle_event(&mut self, event: GameEvent) {
        self.events.lock().unwrap().push(event);
    }
}

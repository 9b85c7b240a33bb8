use chrono::{DateTime, Utc};
use game_types::{QuizCategory, QuizDifficulty, QuizQuestion};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::question_bank::QuestionBank;
use crate::quiz_session::QuizSession;

/// Easy / medium / hard counts for an adaptive quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyMix {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl DifficultyMix {
    pub fn for_level(player_level: u32) -> Self {
        let (easy, medium, hard) = match player_level {
            0..=5 => (7, 3, 0),
            6..=15 => (4, 5, 1),
            16..=30 => (2, 5, 3),
            _ => (1, 4, 5),
        };
        Self { easy, medium, hard }
    }

    pub fn count_for(&self, difficulty: QuizDifficulty) -> usize {
        match difficulty {
            QuizDifficulty::Easy => self.easy,
            QuizDifficulty::Medium => self.medium,
            QuizDifficulty::Hard => self.hard,
        }
    }
}

/// Draws quiz sessions from a question bank. Short pools yield short quizzes.
#[derive(Debug, Clone, Default)]
pub struct QuizGenerator {
    bank: QuestionBank,
}

impl QuizGenerator {
    pub fn new(bank: QuestionBank) -> Self {
        Self { bank }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn generate(
        &self,
        category: Option<QuizCategory>,
        difficulty: Option<QuizDifficulty>,
        count: usize,
        started_at: DateTime<Utc>,
    ) -> QuizSession {
        let questions = self.select_questions(category, difficulty, count, &mut rand::thread_rng());
        QuizSession::new(questions, started_at).with_category(category)
    }

    pub fn generate_adaptive(
        &self,
        player_level: u32,
        count: usize,
        started_at: DateTime<Utc>,
    ) -> QuizSession {
        let questions = self.select_adaptive(player_level, count, &mut rand::thread_rng());
        QuizSession::new(questions, started_at)
    }

    /// Questions from every category and difficulty.
    pub fn generate_mixed(&self, count: usize, started_at: DateTime<Utc>) -> QuizSession {
        self.generate(None, None, count, started_at)
    }

    pub fn select_questions<R: Rng + ?Sized>(
        &self,
        category: Option<QuizCategory>,
        difficulty: Option<QuizDifficulty>,
        count: usize,
        rng: &mut R,
    ) -> Vec<QuizQuestion> {
        let mut pool = self.bank.filtered(category, difficulty);
        pool.shuffle(rng);
        pool.truncate(count);
        debug!(
            "Selected {} of {} requested questions (category: {:?}, difficulty: {:?})",
            pool.len(),
            count,
            category,
            difficulty
        );
        pool
    }

    pub fn select_adaptive<R: Rng + ?Sized>(
        &self,
        player_level: u32,
        count: usize,
        rng: &mut R,
    ) -> Vec<QuizQuestion> {
        let mix = DifficultyMix::for_level(player_level);

        let mut questions = Vec::new();
        for difficulty in QuizDifficulty::ALL {
            let mut pool = self.bank.by_difficulty(difficulty);
            pool.shuffle(rng);
            pool.truncate(mix.count_for(difficulty));
            questions.extend(pool);
        }

        questions.shuffle(rng);
        questions.truncate(count);
        debug!(
            "Adaptive quiz for level {}: {:?}, {} questions",
            player_level,
            mix,
            questions.len()
        );
        questions
    }
}

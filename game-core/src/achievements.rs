use anyhow::Result;
use chrono::{DateTime, Utc};
use game_types::{Achievement, AchievementCategory, AchievementRarity, PlayerStatistics};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::puzzle::Puzzle;
use crate::quiz_session::QuizSession;
use crate::scoring::{QUIZ_CORRECT_ANSWER_POINTS, ScoringEngine};
use crate::store::GameStore;

pub const SPEED_DEMON_SECONDS: f64 = 60.0;
pub const SPEED_DEMON_MIN_QUESTIONS: usize = 10;
pub const QUIZ_MASTER_GAMES: u32 = 100;
pub const PUZZLE_MASTER_GAMES: u32 = 50;

/// Every achievement a player can unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AchievementKind {
    PerfectScore,
    SpeedDemon,
    FirstSteps,
    QuizMaster,
    PuzzlePioneer,
    PerfectPuzzle,
    SpeedSolver,
    PuzzleMaster,
}

impl AchievementKind {
    pub const ALL: [AchievementKind; 8] = [
        AchievementKind::PerfectScore,
        AchievementKind::SpeedDemon,
        AchievementKind::FirstSteps,
        AchievementKind::QuizMaster,
        AchievementKind::PuzzlePioneer,
        AchievementKind::PerfectPuzzle,
        AchievementKind::SpeedSolver,
        AchievementKind::PuzzleMaster,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AchievementKind::PerfectScore => "Perfect Score!",
            AchievementKind::SpeedDemon => "Speed Demon",
            AchievementKind::FirstSteps => "First Steps",
            AchievementKind::QuizMaster => "Quiz Master",
            AchievementKind::PuzzlePioneer => "Puzzle Pioneer",
            AchievementKind::PerfectPuzzle => "Perfect Puzzle",
            AchievementKind::SpeedSolver => "Speed Solver",
            AchievementKind::PuzzleMaster => "Puzzle Master",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AchievementKind::PerfectScore => "Answer all questions correctly in a quiz",
            AchievementKind::SpeedDemon => "Complete a 10-question quiz in under 1 minute",
            AchievementKind::FirstSteps => "Complete your first quiz",
            AchievementKind::QuizMaster => "Complete 100 quizzes",
            AchievementKind::PuzzlePioneer => "Complete your first puzzle",
            AchievementKind::PerfectPuzzle => "Achieve maximum score on a puzzle",
            AchievementKind::SpeedSolver => "Complete a puzzle in half the estimated time",
            AchievementKind::PuzzleMaster => "Complete 50 puzzles",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            AchievementKind::PerfectScore => "star.fill",
            AchievementKind::SpeedDemon => "bolt.fill",
            AchievementKind::FirstSteps => "flag.fill",
            AchievementKind::QuizMaster | AchievementKind::PuzzleMaster => "crown.fill",
            AchievementKind::PuzzlePioneer => "puzzlepiece.fill",
            AchievementKind::PerfectPuzzle => "star.circle.fill",
            AchievementKind::SpeedSolver => "timer",
        }
    }

    pub fn rarity(&self) -> AchievementRarity {
        match self {
            AchievementKind::FirstSteps | AchievementKind::PuzzlePioneer => AchievementRarity::Common,
            AchievementKind::PerfectScore | AchievementKind::PerfectPuzzle => AchievementRarity::Rare,
            AchievementKind::SpeedDemon | AchievementKind::SpeedSolver => AchievementRarity::Epic,
            AchievementKind::QuizMaster | AchievementKind::PuzzleMaster => {
                AchievementRarity::Legendary
            }
        }
    }

    pub fn category(&self) -> AchievementCategory {
        match self {
            AchievementKind::PerfectScore | AchievementKind::PerfectPuzzle => {
                AchievementCategory::Accuracy
            }
            AchievementKind::SpeedDemon | AchievementKind::SpeedSolver => AchievementCategory::Speed,
            AchievementKind::FirstSteps => AchievementCategory::Quiz,
            AchievementKind::PuzzlePioneer => AchievementCategory::Puzzle,
            AchievementKind::QuizMaster | AchievementKind::PuzzleMaster => {
                AchievementCategory::Dedication
            }
        }
    }

    pub fn unlock(&self, unlocked_date: DateTime<Utc>) -> Achievement {
        Achievement {
            id: Uuid::new_v4(),
            title: self.title().to_string(),
            description: self.description().to_string(),
            icon: self.icon().to_string(),
            rarity: self.rarity(),
            unlocked_date,
            category: self.category(),
        }
    }
}

/// Achievements a finished quiz qualifies for, judged against the player's
/// history before this quiz was recorded.
pub fn quiz_achievements(
    session: &QuizSession,
    history: &PlayerStatistics,
    now: DateTime<Utc>,
) -> Vec<AchievementKind> {
    let question_count = session.question_count();
    let mut unlocked = Vec::new();

    let perfect_score = i64::try_from(question_count)
        .map(|count| count * i64::from(QUIZ_CORRECT_ANSWER_POINTS))
        .unwrap_or(i64::MAX);
    if question_count > 0 && i64::from(session.score) == perfect_score {
        unlocked.push(AchievementKind::PerfectScore);
    }

    if session.elapsed_secs(now) < SPEED_DEMON_SECONDS && question_count >= SPEED_DEMON_MIN_QUESTIONS {
        unlocked.push(AchievementKind::SpeedDemon);
    }

    if history.total_games_played == 0 {
        unlocked.push(AchievementKind::FirstSteps);
    }

    if history.total_games_played >= QUIZ_MASTER_GAMES {
        unlocked.push(AchievementKind::QuizMaster);
    }

    unlocked
}

/// Achievements a finished puzzle qualifies for.
pub fn puzzle_achievements(puzzle: &Puzzle, history: &PlayerStatistics) -> Vec<AchievementKind> {
    let mut unlocked = Vec::new();

    if history.total_games_played == 0 {
        unlocked.push(AchievementKind::PuzzlePioneer);
    }

    if puzzle.score >= ScoringEngine::perfect_puzzle_threshold(puzzle.difficulty) {
        unlocked.push(AchievementKind::PerfectPuzzle);
    }

    let half_budget = f64::from(puzzle.estimated_time_secs) * 0.5;
    if puzzle
        .completion_time_secs()
        .is_some_and(|taken| taken < half_budget)
    {
        unlocked.push(AchievementKind::SpeedSolver);
    }

    if history.total_games_played >= PUZZLE_MASTER_GAMES {
        unlocked.push(AchievementKind::PuzzleMaster);
    }

    unlocked
}

/// Turns rule results into stored achievements.
pub struct AchievementEvaluator {
    store: Arc<dyn GameStore>,
}

impl AchievementEvaluator {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self { store }
    }

    pub async fn evaluate_quiz(
        &self,
        session: &QuizSession,
        history: &PlayerStatistics,
        player_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Achievement>> {
        let kinds = quiz_achievements(session, history, now);
        self.persist(kinds, player_name, now).await
    }

    pub async fn evaluate_puzzle(
        &self,
        puzzle: &Puzzle,
        history: &PlayerStatistics,
        player_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Achievement>> {
        let kinds = puzzle_achievements(puzzle, history);
        self.persist(kinds, player_name, now).await
    }

    /// Save each achievement as soon as it is produced. Only the ones the store
    /// accepted, i.e. new to this player, are returned.
    async fn persist(
        &self,
        kinds: Vec<AchievementKind>,
        player_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Achievement>> {
        let mut unlocked = Vec::new();
        for kind in kinds {
            let achievement = kind.unlock(now);
            if self.store.save_achievement(&achievement, player_name).await? {
                info!("{} unlocked '{}'", player_name, achievement.title);
                unlocked.push(achievement);
            } else {
                debug!("{} already holds '{}'", player_name, achievement.title);
            }
        }
        Ok(unlocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number_sequence::NumberSequence;
    use crate::puzzle::PuzzleKind;
    use crate::statistics::StatisticsAggregator;
    use crate::store::MemoryStore;
    use chrono::Duration;
    use game_types::{PuzzleDifficulty, QuizCategory, QuizDifficulty, QuizQuestion};

    fn history(games: u32) -> PlayerStatistics {
        let mut stats = StatisticsAggregator::aggregate(&[], &[]);
        stats.total_games_played = games;
        stats
    }

    fn easy_quiz(count: usize) -> QuizSession {
        let questions = (0..count)
            .map(|_| {
                QuizQuestion::new(
                    "Who painted the Mona Lisa?",
                    ["Michelangelo", "Leonardo da Vinci", "Raphael", "Donatello"],
                    1,
                    QuizCategory::Art,
                    QuizDifficulty::Easy,
                    "",
                )
            })
            .collect();
        QuizSession::new(questions, Utc::now())
    }

    fn solved_sequence(difficulty: PuzzleDifficulty, seconds: i64) -> Puzzle {
        let mut puzzle = Puzzle::new(
            "Beginner Number Sequence",
            difficulty,
            180,
            PuzzleKind::NumberSequence(NumberSequence::new(vec![1, 2, 3], &[1], "")),
        );
        let start = Utc::now();
        puzzle.start(start);
        puzzle.submit_sequence_answer(1, 2, start + Duration::seconds(seconds));
        puzzle
    }

    #[test]
    fn test_perfect_and_fast_quiz() {
        let mut quiz = easy_quiz(10);
        let start = quiz.started_at;
        for _ in 0..10 {
            quiz.submit_answer(1);
            quiz.next_question(start + Duration::seconds(45));
        }

        let kinds = quiz_achievements(&quiz, &history(3), start + Duration::seconds(50));
        assert_eq!(kinds, vec![AchievementKind::PerfectScore, AchievementKind::SpeedDemon]);
    }

    #[test]
    fn test_short_quiz_is_not_speed_demon() {
        let mut quiz = easy_quiz(5);
        quiz.finish(quiz.started_at + Duration::seconds(5));
        let kinds = quiz_achievements(&quiz, &history(1), Utc::now());
        assert!(kinds.is_empty());
    }

    #[test]
    fn test_history_based_quiz_achievements() {
        let quiz = easy_quiz(3);
        let now = quiz.started_at + Duration::seconds(300);

        let first = quiz_achievements(&quiz, &history(0), now);
        assert_eq!(first.iter().filter(|k| **k == AchievementKind::FirstSteps).count(), 1);

        let veteran = quiz_achievements(&quiz, &history(100), now);
        assert_eq!(veteran, vec![AchievementKind::QuizMaster]);
    }

    #[test]
    fn test_puzzle_achievements() {
        // 125 + 500 bonus stays under the 1250 perfect threshold
        let puzzle = solved_sequence(PuzzleDifficulty::Expert, 30);
        let kinds = puzzle_achievements(&puzzle, &history(0));
        assert_eq!(kinds, vec![AchievementKind::PuzzlePioneer, AchievementKind::SpeedSolver]);

        let slow = solved_sequence(PuzzleDifficulty::Beginner, 90);
        assert!(puzzle_achievements(&slow, &history(50)).contains(&AchievementKind::PuzzleMaster));
        assert!(!puzzle_achievements(&slow, &history(50)).contains(&AchievementKind::SpeedSolver));
    }

    #[test]
    fn test_perfect_puzzle_threshold() {
        let mut puzzle = solved_sequence(PuzzleDifficulty::Intermediate, 100);
        puzzle.score = 650;
        assert!(puzzle_achievements(&puzzle, &history(5)).contains(&AchievementKind::PerfectPuzzle));
        puzzle.score = 649;
        assert!(!puzzle_achievements(&puzzle, &history(5)).contains(&AchievementKind::PerfectPuzzle));
    }

    #[test]
    fn test_definitions() {
        let achievement = AchievementKind::SpeedSolver.unlock(Utc::now());
        assert_eq!(achievement.title, "Speed Solver");
        assert_eq!(achievement.rarity, AchievementRarity::Epic);
        assert_eq!(achievement.category, AchievementCategory::Speed);
        assert_eq!(AchievementKind::PuzzleMaster.icon(), "crown.fill");
    }

    #[tokio::test]
    async fn test_evaluator_persists_and_store_deduplicates() {
        let store = Arc::new(MemoryStore::new());
        let evaluator = AchievementEvaluator::new(store.clone());
        let puzzle = solved_sequence(PuzzleDifficulty::Beginner, 120);

        let first = evaluator
            .evaluate_puzzle(&puzzle, &history(0), "Ada", Utc::now())
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].title, "Puzzle Pioneer");

        let again = evaluator
            .evaluate_puzzle(&puzzle, &history(0), "Ada", Utc::now())
            .await
            .unwrap();
        assert!(again.is_empty());
        assert_eq!(store.fetch_achievements("Ada").await.unwrap().len(), 1);
    }
}

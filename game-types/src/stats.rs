use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::{Achievement, GameError, GameType, PuzzleDifficulty, PuzzleType, QuizCategory};

/// Derived from total experience; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerLevel {
    pub level: u32,
    pub title: String,
    /// Experience earned past the current level threshold.
    pub experience_points: i32,
    /// Experience span between the current and next level thresholds.
    pub experience_to_next: i32,
    pub total_experience: i32,
}

impl PlayerLevel {
    pub fn progress(&self) -> f64 {
        if self.experience_to_next <= 0 {
            return 1.0;
        }
        f64::from(self.experience_points) / f64::from(self.experience_to_next)
    }

    pub fn experience_remaining(&self) -> i32 {
        (self.experience_to_next - self.experience_points).max(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerStatistics {
    pub total_games_played: u32,
    pub total_score: i32,
    pub total_time_spent_secs: f64,
    pub average_score: f64,
    pub best_score: i32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub achievements: Vec<Achievement>,
    pub level: PlayerLevel,
    pub quiz_stats: Option<QuizStatistics>,
    pub puzzle_stats: Option<PuzzleStatistics>,
}

impl PlayerStatistics {
    pub fn achievement_points(&self) -> i32 {
        self.achievements
            .iter()
            .map(|achievement| achievement.rarity.points())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuizStatistics {
    pub total_quizzes: u32,
    pub total_score: i32,
    pub average_score: f64,
    pub best_score: i32,
    pub total_time_spent_secs: f64,
    pub category_stats: BTreeMap<QuizCategory, CategoryStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryStats {
    pub quizzes_played: u32,
    pub questions_answered: u32,
    pub correct_answers: u32,
    pub average_score: f64,
}

impl CategoryStats {
    pub fn accuracy(&self) -> f64 {
        if self.questions_answered == 0 {
            return 0.0;
        }
        f64::from(self.correct_answers) / f64::from(self.questions_answered)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PuzzleStatistics {
    pub total_puzzles_solved: u32,
    pub total_score: i32,
    pub average_score: f64,
    pub best_score: i32,
    pub total_time_spent_secs: f64,
    pub type_stats: BTreeMap<PuzzleType, PuzzleTypeStats>,
    pub difficulty_stats: BTreeMap<PuzzleDifficulty, PuzzleDifficultyStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PuzzleTypeStats {
    pub puzzles_solved: u32,
    pub total_score: i32,
    pub average_score: f64,
    /// Fastest completed attempt; 0 when none was completed.
    pub best_time_secs: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PuzzleDifficultyStats {
    pub puzzles_played: u32,
    pub puzzles_solved: u32,
    pub total_score: i32,
    pub average_score: f64,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum LeaderboardTimeframe {
    Daily,
    Weekly,
    Monthly,
    AllTime,
}

impl LeaderboardTimeframe {
    pub const ALL: [LeaderboardTimeframe; 4] = [
        LeaderboardTimeframe::Daily,
        LeaderboardTimeframe::Weekly,
        LeaderboardTimeframe::Monthly,
        LeaderboardTimeframe::AllTime,
    ];

    /// Length of the window in days, `None` for all time.
    pub fn days(&self) -> Option<i64> {
        match self {
            LeaderboardTimeframe::Daily => Some(1),
            LeaderboardTimeframe::Weekly => Some(7),
            LeaderboardTimeframe::Monthly => Some(30),
            LeaderboardTimeframe::AllTime => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaderboardTimeframe::Daily => "Daily",
            LeaderboardTimeframe::Weekly => "Weekly",
            LeaderboardTimeframe::Monthly => "Monthly",
            LeaderboardTimeframe::AllTime => "All Time",
        }
    }
}

impl fmt::Display for LeaderboardTimeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the display label with spaces, dashes or underscores between words.
impl FromStr for LeaderboardTimeframe {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.trim().replace(['-', '_'], " ");
        LeaderboardTimeframe::ALL
            .into_iter()
            .find(|timeframe| timeframe.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| GameError::unknown_label("leaderboard timeframe", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub player_name: String,
    pub total_score: i32,
    pub games_played: u32,
    pub average_score: f64,
    pub best_score: i32,
    pub total_time_spent_secs: f64,
    pub achievements: Vec<Achievement>,
    pub level: PlayerLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    pub game_type: Option<GameType>,
    pub timeframe: LeaderboardTimeframe,
    pub last_updated: DateTime<Utc>,
}

impl Leaderboard {
    pub const TOP_PLAYERS: usize = 10;

    pub fn top_players(&self) -> &[LeaderboardEntry] {
        &self.entries[..self.entries.len().min(Self::TOP_PLAYERS)]
    }

    pub fn rank_of(&self, player_name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.player_name == player_name)
            .map(|entry| entry.rank)
    }
}

/// Latest score measured against the player's previous best.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreComparison {
    pub current_score: i32,
    pub previous_best: i32,
    pub improvement: i32,
    pub percentage_improvement: f64,
    pub is_new_record: bool,
}

impl ScoreComparison {
    pub fn new(current_score: i32, previous_best: i32) -> Self {
        let improvement = current_score - previous_best;
        let percentage_improvement = if previous_best > 0 {
            f64::from(improvement) / f64::from(previous_best) * 100.0
        } else {
            0.0
        };

        Self {
            current_score,
            previous_best,
            improvement,
            percentage_improvement,
            is_new_record: current_score > previous_best,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_progress() {
        let level = PlayerLevel {
            level: 3,
            title: "Novice".to_string(),
            experience_points: 350,
            experience_to_next: 700,
            total_experience: 1250,
        };
        assert_eq!(level.progress(), 0.5);
        assert_eq!(level.experience_remaining(), 350);
    }

    #[test]
    fn test_score_comparison() {
        let better = ScoreComparison::new(300, 200);
        assert_eq!(better.improvement, 100);
        assert_eq!(better.percentage_improvement, 50.0);
        assert!(better.is_new_record);

        let first = ScoreComparison::new(120, 0);
        assert_eq!(first.percentage_improvement, 0.0);
        assert!(first.is_new_record);

        let worse = ScoreComparison::new(100, 200);
        assert_eq!(worse.improvement, -100);
        assert!(!worse.is_new_record);
    }

    #[test]
    fn test_timeframe_labels() {
        assert_eq!(
            "all-time".parse::<LeaderboardTimeframe>().unwrap(),
            LeaderboardTimeframe::AllTime
        );
        assert_eq!(
            "WEEKLY".parse::<LeaderboardTimeframe>().unwrap(),
            LeaderboardTimeframe::Weekly
        );
        assert!("fortnightly".parse::<LeaderboardTimeframe>().is_err());
    }

    #[test]
    fn test_category_accuracy_guards_zero() {
        assert_eq!(CategoryStats::default().accuracy(), 0.0);
        let stats = CategoryStats {
            quizzes_played: 1,
            questions_answered: 4,
            correct_answers: 3,
            average_score: 300.0,
        };
        assert_eq!(stats.accuracy(), 0.75);
    }
}

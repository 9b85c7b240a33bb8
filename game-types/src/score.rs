use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::{GameError, GameType, PuzzleType, QuizCategory};

/// One finished quiz or puzzle. Append-only: written once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreEntry {
    pub id: Uuid,
    pub player_name: String,
    pub score: i32,
    pub game_type: GameType,
    pub difficulty: String,
    pub date: DateTime<Utc>,
    pub time_spent_secs: f64,
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub details: Option<ScoreDetails>,
}

impl ScoreEntry {
    /// Time spent formatted as `MM:SS`.
    pub fn formatted_time(&self) -> String {
        let total = self.time_spent_secs.max(0.0) as u64;
        format!("{:02}:{:02}", total / 60, total % 60)
    }
}

/// Per-game breakdown used by the category and puzzle-type statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ScoreDetails {
    Quiz {
        category: Option<QuizCategory>,
        questions_answered: u32,
        correct_answers: u32,
    },
    Puzzle {
        puzzle_type: PuzzleType,
        completed: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Achievement {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub rarity: AchievementRarity,
    pub unlocked_date: DateTime<Utc>,
    pub category: AchievementCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AchievementRarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl AchievementRarity {
    pub const ALL: [AchievementRarity; 4] = [
        AchievementRarity::Common,
        AchievementRarity::Rare,
        AchievementRarity::Epic,
        AchievementRarity::Legendary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementRarity::Common => "Common",
            AchievementRarity::Rare => "Rare",
            AchievementRarity::Epic => "Epic",
            AchievementRarity::Legendary => "Legendary",
        }
    }

    /// Experience granted for holding an achievement of this rarity.
    pub fn points(&self) -> i32 {
        match self {
            AchievementRarity::Common => 10,
            AchievementRarity::Rare => 25,
            AchievementRarity::Epic => 50,
            AchievementRarity::Legendary => 100,
        }
    }
}

impl fmt::Display for AchievementRarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AchievementRarity {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AchievementRarity::ALL
            .into_iter()
            .find(|rarity| rarity.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::unknown_label("achievement rarity", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AchievementCategory {
    Quiz,
    Puzzle,
    Speed,
    Accuracy,
    Dedication,
    Exploration,
}

impl AchievementCategory {
    pub const ALL: [AchievementCategory; 6] = [
        AchievementCategory::Quiz,
        AchievementCategory::Puzzle,
        AchievementCategory::Speed,
        AchievementCategory::Accuracy,
        AchievementCategory::Dedication,
        AchievementCategory::Exploration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementCategory::Quiz => "Quiz Master",
            AchievementCategory::Puzzle => "Puzzle Solver",
            AchievementCategory::Speed => "Speed Demon",
            AchievementCategory::Accuracy => "Perfectionist",
            AchievementCategory::Dedication => "Dedicated Player",
            AchievementCategory::Exploration => "Explorer",
        }
    }
}

impl fmt::Display for AchievementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AchievementCategory {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AchievementCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::unknown_label("achievement category", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_points() {
        let points: Vec<i32> = AchievementRarity::ALL
            .iter()
            .map(AchievementRarity::points)
            .collect();
        assert_eq!(points, vec![10, 25, 50, 100]);
    }

    #[test]
    fn test_score_entry_without_details_deserializes() {
        let entry = ScoreEntry {
            id: Uuid::new_v4(),
            player_name: "Ada".to_string(),
            score: 450,
            game_type: GameType::Quiz,
            difficulty: "Easy".to_string(),
            date: Utc::now(),
            time_spent_secs: 125.4,
            achievements: vec![],
            details: None,
        };

        let mut json = serde_json::to_value(&entry).unwrap();
        json.as_object_mut().unwrap().remove("details");
        let restored: ScoreEntry = serde_json::from_value(json).unwrap();

        assert_eq!(restored, entry);
        assert_eq!(restored.formatted_time(), "02:05");
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(AchievementCategory::Accuracy.as_str(), "Perfectionist");
        assert_eq!(
            "Dedicated Player".parse::<AchievementCategory>().unwrap(),
            AchievementCategory::Dedication
        );
    }
}

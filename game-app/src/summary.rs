use anyhow::Result;
use chrono::{DateTime, Utc};
use game_core::{GameStore, StatisticsAggregator, calculate_level, total_experience};
use game_types::{Achievement, PlayerLevel, PlayerStatistics, ScoreComparison, ScoreEntry};
use serde::Serialize;

/// What a finished quiz or puzzle produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub entry: ScoreEntry,
    /// Achievements new to the player, already persisted.
    pub unlocked: Vec<Achievement>,
    pub comparison: ScoreComparison,
    /// Level including this game and the achievements it unlocked.
    pub level: PlayerLevel,
}

impl GameSummary {
    pub(crate) fn new(entry: ScoreEntry, unlocked: Vec<Achievement>, history: &PlayerHistory) -> Self {
        let comparison = StatisticsAggregator::score_comparison(&history.entries, entry.score);

        let mut achievements = history.statistics.achievements.clone();
        achievements.extend(unlocked.iter().cloned());
        let level = calculate_level(total_experience(
            history.statistics.total_score + entry.score,
            &achievements,
        ));

        Self {
            entry,
            unlocked,
            comparison,
            level,
        }
    }

    pub fn is_new_record(&self) -> bool {
        self.comparison.is_new_record
    }
}

/// Achievements granted to a finished game, kept until its score entry is
/// saved so a retried save reuses them.
pub(crate) struct Evaluation {
    pub history: PlayerHistory,
    pub unlocked: Vec<Achievement>,
}

/// A player's record as it stood before the game being finished was saved.
pub(crate) struct PlayerHistory {
    pub entries: Vec<ScoreEntry>,
    pub statistics: PlayerStatistics,
}

impl PlayerHistory {
    pub(crate) async fn load(
        store: &dyn GameStore,
        player_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let entries = store.fetch_player_scores(player_name).await?;
        let achievements = store.fetch_achievements(player_name).await?;
        let statistics = StatisticsAggregator::aggregate_at(&entries, &achievements, now);
        Ok(Self {
            entries,
            statistics,
        })
    }
}

//! Reads finished games back out of the storage collaborator and feeds them
//! through the statistics aggregator.

use anyhow::Result;
use chrono::{DateTime, Utc};
use game_core::{GameStore, StatisticsAggregator};
use game_types::{GameType, Leaderboard, LeaderboardTimeframe, PlayerStatistics};

pub async fn player_statistics(
    store: &dyn GameStore,
    player_name: &str,
    now: DateTime<Utc>,
) -> Result<PlayerStatistics> {
    let entries = store.fetch_player_scores(player_name).await?;
    let achievements = store.fetch_achievements(player_name).await?;
    Ok(StatisticsAggregator::aggregate_at(&entries, &achievements, now))
}

pub async fn leaderboard(
    store: &dyn GameStore,
    game_type: Option<GameType>,
    timeframe: LeaderboardTimeframe,
    now: DateTime<Utc>,
) -> Result<Leaderboard> {
    let entries = store.fetch_scores(game_type, None).await?;
    let achievements_by_player = store.fetch_all_achievements().await?;

    Ok(StatisticsAggregator::leaderboard(
        &entries,
        &achievements_by_player,
        game_type,
        timeframe,
        now,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use game_core::{AchievementKind, MemoryStore};
    use game_types::ScoreEntry;
    use uuid::Uuid;

    fn entry(player: &str, score: i32, game_type: GameType, date: DateTime<Utc>) -> ScoreEntry {
        ScoreEntry {
            id: Uuid::new_v4(),
            player_name: player.to_string(),
            score,
            game_type,
            difficulty: "Medium".to_string(),
            date,
            time_spent_secs: 45.0,
            achievements: Vec::new(),
            details: None,
        }
    }

    #[tokio::test]
    async fn test_player_statistics_only_counts_that_player() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.save_score(&entry("Ada", 300, GameType::Quiz, now)).await.unwrap();
        store.save_score(&entry("Ada", 150, GameType::Puzzle, now)).await.unwrap();
        store.save_score(&entry("Grace", 900, GameType::Quiz, now)).await.unwrap();

        let stats = player_statistics(&store, "Ada", now).await.unwrap();
        assert_eq!(stats.total_games_played, 2);
        assert_eq!(stats.total_score, 450);
        assert_eq!(stats.best_score, 300);
        assert_eq!(stats.current_streak, 1);
    }

    #[tokio::test]
    async fn test_leaderboard_collects_achievements_and_timeframe() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.save_score(&entry("Ada", 300, GameType::Quiz, now)).await.unwrap();
        store
            .save_score(&entry("Grace", 900, GameType::Quiz, now - Duration::days(10)))
            .await
            .unwrap();
        store
            .save_achievement(&AchievementKind::FirstSteps.unlock(now), "Ada")
            .await
            .unwrap();

        let weekly = leaderboard(&store, None, LeaderboardTimeframe::Weekly, now)
            .await
            .unwrap();
        assert_eq!(weekly.entries.len(), 1);
        assert_eq!(weekly.entries[0].player_name, "Ada");
        assert_eq!(weekly.entries[0].achievements.len(), 1);

        let all_time = leaderboard(&store, Some(GameType::Quiz), LeaderboardTimeframe::AllTime, now)
            .await
            .unwrap();
        assert_eq!(all_time.rank_of("Grace"), Some(1));
        assert_eq!(all_time.rank_of("Ada"), Some(2));
    }
}

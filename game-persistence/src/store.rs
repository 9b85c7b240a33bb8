use anyhow::Result;
use async_trait::async_trait;
use game_core::GameStore;
use game_types::{Achievement, GameType, ScoreEntry};
use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::entities::prelude::*;
use crate::repositories::{AchievementRepository, ScoreRepository};

/// SQLite-backed storage collaborator.
pub struct SqlGameStore {
    db: DatabaseConnection,
    scores: ScoreRepository,
    achievements: AchievementRepository,
}

impl SqlGameStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            scores: ScoreRepository::new(db.clone()),
            achievements: AchievementRepository::new(db.clone()),
            db,
        }
    }

    pub fn scores(&self) -> &ScoreRepository {
        &self.scores
    }

    pub fn achievements(&self) -> &AchievementRepository {
        &self.achievements
    }
}

#[async_trait]
impl GameStore for SqlGameStore {
    async fn save_score(&self, entry: &ScoreEntry) -> Result<()> {
        self.scores.save(entry).await?;
        debug!("Saved score {} for {}", entry.score, entry.player_name);
        Ok(())
    }

    async fn fetch_scores(
        &self,
        game_type: Option<GameType>,
        limit: Option<u64>,
    ) -> Result<Vec<ScoreEntry>> {
        self.scores.find_top(game_type, limit).await
    }

    async fn fetch_player_scores(&self, player_name: &str) -> Result<Vec<ScoreEntry>> {
        self.scores.find_by_player(player_name).await
    }

    async fn save_achievement(&self, achievement: &Achievement, player_name: &str) -> Result<bool> {
        self.achievements.save_if_absent(achievement, player_name).await
    }

    async fn fetch_achievements(&self, player_name: &str) -> Result<Vec<Achievement>> {
        self.achievements.find_by_player(player_name).await
    }

    async fn fetch_all_achievements(&self) -> Result<HashMap<String, Vec<Achievement>>> {
        self.achievements.find_all_by_player().await
    }

    async fn reset_all_data(&self) -> Result<()> {
        let txn = self.db.begin().await?;
        let scores = ScoreEntries::delete_many().exec(&txn).await?;
        let achievements = Achievements::delete_many().exec(&txn).await?;
        txn.commit().await?;

        info!(
            "Reset all data: removed {} score entries and {} achievements",
            scores.rows_affected, achievements.rows_affected
        );
        Ok(())
    }
}

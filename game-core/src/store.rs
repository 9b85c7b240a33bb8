use anyhow::Result;
use async_trait::async_trait;
use game_types::{Achievement, GameType, ScoreEntry};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Storage collaborator for finished games and unlocked achievements.
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn save_score(&self, entry: &ScoreEntry) -> Result<()>;

    /// Entries ordered by score, highest first.
    async fn fetch_scores(
        &self,
        game_type: Option<GameType>,
        limit: Option<u64>,
    ) -> Result<Vec<ScoreEntry>>;

    /// One player's entries, oldest first.
    async fn fetch_player_scores(&self, player_name: &str) -> Result<Vec<ScoreEntry>>;

    /// Store an achievement for a player. Returns `false` without storing when
    /// the player already holds an achievement with the same title.
    async fn save_achievement(&self, achievement: &Achievement, player_name: &str) -> Result<bool>;

    async fn fetch_achievements(&self, player_name: &str) -> Result<Vec<Achievement>>;

    /// Every stored achievement grouped by player.
    async fn fetch_all_achievements(&self) -> Result<HashMap<String, Vec<Achievement>>>;

    async fn reset_all_data(&self) -> Result<()>;
}

/// Process-local store, used by tests and when no database is configured.
#[derive(Default)]
pub struct MemoryStore {
    scores: Mutex<Vec<ScoreEntry>>,
    achievements: Mutex<Vec<(String, Achievement)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn save_score(&self, entry: &ScoreEntry) -> Result<()> {
        Self::lock(&self.scores).push(entry.clone());
        Ok(())
    }

    async fn fetch_scores(
        &self,
        game_type: Option<GameType>,
        limit: Option<u64>,
    ) -> Result<Vec<ScoreEntry>> {
        let mut entries: Vec<ScoreEntry> = Self::lock(&self.scores)
            .iter()
            .filter(|entry| game_type.is_none_or(|game_type| entry.game_type == game_type))
            .cloned()
            .collect();

        entries.sort_by(|a, b| b.score.cmp(&a.score));
        if let Some(limit) = limit {
            entries.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(entries)
    }

    async fn fetch_player_scores(&self, player_name: &str) -> Result<Vec<ScoreEntry>> {
        let mut entries: Vec<ScoreEntry> = Self::lock(&self.scores)
            .iter()
            .filter(|entry| entry.player_name == player_name)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| entry.date);
        Ok(entries)
    }

    async fn save_achievement(&self, achievement: &Achievement, player_name: &str) -> Result<bool> {
        let mut achievements = Self::lock(&self.achievements);
        let already_held = achievements
            .iter()
            .any(|(player, held)| player == player_name && held.title == achievement.title);

        if already_held {
            debug!("{} already holds '{}'", player_name, achievement.title);
            return Ok(false);
        }

        achievements.push((player_name.to_string(), achievement.clone()));
        Ok(true)
    }

    async fn fetch_achievements(&self, player_name: &str) -> Result<Vec<Achievement>> {
        Ok(Self::lock(&self.achievements)
            .iter()
            .filter(|(player, _)| player == player_name)
            .map(|(_, achievement)| achievement.clone())
            .collect())
    }

    async fn fetch_all_achievements(&self) -> Result<HashMap<String, Vec<Achievement>>> {
        let mut grouped: HashMap<String, Vec<Achievement>> = HashMap::new();
        for (player, achievement) in Self::lock(&self.achievements).iter() {
            grouped
                .entry(player.clone())
                .or_default()
                .push(achievement.clone());
        }
        Ok(grouped)
    }

    async fn reset_all_data(&self) -> Result<()> {
        Self::lock(&self.scores).clear();
        Self::lock(&self.achievements).clear();
        Ok(())
    }
}

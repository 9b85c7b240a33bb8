use anyhow::{Context, Result};
use chrono::Utc;
use game_types::{Achievement, GameType, ScoreDetails, ScoreEntry};
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait,
};
use uuid::Uuid;

use crate::entities::{prelude::*, score_entries};

pub struct ScoreRepository {
    db: DatabaseConnection,
}

impl ScoreRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_entry(model: score_entries::Model) -> Result<ScoreEntry> {
        let achievements: Vec<Achievement> = serde_json::from_str(&model.achievements)
            .with_context(|| format!("Corrupt achievements column on score entry {}", model.id))?;
        let details = model
            .details
            .as_deref()
            .map(|details| serde_json::from_str::<ScoreDetails>(details))
            .transpose()
            .with_context(|| format!("Corrupt details column on score entry {}", model.id))?;

        Ok(ScoreEntry {
            id: Uuid::parse_str(&model.id)
                .with_context(|| format!("Invalid score entry id {}", model.id))?,
            player_name: model.player_name,
            score: model.score,
            game_type: model.game_type.parse::<GameType>()?,
            difficulty: model.difficulty,
            date: model.date.with_timezone(&Utc),
            time_spent_secs: model.time_spent_secs,
            achievements,
            details,
        })
    }

    pub async fn save(&self, entry: &ScoreEntry) -> Result<()> {
        let details = entry
            .details
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let entry_model = score_entries::ActiveModel {
            id: ActiveValue::Set(entry.id.to_string()),
            player_name: ActiveValue::Set(entry.player_name.clone()),
            score: ActiveValue::Set(entry.score),
            game_type: ActiveValue::Set(entry.game_type.as_str().to_string()),
            difficulty: ActiveValue::Set(entry.difficulty.clone()),
            date: ActiveValue::Set(entry.date.into()),
            time_spent_secs: ActiveValue::Set(entry.time_spent_secs),
            achievements: ActiveValue::Set(serde_json::to_string(&entry.achievements)?),
            details: ActiveValue::Set(details),
        };

        ScoreEntries::insert(entry_model)
            .exec_without_returning(&self.db)
            .await
            .with_context(|| format!("Failed to save score entry {}", entry.id))?;
        Ok(())
    }

    /// Entries ordered by score, highest first.
    pub async fn find_top(
        &self,
        game_type: Option<GameType>,
        limit: Option<u64>,
    ) -> Result<Vec<ScoreEntry>> {
        let models = ScoreEntries::find()
            .apply_if(game_type, |query, game_type| {
                query.filter(score_entries::Column::GameType.eq(game_type.as_str()))
            })
            .order_by_desc(score_entries::Column::Score)
            .order_by_asc(score_entries::Column::Date)
            .limit(limit)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::model_to_entry).collect()
    }

    /// A player's entries, oldest first.
    pub async fn find_by_player(&self, player_name: &str) -> Result<Vec<ScoreEntry>> {
        let models = ScoreEntries::find()
            .filter(score_entries::Column::PlayerName.eq(player_name))
            .order_by_asc(score_entries::Column::Date)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::model_to_entry).collect()
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(ScoreEntries::find().count(&self.db).await?)
    }
}

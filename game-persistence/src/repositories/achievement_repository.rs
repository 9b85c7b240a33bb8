use anyhow::{Context, Result};
use chrono::Utc;
use game_types::{Achievement, AchievementCategory, AchievementRarity};
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::entities::{achievements, prelude::*};

pub struct AchievementRepository {
    db: DatabaseConnection,
}

impl AchievementRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_achievement(model: achievements::Model) -> Result<Achievement> {
        Ok(Achievement {
            id: Uuid::parse_str(&model.id)
                .with_context(|| format!("Invalid achievement id {}", model.id))?,
            title: model.title,
            description: model.description,
            icon: model.icon,
            rarity: model.rarity.parse::<AchievementRarity>()?,
            unlocked_date: model.unlocked_date.with_timezone(&Utc),
            category: model.category.parse::<AchievementCategory>()?,
        })
    }

    pub async fn exists(&self, player_name: &str, title: &str) -> Result<bool> {
        let held = Achievements::find()
            .filter(achievements::Column::PlayerName.eq(player_name))
            .filter(achievements::Column::Title.eq(title))
            .count(&self.db)
            .await?;
        Ok(held > 0)
    }

    /// Insert unless the player already holds an achievement with this title.
    pub async fn save_if_absent(&self, achievement: &Achievement, player_name: &str) -> Result<bool> {
        if self.exists(player_name, &achievement.title).await? {
            return Ok(false);
        }

        let achievement_model = achievements::ActiveModel {
            id: ActiveValue::Set(achievement.id.to_string()),
            player_name: ActiveValue::Set(player_name.to_string()),
            title: ActiveValue::Set(achievement.title.clone()),
            description: ActiveValue::Set(achievement.description.clone()),
            icon: ActiveValue::Set(achievement.icon.clone()),
            rarity: ActiveValue::Set(achievement.rarity.as_str().to_string()),
            category: ActiveValue::Set(achievement.category.as_str().to_string()),
            unlocked_date: ActiveValue::Set(achievement.unlocked_date.into()),
        };

        Achievements::insert(achievement_model)
            .exec_without_returning(&self.db)
            .await
            .with_context(|| {
                format!("Failed to save '{}' for {}", achievement.title, player_name)
            })?;
        Ok(true)
    }

    pub async fn find_by_player(&self, player_name: &str) -> Result<Vec<Achievement>> {
        let models = Achievements::find()
            .filter(achievements::Column::PlayerName.eq(player_name))
            .order_by_asc(achievements::Column::UnlockedDate)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::model_to_achievement).collect()
    }

    /// Every stored achievement grouped by player.
    pub async fn find_all_by_player(&self) -> Result<HashMap<String, Vec<Achievement>>> {
        let models = Achievements::find()
            .order_by_asc(achievements::Column::UnlockedDate)
            .all(&self.db)
            .await?;

        let mut grouped: HashMap<String, Vec<Achievement>> = HashMap::new();
        for model in models {
            let player_name = model.player_name.clone();
            grouped
                .entry(player_name)
                .or_default()
                .push(Self::model_to_achievement(model)?);
        }
        Ok(grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};

    async fn setup_test_db() -> AchievementRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        AchievementRepository::new(db)
    }

    fn achievement(title: &str, rarity: AchievementRarity) -> Achievement {
        Achievement {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "Complete your first quiz".to_string(),
            icon: "flag.fill".to_string(),
            rarity,
            unlocked_date: Utc::now(),
            category: AchievementCategory::Quiz,
        }
    }

    #[tokio::test]
    async fn test_save_if_absent_deduplicates() {
        let repo = setup_test_db().await;

        let first_steps = achievement("First Steps", AchievementRarity::Common);
        assert!(repo.save_if_absent(&first_steps, "Ada").await.unwrap());
        assert!(!repo
            .save_if_absent(&achievement("First Steps", AchievementRarity::Common), "Ada")
            .await
            .unwrap());
        assert!(repo
            .save_if_absent(&achievement("First Steps", AchievementRarity::Common), "Grace")
            .await
            .unwrap());

        let held = repo.find_by_player("Ada").await.unwrap();
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].rarity, AchievementRarity::Common);
        assert_eq!(held[0].category, AchievementCategory::Quiz);
    }

    #[tokio::test]
    async fn test_grouped_by_player() {
        let repo = setup_test_db().await;
        repo.save_if_absent(&achievement("First Steps", AchievementRarity::Common), "Ada")
            .await
            .unwrap();
        repo.save_if_absent(&achievement("Quiz Master", AchievementRarity::Legendary), "Ada")
            .await
            .unwrap();
        repo.save_if_absent(&achievement("First Steps", AchievementRarity::Common), "Grace")
            .await
            .unwrap();

        let grouped = repo.find_all_by_player().await.unwrap();
        assert_eq!(grouped["Ada"].len(), 2);
        assert_eq!(grouped["Grace"].len(), 1);
        assert!(repo.exists("Grace", "First Steps").await.unwrap());
        assert!(!repo.exists("Grace", "Quiz Master").await.unwrap());
    }
}

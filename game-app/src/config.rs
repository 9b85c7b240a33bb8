use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use game_core::QuestionBank;
use game_persistence::connection::DEFAULT_DATABASE_URL;

pub const DEFAULT_PLAYER_NAME: &str = "Player";
pub const DEFAULT_QUIZ_QUESTION_COUNT: usize = 10;
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub player_name: String,
    pub quiz_question_count: usize,
    /// `None` plays untimed quizzes.
    pub quiz_time_limit_secs: Option<u32>,
    pub leaderboard_size: usize,
    /// JSON question bank; the built-in questions when unset.
    pub question_bank_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Unset and blank variables fall
    /// back to their defaults; malformed ones are errors naming the variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Ok(Self {
            database_url: read("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            player_name: read("PLAYER_NAME").unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string()),
            quiz_question_count: parse_var("QUIZ_QUESTION_COUNT", read("QUIZ_QUESTION_COUNT"))?
                .unwrap_or(DEFAULT_QUIZ_QUESTION_COUNT),
            quiz_time_limit_secs: parse_var(
                "QUIZ_TIME_LIMIT_SECONDS",
                read("QUIZ_TIME_LIMIT_SECONDS"),
            )?,
            leaderboard_size: parse_var("LEADERBOARD_SIZE", read("LEADERBOARD_SIZE"))?
                .unwrap_or(DEFAULT_LEADERBOARD_SIZE),
            question_bank_path: read("QUESTION_BANK_PATH").map(PathBuf::from),
        })
    }

    pub fn question_bank(&self) -> Result<QuestionBank> {
        match &self.question_bank_path {
            Some(path) => QuestionBank::load(path),
            None => Ok(QuestionBank::seeded()),
        }
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            player_name: self.player_name.clone(),
            quiz_question_count: self.quiz_question_count,
            quiz_time_limit_secs: self.quiz_time_limit_secs,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            quiz_question_count: DEFAULT_QUIZ_QUESTION_COUNT,
            quiz_time_limit_secs: None,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            question_bank_path: None,
        }
    }
}

/// What the game controllers need from the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    pub player_name: String,
    pub quiz_question_count: usize,
    pub quiz_time_limit_secs: Option<u32>,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Config::default().controller_settings()
    }
}

fn parse_var<T>(name: &str, value: Option<String>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("Invalid {}: '{}'", name, raw))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.database_url, "sqlite://quiztrek.db?mode=rwc");
        assert_eq!(config.quiz_time_limit_secs, None);
        assert_eq!(config.question_bank().unwrap().len(), QuestionBank::seeded().len());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PLAYER_NAME", "Ada"),
            ("QUIZ_QUESTION_COUNT", "5"),
            ("QUIZ_TIME_LIMIT_SECONDS", " 90 "),
            ("LEADERBOARD_SIZE", ""),
        ])
        .unwrap();

        assert_eq!(config.player_name, "Ada");
        assert_eq!(config.quiz_question_count, 5);
        assert_eq!(config.quiz_time_limit_secs, Some(90));
        assert_eq!(config.leaderboard_size, DEFAULT_LEADERBOARD_SIZE);
    }

    #[test]
    fn test_invalid_value_names_variable() {
        let err = config_from(&[("QUIZ_QUESTION_COUNT", "ten")]).unwrap_err();
        assert!(err.to_string().contains("QUIZ_QUESTION_COUNT"));
    }

    #[test]
    fn test_question_bank_path_is_loaded() {
        let config = config_from(&[("QUESTION_BANK_PATH", "/nonexistent/questions.json")]).unwrap();
        assert_eq!(
            config.question_bank_path,
            Some(PathBuf::from("/nonexistent/questions.json"))
        );

        let err = config.question_bank().unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/questions.json"));
    }
}

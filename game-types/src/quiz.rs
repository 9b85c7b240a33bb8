use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::GameError;

pub type QuestionId = Uuid;

/// Number of answer options every question carries.
pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum QuizCategory {
    Science,
    History,
    Geography,
    Sports,
    Entertainment,
    Technology,
    Literature,
    Art,
}

impl QuizCategory {
    pub const ALL: [QuizCategory; 8] = [
        QuizCategory::Science,
        QuizCategory::History,
        QuizCategory::Geography,
        QuizCategory::Sports,
        QuizCategory::Entertainment,
        QuizCategory::Technology,
        QuizCategory::Literature,
        QuizCategory::Art,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuizCategory::Science => "Science",
            QuizCategory::History => "History",
            QuizCategory::Geography => "Geography",
            QuizCategory::Sports => "Sports",
            QuizCategory::Entertainment => "Entertainment",
            QuizCategory::Technology => "Technology",
            QuizCategory::Literature => "Literature",
            QuizCategory::Art => "Art",
        }
    }
}

impl fmt::Display for QuizCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuizCategory {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuizCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::unknown_label("quiz category", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum QuizDifficulty {
    Easy,
    Medium,
    Hard,
}

impl QuizDifficulty {
    pub const ALL: [QuizDifficulty; 3] = [
        QuizDifficulty::Easy,
        QuizDifficulty::Medium,
        QuizDifficulty::Hard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuizDifficulty::Easy => "Easy",
            QuizDifficulty::Medium => "Medium",
            QuizDifficulty::Hard => "Hard",
        }
    }

    /// Score multiplier in hundredths (1.0 / 1.5 / 2.0).
    pub fn multiplier_percent(&self) -> u32 {
        match self {
            QuizDifficulty::Easy => 100,
            QuizDifficulty::Medium => 150,
            QuizDifficulty::Hard => 200,
        }
    }

    pub fn multiplier(&self) -> f64 {
        f64::from(self.multiplier_percent()) / 100.0
    }
}

impl fmt::Display for QuizDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuizDifficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuizDifficulty::ALL
            .into_iter()
            .find(|difficulty| difficulty.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::unknown_label("quiz difficulty", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuizQuestion {
    #[serde(default = "Uuid::new_v4")]
    pub id: QuestionId,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub category: QuizCategory,
    pub difficulty: QuizDifficulty,
    pub explanation: String,
}

impl QuizQuestion {
    pub fn new(
        question: &str,
        options: [&str; OPTIONS_PER_QUESTION],
        correct_answer_index: usize,
        category: QuizCategory,
        difficulty: QuizDifficulty,
        explanation: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            question: question.to_string(),
            options: options.iter().map(|option| option.to_string()).collect(),
            correct_answer_index,
            category,
            difficulty,
            explanation: explanation.to_string(),
        }
    }

    /// Structural check applied to every question entering a bank.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.options.len() != OPTIONS_PER_QUESTION {
            return Err(GameError::InvalidQuestion {
                reason: format!(
                    "'{}' has {} options, expected {}",
                    self.question,
                    self.options.len(),
                    OPTIONS_PER_QUESTION
                ),
            });
        }

        if self.correct_answer_index >= self.options.len() {
            return Err(GameError::InvalidQuestion {
                reason: format!(
                    "'{}' marks option {} as correct but only has {} options",
                    self.question,
                    self.correct_answer_index,
                    self.options.len()
                ),
            });
        }

        if self.question.trim().is_empty() {
            return Err(GameError::InvalidQuestion {
                reason: "question text is empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn is_correct(&self, answer_index: usize) -> bool {
        answer_index == self.correct_answer_index
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options
            .get(self.correct_answer_index)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question() -> QuizQuestion {
        QuizQuestion::new(
            "Which planet is known as the Red Planet?",
            ["Venus", "Mars", "Jupiter", "Saturn"],
            1,
            QuizCategory::Science,
            QuizDifficulty::Easy,
            "Mars appears red due to iron oxide on its surface.",
        )
    }

    #[test]
    fn test_multipliers() {
        assert_eq!(QuizDifficulty::Easy.multiplier_percent(), 100);
        assert_eq!(QuizDifficulty::Medium.multiplier(), 1.5);
        assert_eq!(QuizDifficulty::Hard.multiplier(), 2.0);
    }

    #[test]
    fn test_question_validation() {
        let question = sample_question();
        assert!(question.validate().is_ok());
        assert!(question.is_correct(1));
        assert_eq!(question.correct_option(), Some("Mars"));

        let mut out_of_bounds = sample_question();
        out_of_bounds.correct_answer_index = 4;
        assert!(matches!(
            out_of_bounds.validate(),
            Err(GameError::InvalidQuestion { .. })
        ));

        let mut three_options = sample_question();
        three_options.options.pop();
        assert!(three_options.validate().is_err());
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!(
            "technology".parse::<QuizCategory>().unwrap(),
            QuizCategory::Technology
        );
        assert!(matches!(
            "cooking".parse::<QuizCategory>(),
            Err(GameError::UnknownLabel { .. })
        ));
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameType {
    Quiz,
    Puzzle,
    Mixed,
}

impl GameType {
    pub const ALL: [GameType; 3] = [GameType::Quiz, GameType::Puzzle, GameType::Mixed];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Quiz => "Quiz",
            GameType::Puzzle => "Puzzle",
            GameType::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameType::ALL
            .into_iter()
            .find(|game_type| game_type.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::unknown_label("game type", s))
    }
}

/// Lifecycle of a quiz session or puzzle. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SessionStatus {
    Active,
    Completed,
}

/// Why a player action left the session untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum IgnoreReason {
    SessionCompleted,
    NoCurrentQuestion,
    AnswerOutOfRange,
    WrongPuzzleType,
    UnknownWord,
    WordAlreadyFound,
    IndexNotHidden,
    UnknownPattern,
    UnknownOption,
}

/// Result of applying one player action to a session or puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum MoveOutcome {
    Accepted { points_awarded: i32, completed: bool },
    Ignored { reason: IgnoreReason },
}

impl MoveOutcome {
    pub fn ignored(reason: IgnoreReason) -> Self {
        MoveOutcome::Ignored { reason }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, MoveOutcome::Accepted { .. })
    }

    pub fn points_awarded(&self) -> i32 {
        match self {
            MoveOutcome::Accepted { points_awarded, .. } => *points_awarded,
            MoveOutcome::Ignored { .. } => 0,
        }
    }

    pub fn completed(&self) -> bool {
        matches!(self, MoveOutcome::Accepted { completed: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_type_labels_parse_case_insensitively() {
        assert_eq!("quiz".parse::<GameType>().unwrap(), GameType::Quiz);
        assert_eq!(" Puzzle ".parse::<GameType>().unwrap(), GameType::Puzzle);
        assert!("arcade".parse::<GameType>().is_err());
    }

    #[test]
    fn test_move_outcome_helpers() {
        let accepted = MoveOutcome::Accepted {
            points_awarded: 130,
            completed: true,
        };
        assert!(accepted.is_accepted());
        assert!(accepted.completed());
        assert_eq!(accepted.points_awarded(), 130);

        let ignored = MoveOutcome::ignored(IgnoreReason::UnknownWord);
        assert!(!ignored.is_accepted());
        assert!(!ignored.completed());
        assert_eq!(ignored.points_awarded(), 0);
    }
}

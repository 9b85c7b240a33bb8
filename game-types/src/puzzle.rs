use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::GameError;

pub type PuzzleId = Uuid;
pub type PatternId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PuzzleType {
    WordSearch,
    NumberSequence,
    PatternMatching,
}

impl PuzzleType {
    pub const ALL: [PuzzleType; 3] = [
        PuzzleType::WordSearch,
        PuzzleType::NumberSequence,
        PuzzleType::PatternMatching,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PuzzleType::WordSearch => "Word Search",
            PuzzleType::NumberSequence => "Number Sequence",
            PuzzleType::PatternMatching => "Pattern Matching",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PuzzleType::WordSearch => "Find hidden words in a grid of letters",
            PuzzleType::NumberSequence => "Find the pattern in number sequences",
            PuzzleType::PatternMatching => "Match patterns and shapes",
        }
    }
}

impl fmt::Display for PuzzleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PuzzleType {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PuzzleType::ALL
            .into_iter()
            .find(|puzzle_type| puzzle_type.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::unknown_label("puzzle type", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PuzzleDifficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl PuzzleDifficulty {
    pub const ALL: [PuzzleDifficulty; 4] = [
        PuzzleDifficulty::Beginner,
        PuzzleDifficulty::Intermediate,
        PuzzleDifficulty::Advanced,
        PuzzleDifficulty::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PuzzleDifficulty::Beginner => "Beginner",
            PuzzleDifficulty::Intermediate => "Intermediate",
            PuzzleDifficulty::Advanced => "Advanced",
            PuzzleDifficulty::Expert => "Expert",
        }
    }

    /// Score multiplier in hundredths (1.0 / 1.3 / 1.7 / 2.5).
    pub fn multiplier_percent(&self) -> u32 {
        match self {
            PuzzleDifficulty::Beginner => 100,
            PuzzleDifficulty::Intermediate => 130,
            PuzzleDifficulty::Advanced => 170,
            PuzzleDifficulty::Expert => 250,
        }
    }

    pub fn multiplier(&self) -> f64 {
        f64::from(self.multiplier_percent()) / 100.0
    }
}

impl fmt::Display for PuzzleDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PuzzleDifficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PuzzleDifficulty::ALL
            .into_iter()
            .find(|difficulty| difficulty.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::unknown_label("puzzle difficulty", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PatternShape {
    Circle,
    Square,
    Triangle,
    Diamond,
    Star,
    Hexagon,
}

impl PatternShape {
    pub const ALL: [PatternShape; 6] = [
        PatternShape::Circle,
        PatternShape::Square,
        PatternShape::Triangle,
        PatternShape::Diamond,
        PatternShape::Star,
        PatternShape::Hexagon,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PatternColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl PatternColor {
    pub const ALL: [PatternColor; 6] = [
        PatternColor::Red,
        PatternColor::Blue,
        PatternColor::Green,
        PatternColor::Yellow,
        PatternColor::Purple,
        PatternColor::Orange,
    ];

    pub fn hex_value(&self) -> &'static str {
        match self {
            PatternColor::Red => "#F44336",
            PatternColor::Blue => "#2196F3",
            PatternColor::Green => "#4CAF50",
            PatternColor::Yellow => "#FFEB3B",
            PatternColor::Purple => "#9C27B0",
            PatternColor::Orange => "#FF9800",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PatternSize {
    Small,
    Medium,
    Large,
}

impl PatternSize {
    pub const ALL: [PatternSize; 3] = [PatternSize::Small, PatternSize::Medium, PatternSize::Large];

    /// Rendered edge length in points.
    pub fn points(&self) -> u32 {
        match self {
            PatternSize::Small => 20,
            PatternSize::Medium => 30,
            PatternSize::Large => 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatternItem {
    pub id: PatternId,
    pub shape: PatternShape,
    pub color: PatternColor,
    pub size: PatternSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GridPosition {
    pub row: usize,
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PlacementDirection {
    Horizontal,
    Vertical,
    Diagonal,
}

impl PlacementDirection {
    pub const ALL: [PlacementDirection; 3] = [
        PlacementDirection::Horizontal,
        PlacementDirection::Vertical,
        PlacementDirection::Diagonal,
    ];

    /// Row and column step taken per letter.
    pub fn step(&self) -> (usize, usize) {
        match self {
            PlacementDirection::Horizontal => (0, 1),
            PlacementDirection::Vertical => (1, 0),
            PlacementDirection::Diagonal => (1, 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WordPlacement {
    pub word: String,
    pub start: GridPosition,
    pub direction: PlacementDirection,
}

impl WordPlacement {
    /// Cells covered by the word, first letter first.
    pub fn cells(&self) -> Vec<GridPosition> {
        let (row_step, col_step) = self.direction.step();
        (0..self.word.chars().count())
            .map(|offset| {
                GridPosition::new(
                    self.start.row + offset * row_step,
                    self.start.col + offset * col_step,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_puzzle_multipliers() {
        let percents: Vec<u32> = PuzzleDifficulty::ALL
            .iter()
            .map(PuzzleDifficulty::multiplier_percent)
            .collect();
        assert_eq!(percents, vec![100, 130, 170, 250]);
        assert_eq!(PuzzleDifficulty::Expert.multiplier(), 2.5);
    }

    #[test]
    fn test_puzzle_type_round_trips_through_label() {
        for puzzle_type in PuzzleType::ALL {
            assert_eq!(puzzle_type.as_str().parse::<PuzzleType>().unwrap(), puzzle_type);
        }
    }

    #[test]
    fn test_placement_cells() {
        let placement = WordPlacement {
            word: "CODE".to_string(),
            start: GridPosition::new(1, 2),
            direction: PlacementDirection::Diagonal,
        };
        assert_eq!(
            placement.cells(),
            vec![
                GridPosition::new(1, 2),
                GridPosition::new(2, 3),
                GridPosition::new(3, 4),
                GridPosition::new(4, 5),
            ]
        );
    }
}

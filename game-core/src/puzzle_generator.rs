use game_types::{PuzzleDifficulty, PuzzleType};
use rand::Rng;
use tracing::debug;

use crate::number_sequence::NumberSequence;
use crate::pattern_matching::PatternMatching;
use crate::puzzle::{Puzzle, PuzzleKind};
use crate::word_search::{DEFAULT_PLACEMENT_ATTEMPTS, GridBuilder};

/// Parameters for one word-search difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSearchParams {
    pub grid_size: usize,
    pub words: &'static [&'static str],
    pub time_budget_secs: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberSequenceParams {
    pub length: usize,
    pub missing_count: usize,
    pub time_budget_secs: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternMatchingParams {
    pub pair_count: usize,
    pub time_budget_secs: u32,
}

pub fn word_search_params(difficulty: PuzzleDifficulty) -> WordSearchParams {
    match difficulty {
        PuzzleDifficulty::Beginner => WordSearchParams {
            grid_size: 10,
            words: &["SWIFT", "CODE", "APP", "iOS", "MAC"],
            time_budget_secs: 300,
        },
        PuzzleDifficulty::Intermediate => WordSearchParams {
            grid_size: 12,
            words: &["PROGRAMMING", "DEVELOPER", "XCODE", "INTERFACE", "DESIGN", "MOBILE"],
            time_budget_secs: 600,
        },
        PuzzleDifficulty::Advanced => WordSearchParams {
            grid_size: 15,
            words: &[
                "ARCHITECTURE",
                "FRAMEWORK",
                "ALGORITHM",
                "DATABASE",
                "NETWORKING",
                "SECURITY",
                "OPTIMIZATION",
            ],
            time_budget_secs: 900,
        },
        PuzzleDifficulty::Expert => WordSearchParams {
            grid_size: 18,
            words: &[
                "MULTITHREADING",
                "SYNCHRONIZATION",
                "ENCAPSULATION",
                "POLYMORPHISM",
                "INHERITANCE",
                "ABSTRACTION",
                "COMPOSITION",
                "DELEGATION",
            ],
            time_budget_secs: 1200,
        },
    }
}

pub fn number_sequence_params(difficulty: PuzzleDifficulty) -> NumberSequenceParams {
    let (length, missing_count, time_budget_secs) = match difficulty {
        PuzzleDifficulty::Beginner => (8, 2, 180),
        PuzzleDifficulty::Intermediate => (10, 3, 300),
        PuzzleDifficulty::Advanced => (12, 4, 420),
        PuzzleDifficulty::Expert => (15, 5, 600),
    };
    NumberSequenceParams {
        length,
        missing_count,
        time_budget_secs,
    }
}

pub fn pattern_matching_params(difficulty: PuzzleDifficulty) -> PatternMatchingParams {
    let (pair_count, time_budget_secs) = match difficulty {
        PuzzleDifficulty::Beginner => (4, 240),
        PuzzleDifficulty::Intermediate => (6, 360),
        PuzzleDifficulty::Advanced => (8, 480),
        PuzzleDifficulty::Expert => (10, 600),
    };
    PatternMatchingParams {
        pair_count,
        time_budget_secs,
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    /// Random word placements tried before the exhaustive scan.
    pub placement_attempts: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            placement_attempts: DEFAULT_PLACEMENT_ATTEMPTS,
        }
    }
}

/// Builds puzzle instances from the difficulty tables.
#[derive(Debug, Clone, Default)]
pub struct PuzzleGenerator {
    settings: GeneratorSettings,
}

impl PuzzleGenerator {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self { settings }
    }

    pub fn generate(&self, puzzle_type: PuzzleType, difficulty: PuzzleDifficulty) -> Puzzle {
        self.generate_with_rng(puzzle_type, difficulty, &mut rand::thread_rng())
    }

    pub fn generate_random(&self, difficulty: PuzzleDifficulty) -> Puzzle {
        self.generate_random_with_rng(difficulty, &mut rand::thread_rng())
    }

    /// `count` puzzles of independently chosen types.
    pub fn generate_set(&self, count: usize, difficulty: PuzzleDifficulty) -> Vec<Puzzle> {
        let mut rng = rand::thread_rng();
        (0..count)
            .map(|_| self.generate_random_with_rng(difficulty, &mut rng))
            .collect()
    }

    pub fn generate_random_with_rng<R: Rng + ?Sized>(
        &self,
        difficulty: PuzzleDifficulty,
        rng: &mut R,
    ) -> Puzzle {
        let puzzle_type = PuzzleType::ALL[rng.gen_range(0..PuzzleType::ALL.len())];
        self.generate_with_rng(puzzle_type, difficulty, rng)
    }

    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        puzzle_type: PuzzleType,
        difficulty: PuzzleDifficulty,
        rng: &mut R,
    ) -> Puzzle {
        let (kind, time_budget_secs) = match puzzle_type {
            PuzzleType::WordSearch => {
                let params = word_search_params(difficulty);
                let search = GridBuilder::with_attempts(params.grid_size, self.settings.placement_attempts)
                    .build(params.words, rng);
                (PuzzleKind::WordSearch(search), params.time_budget_secs)
            }
            PuzzleType::NumberSequence => {
                let params = number_sequence_params(difficulty);
                let sequence = NumberSequence::generate(params.length, params.missing_count, rng);
                (PuzzleKind::NumberSequence(sequence), params.time_budget_secs)
            }
            PuzzleType::PatternMatching => {
                let params = pattern_matching_params(difficulty);
                let matching = PatternMatching::generate(params.pair_count, rng);
                (PuzzleKind::PatternMatching(matching), params.time_budget_secs)
            }
        };

        let title = format!("{} {}", difficulty, puzzle_type);
        debug!("Generated {} with a {}s budget", title, time_budget_secs);
        Puzzle::new(title, difficulty, time_budget_secs, kind)
    }
}

use game_types::{GridPosition, IgnoreReason, PlacementDirection, WordPlacement};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

const BLANK: char = ' ';

/// Random placements tried per word before falling back to a full scan.
pub const DEFAULT_PLACEMENT_ATTEMPTS: usize = 100;

/// Uppercase the word and strip anything outside A–Z.
pub fn normalize_word(word: &str) -> String {
    word.chars()
        .filter(|ch| ch.is_ascii_alphabetic())
        .map(|ch| ch.to_ascii_uppercase())
        .collect()
}

/// Word-search state: an immutable square letter grid plus found-word progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSearch {
    pub grid: Vec<Vec<char>>,
    pub grid_size: usize,
    pub words_to_find: Vec<String>,
    pub found_words: BTreeSet<String>,
    pub placements: Vec<WordPlacement>,
}

impl WordSearch {
    /// Wrap an existing grid. Words that cannot be located in the grid are still
    /// listed, but have no placement.
    pub fn new(grid: Vec<Vec<char>>, words: &[&str]) -> Self {
        let grid_size = grid.len();
        let mut search = Self {
            grid,
            grid_size,
            words_to_find: Vec::new(),
            found_words: BTreeSet::new(),
            placements: Vec::new(),
        };

        for word in words {
            let word = normalize_word(word);
            if word.is_empty() || search.words_to_find.contains(&word) {
                continue;
            }
            if let Some(placement) = search.locate(&word) {
                search.placements.push(placement);
            }
            search.words_to_find.push(word);
        }

        search
    }

    pub fn progress(&self) -> f64 {
        if self.words_to_find.is_empty() {
            return 0.0;
        }
        self.found_words.len() as f64 / self.words_to_find.len() as f64
    }

    pub fn is_solved(&self) -> bool {
        !self.words_to_find.is_empty()
            && self
                .words_to_find
                .iter()
                .all(|word| self.found_words.contains(word))
    }

    pub fn is_found(&self, word: &str) -> bool {
        self.found_words.contains(&normalize_word(word))
    }

    /// Record `word` as found. Unknown or already-found words are rejected.
    pub(crate) fn mark_found(&mut self, word: &str) -> Result<(), IgnoreReason> {
        let word = normalize_word(word);
        if !self.words_to_find.contains(&word) {
            return Err(IgnoreReason::UnknownWord);
        }
        if !self.found_words.insert(word) {
            return Err(IgnoreReason::WordAlreadyFound);
        }
        Ok(())
    }

    pub fn placement_of(&self, word: &str) -> Option<&WordPlacement> {
        let word = normalize_word(word);
        self.placements.iter().find(|placement| placement.word == word)
    }

    pub fn letter_at(&self, position: GridPosition) -> Option<char> {
        self.grid
            .get(position.row)
            .and_then(|row| row.get(position.col))
            .copied()
    }

    /// Letters along a straight horizontal, vertical or diagonal line from
    /// `from` to `to` (inclusive, either direction).
    pub fn read_selection(&self, from: GridPosition, to: GridPosition) -> Option<String> {
        let row_delta = to.row as isize - from.row as isize;
        let col_delta = to.col as isize - from.col as isize;

        let straight = row_delta == 0 || col_delta == 0 || row_delta.abs() == col_delta.abs();
        if !straight {
            return None;
        }

        let length = row_delta.abs().max(col_delta.abs());
        let row_step = row_delta.signum();
        let col_step = col_delta.signum();

        (0..=length)
            .map(|offset| {
                let row = from.row as isize + offset * row_step;
                let col = from.col as isize + offset * col_step;
                self.letter_at(GridPosition::new(row as usize, col as usize))
            })
            .collect()
    }

    /// The listed word spelled by a selection, read forwards or backwards.
    pub fn word_for_selection(&self, from: GridPosition, to: GridPosition) -> Option<&str> {
        let letters = self.read_selection(from, to)?;
        let reversed: String = letters.chars().rev().collect();
        self.words_to_find
            .iter()
            .find(|word| **word == letters || **word == reversed)
            .map(String::as_str)
    }

    fn locate(&self, word: &str) -> Option<WordPlacement> {
        for direction in PlacementDirection::ALL {
            for row in 0..self.grid_size {
                for col in 0..self.grid_size {
                    let placement = WordPlacement {
                        word: word.to_string(),
                        start: GridPosition::new(row, col),
                        direction,
                    };
                    let spelled = placement
                        .cells()
                        .into_iter()
                        .map(|cell| self.letter_at(cell))
                        .collect::<Option<String>>();
                    if spelled.as_deref() == Some(word) {
                        return Some(placement);
                    }
                }
            }
        }
        None
    }
}

/// Places words into a blank square grid, then fills the rest with random letters.
///
/// A placement is accepted only when every cell it covers is blank or already
/// holds the same letter, so crossing words share letters and never overwrite
/// each other. After `attempts` random tries the builder scans every slot; a
/// word that still has nowhere to go is dropped from the word list, which keeps
/// every listed word findable.
#[derive(Debug, Clone)]
pub struct GridBuilder {
    size: usize,
    attempts: usize,
    grid: Vec<Vec<char>>,
    placements: Vec<WordPlacement>,
}

impl GridBuilder {
    pub fn new(size: usize) -> Self {
        Self::with_attempts(size, DEFAULT_PLACEMENT_ATTEMPTS)
    }

    pub fn with_attempts(size: usize, attempts: usize) -> Self {
        Self {
            size,
            attempts,
            grid: vec![vec![BLANK; size]; size],
            placements: Vec::new(),
        }
    }

    pub fn build<R: Rng + ?Sized>(mut self, words: &[&str], rng: &mut R) -> WordSearch {
        for word in words {
            let word = normalize_word(word);
            if word.is_empty() || self.placements.iter().any(|p| p.word == word) {
                continue;
            }

            match self.find_slot(&word, rng) {
                Some(placement) => {
                    debug!(
                        "Placed {} at ({}, {}) {:?}",
                        placement.word, placement.start.row, placement.start.col, placement.direction
                    );
                    self.place(&placement);
                    self.placements.push(placement);
                }
                None => {
                    warn!(
                        "No room for '{}' in a {}x{} grid, dropping it from the word list",
                        word, self.size, self.size
                    );
                }
            }
        }

        for row in self.grid.iter_mut() {
            for cell in row.iter_mut() {
                if *cell == BLANK {
                    *cell = char::from(b'A' + rng.gen_range(0..26u8));
                }
            }
        }

        let words_to_find = self.placements.iter().map(|p| p.word.clone()).collect();
        WordSearch {
            grid: self.grid,
            grid_size: self.size,
            words_to_find,
            found_words: BTreeSet::new(),
            placements: self.placements,
        }
    }

    fn find_slot<R: Rng + ?Sized>(&self, word: &str, rng: &mut R) -> Option<WordPlacement> {
        if self.size == 0 || word.len() > self.size {
            return None;
        }

        for _ in 0..self.attempts {
            let direction = PlacementDirection::ALL[rng.gen_range(0..PlacementDirection::ALL.len())];
            let start = GridPosition::new(rng.gen_range(0..self.size), rng.gen_range(0..self.size));
            if self.fits(word, start, direction) {
                return Some(Self::placement(word, start, direction));
            }
        }

        let mut candidates = Vec::new();
        for direction in PlacementDirection::ALL {
            for row in 0..self.size {
                for col in 0..self.size {
                    let start = GridPosition::new(row, col);
                    if self.fits(word, start, direction) {
                        candidates.push(Self::placement(word, start, direction));
                    }
                }
            }
        }
        candidates.shuffle(rng);
        candidates.pop()
    }

    fn fits(&self, word: &str, start: GridPosition, direction: PlacementDirection) -> bool {
        let (row_step, col_step) = direction.step();
        let last = word.len() - 1;
        if start.row + last * row_step >= self.size || start.col + last * col_step >= self.size {
            return false;
        }

        word.chars().enumerate().all(|(offset, letter)| {
            let cell = self.grid[start.row + offset * row_step][start.col + offset * col_step];
            cell == BLANK || cell == letter
        })
    }

    fn place(&mut self, placement: &WordPlacement) {
        for (cell, letter) in placement.cells().into_iter().zip(placement.word.chars()) {
            self.grid[cell.row][cell.col] = letter;
        }
    }

    fn placement(word: &str, start: GridPosition, direction: PlacementDirection) -> WordPlacement {
        WordPlacement {
            word: word.to_string(),
            start,
            direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn spelled(search: &WordSearch, placement: &WordPlacement) -> String {
        placement
            .cells()
            .into_iter()
            .map(|cell| search.grid[cell.row][cell.col])
            .collect()
    }

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("iOS"), "IOS");
        assert_eq!(normalize_word(" x-code "), "XCODE");
    }

    #[test]
    fn test_every_listed_word_is_spelled_in_grid() {
        let mut rng = StdRng::seed_from_u64(7);
        let words = ["SWIFT", "CODE", "APP", "iOS", "MAC"];

        for _ in 0..50 {
            let search = GridBuilder::new(10).build(&words, &mut rng);
            assert_eq!(search.words_to_find.len(), search.placements.len());
            for placement in &search.placements {
                assert_eq!(spelled(&search, placement), placement.word);
            }
        }
    }

    #[test]
    fn test_grid_is_square_and_uppercase() {
        let mut rng = StdRng::seed_from_u64(11);
        let search = GridBuilder::new(12).build(&["DEVELOPER", "XCODE"], &mut rng);

        assert_eq!(search.grid.len(), 12);
        for row in &search.grid {
            assert_eq!(row.len(), 12);
            assert!(row.iter().all(|ch| ch.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_word_longer_than_grid_is_dropped() {
        let mut rng = StdRng::seed_from_u64(3);
        let search = GridBuilder::new(4).build(&["TOOLONG", "CAT"], &mut rng);
        assert_eq!(search.words_to_find, vec!["CAT".to_string()]);
    }

    #[test]
    fn test_crowded_grid_uses_full_scan() {
        let mut rng = StdRng::seed_from_u64(5);
        // Two four-letter words in a 4x4 grid with a single random try each
        let search = GridBuilder::with_attempts(4, 1).build(&["ABCD", "EFGH"], &mut rng);
        assert_eq!(search.words_to_find.len(), 2);
    }

    #[test]
    fn test_mark_found() {
        let grid = vec![
            vec!['C', 'A', 'T'],
            vec!['D', 'O', 'G'],
            vec!['X', 'Y', 'Z'],
        ];
        let mut search = WordSearch::new(grid, &["cat", "dog"]);

        assert_eq!(search.mark_found("BIRD"), Err(IgnoreReason::UnknownWord));
        assert_eq!(search.mark_found("cat"), Ok(()));
        assert_eq!(search.mark_found("CAT"), Err(IgnoreReason::WordAlreadyFound));
        assert!(!search.is_solved());
        assert_eq!(search.progress(), 0.5);
        assert_eq!(search.mark_found("DOG"), Ok(()));
        assert!(search.is_solved());
    }

    #[test]
    fn test_selection_reading() {
        let grid = vec![
            vec!['C', 'A', 'T'],
            vec!['D', 'O', 'G'],
            vec!['X', 'Y', 'Z'],
        ];
        let search = WordSearch::new(grid, &["CAT", "TAC", "COZ"]);

        assert_eq!(
            search.read_selection(GridPosition::new(0, 0), GridPosition::new(2, 2)),
            Some("COZ".to_string())
        );
        assert_eq!(
            search.word_for_selection(GridPosition::new(1, 2), GridPosition::new(1, 0)),
            None
        );
        assert_eq!(
            search.word_for_selection(GridPosition::new(0, 2), GridPosition::new(0, 0)),
            Some("CAT")
        );
        assert_eq!(
            search.read_selection(GridPosition::new(0, 0), GridPosition::new(1, 2)),
            None
        );
        assert!(search.placement_of("coz").is_some());
    }
}

use game_types::{IgnoreReason, PatternColor, PatternId, PatternItem, PatternShape, PatternSize};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

pub fn random_pattern<R: Rng + ?Sized>(rng: &mut R) -> PatternItem {
    PatternItem {
        id: Uuid::new_v4(),
        shape: PatternShape::ALL[rng.gen_range(0..PatternShape::ALL.len())],
        color: PatternColor::ALL[rng.gen_range(0..PatternColor::ALL.len())],
        size: PatternSize::ALL[rng.gen_range(0..PatternSize::ALL.len())],
    }
}

/// Pattern-matching state. Options are the patterns in another order and the
/// correct option for a pattern is the one carrying the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatching {
    pub patterns: Vec<PatternItem>,
    pub options: Vec<PatternItem>,
    pub correct_matches: HashMap<PatternId, PatternId>,
    pub matches: HashMap<PatternId, PatternId>,
    /// Patterns that have already earned their match points.
    #[serde(default)]
    pub scored_patterns: BTreeSet<PatternId>,
}

impl PatternMatching {
    pub fn new(patterns: Vec<PatternItem>, options: Vec<PatternItem>) -> Self {
        let correct_matches = patterns.iter().map(|item| (item.id, item.id)).collect();
        Self {
            patterns,
            options,
            correct_matches,
            matches: HashMap::new(),
            scored_patterns: BTreeSet::new(),
        }
    }

    pub fn generate<R: Rng + ?Sized>(pair_count: usize, rng: &mut R) -> Self {
        let patterns: Vec<PatternItem> = (0..pair_count).map(|_| random_pattern(rng)).collect();
        let mut options = patterns.clone();
        options.shuffle(rng);
        Self::new(patterns, options)
    }

    pub fn has_pattern(&self, pattern_id: PatternId) -> bool {
        self.correct_matches.contains_key(&pattern_id)
    }

    pub fn has_option(&self, option_id: PatternId) -> bool {
        self.options.iter().any(|option| option.id == option_id)
    }

    /// Pattern currently paired with `option_id`, if any.
    pub fn pattern_using(&self, option_id: PatternId) -> Option<PatternId> {
        self.matches
            .iter()
            .find(|(_, option)| **option == option_id)
            .map(|(pattern, _)| *pattern)
    }

    pub fn all_matched(&self) -> bool {
        self.patterns
            .iter()
            .all(|pattern| self.matches.contains_key(&pattern.id))
    }

    pub fn all_correct(&self) -> bool {
        self.patterns
            .iter()
            .all(|pattern| self.matches.get(&pattern.id) == self.correct_matches.get(&pattern.id))
    }

    pub fn is_solved(&self) -> bool {
        !self.patterns.is_empty() && self.all_matched() && self.all_correct()
    }

    pub fn progress(&self) -> f64 {
        if self.patterns.is_empty() {
            return 0.0;
        }
        self.matches.len() as f64 / self.patterns.len() as f64
    }

    /// Pair a pattern with an option, replacing the pattern's earlier pairing.
    /// An option held by another pattern moves over and leaves that pattern
    /// unpaired. Returns `true` when this is the first correct pairing for the
    /// pattern.
    pub(crate) fn make_match(
        &mut self,
        pattern_id: PatternId,
        option_id: PatternId,
    ) -> Result<bool, IgnoreReason> {
        let Some(correct) = self.correct_matches.get(&pattern_id).copied() else {
            return Err(IgnoreReason::UnknownPattern);
        };
        if !self.has_option(option_id) {
            return Err(IgnoreReason::UnknownOption);
        }
        if let Some(owner) = self
            .pattern_using(option_id)
            .filter(|owner| *owner != pattern_id)
        {
            self.matches.remove(&owner);
        }

        self.matches.insert(pattern_id, option_id);
        Ok(option_id == correct && self.scored_patterns.insert(pattern_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_options_are_permutation_of_patterns() {
        let mut rng = StdRng::seed_from_u64(9);
        for pairs in [4, 6, 8, 10] {
            let puzzle = PatternMatching::generate(pairs, &mut rng);
            assert_eq!(puzzle.patterns.len(), pairs);

            let mut pattern_ids: Vec<PatternId> = puzzle.patterns.iter().map(|p| p.id).collect();
            let mut option_ids: Vec<PatternId> = puzzle.options.iter().map(|o| o.id).collect();
            pattern_ids.sort();
            option_ids.sort();
            assert_eq!(pattern_ids, option_ids);

            assert_eq!(puzzle.correct_matches.len(), pairs);
            assert!(puzzle.correct_matches.iter().all(|(pattern, option)| pattern == option));
        }
    }

    #[test]
    fn test_make_match_rules() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut puzzle = PatternMatching::generate(2, &mut rng);
        let first = puzzle.patterns[0].id;
        let second = puzzle.patterns[1].id;

        assert_eq!(
            puzzle.make_match(Uuid::new_v4(), first),
            Err(IgnoreReason::UnknownPattern)
        );
        assert_eq!(
            puzzle.make_match(first, Uuid::new_v4()),
            Err(IgnoreReason::UnknownOption)
        );

        assert_eq!(puzzle.make_match(first, second), Ok(false));
        assert_eq!(puzzle.make_match(first, first), Ok(true));
        assert_eq!(puzzle.make_match(first, first), Ok(false));
        assert!(!puzzle.is_solved());

        assert_eq!(puzzle.make_match(second, second), Ok(true));
        assert!(puzzle.is_solved());
        assert_eq!(puzzle.progress(), 1.0);
    }

    #[test]
    fn test_wrong_pairings_do_not_solve() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut puzzle = PatternMatching::generate(2, &mut rng);
        let first = puzzle.patterns[0].id;
        let second = puzzle.patterns[1].id;

        puzzle.make_match(first, second).unwrap();
        puzzle.make_match(second, first).unwrap();
        assert!(puzzle.all_matched());
        assert!(!puzzle.all_correct());
        assert!(!puzzle.is_solved());
    }

    #[test]
    fn test_taken_option_moves_to_new_pattern() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut puzzle = PatternMatching::generate(2, &mut rng);
        let first = puzzle.patterns[0].id;
        let second = puzzle.patterns[1].id;

        puzzle.make_match(first, second).unwrap();
        puzzle.make_match(second, first).unwrap();

        assert_eq!(puzzle.make_match(first, first), Ok(true));
        assert_eq!(puzzle.pattern_using(first), Some(first));
        assert!(!puzzle.matches.contains_key(&second));
        assert_eq!(puzzle.progress(), 0.5);

        assert_eq!(puzzle.make_match(second, second), Ok(true));
        assert!(puzzle.is_solved());
    }
}

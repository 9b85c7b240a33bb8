use game_types::IgnoreReason;
use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The four number-sequence families a puzzle can be drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceFamily {
    Arithmetic { start: i64, difference: i64 },
    Geometric { start: i64, ratio: i64 },
    Fibonacci,
    Squares,
}

impl SequenceFamily {
    /// Pick a family uniformly, then its parameters: arithmetic start 1–10 with
    /// difference 2–5, geometric start 2–5 with ratio 2.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.gen_range(0..4) {
            0 => SequenceFamily::Arithmetic {
                start: rng.gen_range(1..=10),
                difference: rng.gen_range(2..=5),
            },
            1 => SequenceFamily::Geometric {
                start: rng.gen_range(2..=5),
                ratio: 2,
            },
            2 => SequenceFamily::Fibonacci,
            _ => SequenceFamily::Squares,
        }
    }

    pub fn terms(&self, length: usize) -> Vec<i64> {
        match *self {
            SequenceFamily::Arithmetic { start, difference } => (0..length)
                .map(|i| start.saturating_add(difference.saturating_mul(i as i64)))
                .collect(),
            SequenceFamily::Geometric { start, ratio } => {
                let mut terms = Vec::with_capacity(length);
                let mut current = start;
                for _ in 0..length {
                    terms.push(current);
                    current = current.saturating_mul(ratio);
                }
                terms
            }
            SequenceFamily::Fibonacci => {
                let mut terms: Vec<i64> = Vec::with_capacity(length);
                for i in 0..length {
                    let next = if i < 2 {
                        1
                    } else {
                        terms[i - 1].saturating_add(terms[i - 2])
                    };
                    terms.push(next);
                }
                terms
            }
            SequenceFamily::Squares => (1..=length as i64).map(|n| n.saturating_mul(n)).collect(),
        }
    }

    pub fn hint(&self) -> String {
        match self {
            SequenceFamily::Arithmetic { difference, .. } => {
                format!("Each number increases by {}", difference)
            }
            SequenceFamily::Geometric { ratio, .. } => {
                format!("Each number is multiplied by {}", ratio)
            }
            SequenceFamily::Fibonacci => {
                "Each number is the sum of the two previous numbers".to_string()
            }
            SequenceFamily::Squares => "Each number is a perfect square".to_string(),
        }
    }
}

/// Number-sequence state. Only hidden indices ever appear as answer keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberSequence {
    pub sequence: Vec<i64>,
    /// Distinct, ascending.
    pub missing_indices: Vec<usize>,
    pub correct_answers: BTreeMap<usize, i64>,
    pub user_answers: BTreeMap<usize, i64>,
    pub hint: String,
    /// Hidden indices that have already earned their answer points.
    #[serde(default)]
    pub scored_indices: BTreeSet<usize>,
}

impl NumberSequence {
    /// Build from a full sequence and the indices to hide. Out-of-range and
    /// duplicate indices are discarded.
    pub fn new(sequence: Vec<i64>, hidden: &[usize], hint: impl Into<String>) -> Self {
        let missing: BTreeSet<usize> = hidden
            .iter()
            .copied()
            .filter(|index| *index < sequence.len())
            .collect();
        let correct_answers = missing.iter().map(|index| (*index, sequence[*index])).collect();

        Self {
            sequence,
            missing_indices: missing.into_iter().collect(),
            correct_answers,
            user_answers: BTreeMap::new(),
            hint: hint.into(),
            scored_indices: BTreeSet::new(),
        }
    }

    /// Draw a family, produce `length` terms and hide `missing_count` distinct
    /// positions chosen without replacement.
    pub fn generate<R: Rng + ?Sized>(length: usize, missing_count: usize, rng: &mut R) -> Self {
        let family = SequenceFamily::random(rng);
        let sequence = family.terms(length);
        let hidden = index::sample(rng, length, missing_count.min(length)).into_vec();
        Self::new(sequence, &hidden, family.hint())
    }

    pub fn is_hidden(&self, index: usize) -> bool {
        self.correct_answers.contains_key(&index)
    }

    /// The sequence as shown to the player: hidden positions are `None`.
    pub fn visible_terms(&self) -> Vec<Option<i64>> {
        self.sequence
            .iter()
            .enumerate()
            .map(|(index, value)| (!self.is_hidden(index)).then_some(*value))
            .collect()
    }

    pub fn all_answered(&self) -> bool {
        self.missing_indices
            .iter()
            .all(|index| self.user_answers.contains_key(index))
    }

    pub fn all_correct(&self) -> bool {
        self.missing_indices
            .iter()
            .all(|index| self.user_answers.get(index) == self.correct_answers.get(index))
    }

    pub fn is_solved(&self) -> bool {
        !self.missing_indices.is_empty() && self.all_answered() && self.all_correct()
    }

    pub fn progress(&self) -> f64 {
        if self.missing_indices.is_empty() {
            return 0.0;
        }
        self.user_answers.len() as f64 / self.missing_indices.len() as f64
    }

    /// Record an answer, overwriting any earlier one. Returns `true` when this
    /// is the first correct answer for that index.
    pub(crate) fn submit(&mut self, index: usize, value: i64) -> Result<bool, IgnoreReason> {
        let Some(correct) = self.correct_answers.get(&index).copied() else {
            return Err(IgnoreReason::IndexNotHidden);
        };

        self.user_answers.insert(index, value);
        Ok(value == correct && self.scored_indices.insert(index))
    }
}

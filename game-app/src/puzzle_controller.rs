use anyhow::Result;
use chrono::{DateTime, Utc};
use game_core::{
    AchievementEvaluator, Clock, GameEvent, GameEventBus, GameEventHandler, GameStore, Puzzle,
    PuzzleGenerator, PuzzleKind,
};
use game_types::{
    GameError, GameType, GridPosition, IgnoreReason, MoveOutcome, PatternId, PuzzleDifficulty,
    PuzzleType, ScoreDetails, ScoreEntry, SessionStatus,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ControllerSettings;
use crate::summary::{Evaluation, GameSummary, PlayerHistory};

struct ActivePuzzle {
    puzzle: Puzzle,
    pending_pattern: Option<PatternId>,
    pending_option: Option<PatternId>,
    evaluation: Option<Evaluation>,
    summary: Option<GameSummary>,
}

/// Result of one move, with the summary when the move solved the puzzle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PuzzleMove {
    pub outcome: MoveOutcome,
    pub summary: Option<GameSummary>,
}

impl PuzzleMove {
    fn ignored(reason: IgnoreReason) -> Self {
        Self {
            outcome: MoveOutcome::ignored(reason),
            summary: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PuzzleSnapshot {
    pub puzzle: Puzzle,
    pub status: SessionStatus,
    pub progress: f64,
    pub elapsed_secs: f64,
    pub remaining_secs: f64,
    pub hint: String,
    pub pending_pattern: Option<PatternId>,
    pub pending_option: Option<PatternId>,
}

impl PuzzleSnapshot {
    fn capture(active: &ActivePuzzle, now: DateTime<Utc>) -> Self {
        let puzzle = &active.puzzle;
        Self {
            status: puzzle.status(),
            progress: puzzle.progress(),
            elapsed_secs: puzzle.elapsed_secs(now),
            remaining_secs: puzzle.remaining_secs(now),
            hint: puzzle.hint().to_string(),
            pending_pattern: active.pending_pattern,
            pending_option: active.pending_option,
            puzzle: puzzle.clone(),
        }
    }
}

/// Which half of a pattern pairing a selection supplies.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Selection {
    Pattern(PatternId),
    Choice(PatternId),
}

/// Owns the single active puzzle and records it when it finishes.
pub struct PuzzleController {
    settings: ControllerSettings,
    generator: PuzzleGenerator,
    store: Arc<dyn GameStore>,
    clock: Arc<dyn Clock>,
    evaluator: AchievementEvaluator,
    events: Mutex<GameEventBus>,
    active: Mutex<Option<ActivePuzzle>>,
}

impl PuzzleController {
    pub fn new(
        settings: ControllerSettings,
        generator: PuzzleGenerator,
        store: Arc<dyn GameStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            settings,
            generator,
            evaluator: AchievementEvaluator::new(store.clone()),
            store,
            clock,
            events: Mutex::new(GameEventBus::new()),
            active: Mutex::new(None),
        }
    }

    pub async fn add_event_handler(&self, handler: Box<dyn GameEventHandler>) {
        self.events.lock().await.add_handler(handler);
    }

    pub async fn has_active_puzzle(&self) -> bool {
        self.active.lock().await.is_some()
    }

    pub async fn start_puzzle(
        &self,
        puzzle_type: PuzzleType,
        difficulty: PuzzleDifficulty,
    ) -> PuzzleSnapshot {
        let puzzle = self.generator.generate(puzzle_type, difficulty);
        self.begin(puzzle).await
    }

    pub async fn start_random_puzzle(&self, difficulty: PuzzleDifficulty) -> PuzzleSnapshot {
        let puzzle = self.generator.generate_random(difficulty);
        self.begin(puzzle).await
    }

    /// Play a puzzle built elsewhere, e.g. one from a generated set.
    pub async fn start_with(&self, puzzle: Puzzle) -> PuzzleSnapshot {
        self.begin(puzzle).await
    }

    pub async fn mark_word_found(&self, word: &str) -> Result<PuzzleMove> {
        let mut active = self.active.lock().await;
        let current = active.as_mut().ok_or(GameError::NoActiveSession)?;
        let outcome = current.puzzle.mark_word_found(word, self.clock.now());
        self.apply(current, outcome).await
    }

    /// Mark the word spelled by a straight selection of grid cells.
    pub async fn select_cells(&self, from: GridPosition, to: GridPosition) -> Result<PuzzleMove> {
        let mut active = self.active.lock().await;
        let current = active.as_mut().ok_or(GameError::NoActiveSession)?;

        let word = match &current.puzzle.kind {
            PuzzleKind::WordSearch(search) => search.word_for_selection(from, to).map(str::to_string),
            _ => return Ok(PuzzleMove::ignored(IgnoreReason::WrongPuzzleType)),
        };
        let Some(word) = word else {
            return Ok(PuzzleMove::ignored(IgnoreReason::UnknownWord));
        };

        let outcome = current.puzzle.mark_word_found(&word, self.clock.now());
        self.apply(current, outcome).await
    }

    pub async fn submit_sequence_answer(&self, index: usize, value: i64) -> Result<PuzzleMove> {
        let mut active = self.active.lock().await;
        let current = active.as_mut().ok_or(GameError::NoActiveSession)?;
        let outcome = current
            .puzzle
            .submit_sequence_answer(index, value, self.clock.now());
        self.apply(current, outcome).await
    }

    /// Select a pattern. Returns `None` while waiting for an option to pair it with.
    pub async fn select_pattern(&self, pattern_id: PatternId) -> Result<Option<PuzzleMove>> {
        self.select(Selection::Pattern(pattern_id)).await
    }

    /// Select an option. Returns `None` while waiting for a pattern to pair it with.
    pub async fn select_option(&self, option_id: PatternId) -> Result<Option<PuzzleMove>> {
        self.select(Selection::Choice(option_id)).await
    }

    /// Finish now and record the result. A puzzle finished before it is solved
    /// is recorded as attempted, not completed.
    pub async fn finish_puzzle(&self) -> Result<GameSummary> {
        let mut active = self.active.lock().await;
        let current = active.as_mut().ok_or(GameError::NoActiveSession)?;
        self.record(current).await
    }

    /// Drop the active puzzle without recording it.
    pub async fn exit_puzzle(&self) -> Result<()> {
        let current = self
            .active
            .lock()
            .await
            .take()
            .ok_or(GameError::NoActiveSession)?;
        self.abandon(current).await;
        Ok(())
    }

    pub async fn elapsed(&self) -> Result<f64> {
        let active = self.active.lock().await;
        let current = active.as_ref().ok_or(GameError::NoActiveSession)?;
        Ok(current.puzzle.elapsed_secs(self.clock.now()))
    }

    /// Seconds left of the estimated time, floored at zero.
    pub async fn remaining(&self) -> Result<f64> {
        let active = self.active.lock().await;
        let current = active.as_ref().ok_or(GameError::NoActiveSession)?;
        Ok(current.puzzle.remaining_secs(self.clock.now()))
    }

    pub async fn progress(&self) -> Result<f64> {
        let active = self.active.lock().await;
        let current = active.as_ref().ok_or(GameError::NoActiveSession)?;
        Ok(current.puzzle.progress())
    }

    pub async fn hint(&self) -> Result<String> {
        let active = self.active.lock().await;
        let current = active.as_ref().ok_or(GameError::NoActiveSession)?;
        Ok(current.puzzle.hint().to_string())
    }

    pub async fn snapshot(&self) -> Result<PuzzleSnapshot> {
        let active = self.active.lock().await;
        let current = active.as_ref().ok_or(GameError::NoActiveSession)?;
        Ok(PuzzleSnapshot::capture(current, self.clock.now()))
    }

    async fn begin(&self, mut puzzle: Puzzle) -> PuzzleSnapshot {
        let now = self.clock.now();
        puzzle.start(now);
        let started = GameEvent::PuzzleStarted {
            session_id: puzzle.id,
            puzzle_type: puzzle.puzzle_type(),
            difficulty: puzzle.difficulty,
        };

        let current = ActivePuzzle {
            puzzle,
            pending_pattern: None,
            pending_option: None,
            evaluation: None,
            summary: None,
        };
        let snapshot = PuzzleSnapshot::capture(&current, now);

        let previous = self.active.lock().await.replace(current);
        if let Some(previous) = previous {
            self.abandon(previous).await;
        }
        self.publish(started).await;
        snapshot
    }

    async fn select(&self, selection: Selection) -> Result<Option<PuzzleMove>> {
        let mut active = self.active.lock().await;
        let current = active.as_mut().ok_or(GameError::NoActiveSession)?;

        if current.puzzle.is_completed {
            return Ok(Some(PuzzleMove::ignored(IgnoreReason::SessionCompleted)));
        }
        let PuzzleKind::PatternMatching(matching) = &current.puzzle.kind else {
            return Ok(Some(PuzzleMove::ignored(IgnoreReason::WrongPuzzleType)));
        };

        match selection {
            Selection::Pattern(pattern_id) => {
                if !matching.has_pattern(pattern_id) {
                    return Ok(Some(PuzzleMove::ignored(IgnoreReason::UnknownPattern)));
                }
                current.pending_pattern = Some(pattern_id);
            }
            Selection::Choice(option_id) => {
                if !matching.has_option(option_id) {
                    return Ok(Some(PuzzleMove::ignored(IgnoreReason::UnknownOption)));
                }
                current.pending_option = Some(option_id);
            }
        }

        let (Some(pattern_id), Some(option_id)) = (current.pending_pattern, current.pending_option)
        else {
            debug!("Holding selection {:?} until its pair is chosen", selection);
            return Ok(None);
        };

        current.pending_pattern = None;
        current.pending_option = None;
        let outcome = current
            .puzzle
            .make_match(pattern_id, option_id, self.clock.now());
        self.apply(current, outcome).await.map(Some)
    }

    async fn apply(&self, current: &mut ActivePuzzle, outcome: MoveOutcome) -> Result<PuzzleMove> {
        self.publish(GameEvent::MoveApplied {
            session_id: current.puzzle.id,
            outcome,
        })
        .await;

        let summary = if outcome.completed() {
            Some(self.record(current).await?)
        } else {
            None
        };
        Ok(PuzzleMove { outcome, summary })
    }

    async fn record(&self, current: &mut ActivePuzzle) -> Result<GameSummary> {
        if let Some(summary) = &current.summary {
            return Ok(summary.clone());
        }

        let now = self.clock.now();
        let puzzle = &current.puzzle;
        let player_name = self.settings.player_name.as_str();

        let evaluation = match current.evaluation.take() {
            Some(evaluation) => evaluation,
            None => {
                let history = PlayerHistory::load(self.store.as_ref(), player_name, now).await?;
                let unlocked = self
                    .evaluator
                    .evaluate_puzzle(puzzle, &history.statistics, player_name, now)
                    .await?;
                Evaluation { history, unlocked }
            }
        };

        let entry = ScoreEntry {
            id: Uuid::new_v4(),
            player_name: player_name.to_string(),
            score: puzzle.score,
            game_type: GameType::Puzzle,
            difficulty: puzzle.difficulty.as_str().to_string(),
            date: now,
            time_spent_secs: puzzle.elapsed_secs(now),
            achievements: evaluation.unlocked.clone(),
            details: Some(ScoreDetails::Puzzle {
                puzzle_type: puzzle.puzzle_type(),
                completed: puzzle.is_completed,
            }),
        };
        if let Err(err) = self.store.save_score(&entry).await {
            let err = err.context(format!("Failed to record puzzle {}", puzzle.id));
            current.evaluation = Some(evaluation);
            return Err(err);
        }

        let Evaluation { history, unlocked } = evaluation;
        let summary = GameSummary::new(entry, unlocked, &history);
        current.summary = Some(summary.clone());
        info!(
            "Recorded {} for {}: {} points (solved: {})",
            puzzle.title, player_name, summary.entry.score, puzzle.is_completed
        );

        for achievement in &summary.unlocked {
            self.publish(GameEvent::AchievementUnlocked {
                session_id: puzzle.id,
                player_name: player_name.to_string(),
                achievement: achievement.clone(),
            })
            .await;
        }
        self.publish(GameEvent::PuzzleCompleted {
            session_id: puzzle.id,
            entry: summary.entry.clone(),
        })
        .await;

        Ok(summary)
    }

    async fn abandon(&self, current: ActivePuzzle) {
        if current.summary.is_some() {
            return;
        }
        debug!("Abandoning puzzle {}", current.puzzle.id);
        self.publish(GameEvent::SessionAbandoned {
            session_id: current.puzzle.id,
        })
        .await;
    }

    async fn publish(&self, event: GameEvent) {
        self.events.lock().await.publish(event);
    }
}

use anyhow::Result;
use chrono::{DateTime, Utc};
use game_core::{
    AchievementEvaluator, Clock, GameEvent, GameEventBus, GameEventHandler, GameStore,
    QuizGenerator, QuizSession,
};
use game_types::{
    GameError, GameType, IgnoreReason, MoveOutcome, QuizCategory, QuizDifficulty, QuizQuestion, ScoreDetails,
    ScoreEntry, SessionStatus,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ControllerSettings;
use crate::summary::{Evaluation, GameSummary, PlayerHistory};

/// How the active quiz was requested, so it can be restarted with fresh questions.
#[derive(Debug, Clone, Copy, PartialEq)]
enum QuizRequest {
    Filtered {
        category: Option<QuizCategory>,
        difficulty: Option<QuizDifficulty>,
        count: usize,
        time_limit_secs: Option<u32>,
    },
    Adaptive {
        player_level: u32,
        count: usize,
    },
}

struct ActiveQuiz {
    session: QuizSession,
    request: QuizRequest,
    /// Held between evaluating achievements and saving the score entry.
    evaluation: Option<Evaluation>,
    /// Set once the finished quiz has been recorded.
    summary: Option<GameSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizSnapshot {
    pub session_id: Uuid,
    pub question_index: usize,
    pub question_count: usize,
    pub current_question: Option<QuizQuestion>,
    pub selected_answer: Option<usize>,
    pub score: i32,
    pub progress: f64,
    pub status: SessionStatus,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub elapsed_secs: f64,
    pub remaining_secs: Option<f64>,
}

impl QuizSnapshot {
    fn capture(session: &QuizSession, now: DateTime<Utc>) -> Self {
        Self {
            session_id: session.id,
            question_index: session.current_question_index,
            question_count: session.question_count(),
            current_question: session.current_question().cloned(),
            selected_answer: session.answer_for(session.current_question_index),
            score: session.score,
            progress: session.progress(),
            status: session.status(),
            can_go_previous: session.can_go_previous(),
            can_go_next: session.can_go_next(),
            elapsed_secs: session.elapsed_secs(now),
            remaining_secs: session.remaining_secs(now),
        }
    }
}

/// Owns the single active quiz session and records it when it finishes.
pub struct QuizController {
    settings: ControllerSettings,
    generator: QuizGenerator,
    store: Arc<dyn GameStore>,
    clock: Arc<dyn Clock>,
    evaluator: AchievementEvaluator,
    events: Mutex<GameEventBus>,
    active: Mutex<Option<ActiveQuiz>>,
}

impl QuizController {
    pub fn new(
        settings: ControllerSettings,
        generator: QuizGenerator,
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

    pub fn player_name(&self) -> &str {
        &self.settings.player_name
    }

    pub async fn add_event_handler(&self, handler: Box<dyn GameEventHandler>) {
        self.events.lock().await.add_handler(handler);
    }

    pub async fn has_active_quiz(&self) -> bool {
        self.active.lock().await.is_some()
    }

    pub async fn start_quiz(
        &self,
        category: Option<QuizCategory>,
        difficulty: Option<QuizDifficulty>,
        count: usize,
        time_limit_secs: Option<u32>,
    ) -> QuizSnapshot {
        self.begin(QuizRequest::Filtered {
            category,
            difficulty,
            count,
            time_limit_secs,
        })
        .await
    }

    /// Mixed quiz sized and timed from the controller settings.
    pub async fn start_default_quiz(&self) -> QuizSnapshot {
        self.start_quiz(
            None,
            None,
            self.settings.quiz_question_count,
            self.settings.quiz_time_limit_secs,
        )
        .await
    }

    pub async fn start_adaptive_quiz(&self, player_level: u32, count: usize) -> QuizSnapshot {
        self.begin(QuizRequest::Adaptive {
            player_level,
            count,
        })
        .await
    }

    pub async fn submit_answer(&self, answer_index: usize) -> Result<MoveOutcome> {
        let mut active = self.active.lock().await;
        let quiz = active.as_mut().ok_or(GameError::NoActiveSession)?;
        if self.expire(quiz).await?.is_some() {
            return Ok(MoveOutcome::ignored(IgnoreReason::SessionCompleted));
        }

        let question_index = quiz.session.current_question_index;
        let outcome = quiz.session.submit_answer(answer_index);
        let session_id = quiz.session.id;
        drop(active);

        self.publish(GameEvent::AnswerSubmitted {
            session_id,
            question_index,
            outcome,
        })
        .await;
        Ok(outcome)
    }

    /// Advance one question. Returns the summary when this move finished the quiz.
    pub async fn next_question(&self) -> Result<Option<GameSummary>> {
        let mut active = self.active.lock().await;
        let quiz = active.as_mut().ok_or(GameError::NoActiveSession)?;
        if quiz.summary.is_some() {
            return Ok(None);
        }
        if let Some(summary) = self.expire(quiz).await? {
            return Ok(Some(summary));
        }

        match quiz.session.next_question(self.clock.now()) {
            SessionStatus::Active => Ok(None),
            SessionStatus::Completed => self.record(quiz).await.map(Some),
        }
    }

    pub async fn previous_question(&self) -> Result<QuizSnapshot> {
        let mut active = self.active.lock().await;
        let quiz = active.as_mut().ok_or(GameError::NoActiveSession)?;
        self.expire(quiz).await?;
        quiz.session.previous_question();
        Ok(QuizSnapshot::capture(&quiz.session, self.clock.now()))
    }

    /// Finish now and record the result. Finishing twice returns the first summary.
    pub async fn finish_quiz(&self) -> Result<GameSummary> {
        let mut active = self.active.lock().await;
        let quiz = active.as_mut().ok_or(GameError::NoActiveSession)?;
        self.record(quiz).await
    }

    /// Finish the quiz if its time limit has run out.
    pub async fn enforce_time_limit(&self) -> Result<Option<GameSummary>> {
        let mut active = self.active.lock().await;
        let quiz = active.as_mut().ok_or(GameError::NoActiveSession)?;
        self.expire(quiz).await
    }

    /// Replace the active quiz with a new one built from the same request.
    pub async fn restart_quiz(&self) -> Result<QuizSnapshot> {
        let request = self
            .active
            .lock()
            .await
            .as_ref()
            .map(|quiz| quiz.request)
            .ok_or(GameError::NoActiveSession)?;
        Ok(self.begin(request).await)
    }

    /// Drop the active quiz without recording it.
    pub async fn exit_quiz(&self) -> Result<()> {
        let quiz = self
            .active
            .lock()
            .await
            .take()
            .ok_or(GameError::NoActiveSession)?;
        self.abandon(quiz).await;
        Ok(())
    }

    pub async fn elapsed(&self) -> Result<f64> {
        let active = self.active.lock().await;
        let quiz = active.as_ref().ok_or(GameError::NoActiveSession)?;
        Ok(quiz.session.elapsed_secs(self.clock.now()))
    }

    /// Seconds left on the time limit, `None` for an untimed quiz.
    pub async fn remaining(&self) -> Result<Option<f64>> {
        let active = self.active.lock().await;
        let quiz = active.as_ref().ok_or(GameError::NoActiveSession)?;
        Ok(quiz.session.remaining_secs(self.clock.now()))
    }

    pub async fn snapshot(&self) -> Result<QuizSnapshot> {
        let active = self.active.lock().await;
        let quiz = active.as_ref().ok_or(GameError::NoActiveSession)?;
        Ok(QuizSnapshot::capture(&quiz.session, self.clock.now()))
    }

    async fn begin(&self, request: QuizRequest) -> QuizSnapshot {
        let now = self.clock.now();
        let session = match request {
            QuizRequest::Filtered {
                category,
                difficulty,
                count,
                time_limit_secs,
            } => self
                .generator
                .generate(category, difficulty, count, now)
                .with_time_limit(time_limit_secs),
            QuizRequest::Adaptive {
                player_level,
                count,
            } => self.generator.generate_adaptive(player_level, count, now),
        };

        info!(
            "Starting quiz {} for {} with {} questions",
            session.id,
            self.settings.player_name,
            session.question_count()
        );
        let snapshot = QuizSnapshot::capture(&session, now);
        let started = GameEvent::QuizStarted {
            session_id: session.id,
            question_count: session.question_count(),
            time_limit_secs: session.time_limit_secs,
        };

        let previous = self.active.lock().await.replace(ActiveQuiz {
            session,
            request,
            evaluation: None,
            summary: None,
        });
        if let Some(previous) = previous {
            self.abandon(previous).await;
        }
        self.publish(started).await;
        snapshot
    }

    /// Record the quiz, ended at its deadline, once the time limit has run out.
    async fn expire(&self, quiz: &mut ActiveQuiz) -> Result<Option<GameSummary>> {
        if quiz.summary.is_some() || !quiz.session.is_time_expired(self.clock.now()) {
            return Ok(None);
        }

        info!("Quiz {} ran out of time", quiz.session.id);
        self.record(quiz).await.map(Some)
    }

    async fn record(&self, quiz: &mut ActiveQuiz) -> Result<GameSummary> {
        if let Some(summary) = &quiz.summary {
            return Ok(summary.clone());
        }

        let now = self.clock.now();
        quiz.session.finish(now);
        let session = &quiz.session;
        let ended_at = session.ended_at.unwrap_or(now);
        let player_name = self.settings.player_name.as_str();

        let evaluation = match quiz.evaluation.take() {
            Some(evaluation) => evaluation,
            None => {
                let history = PlayerHistory::load(self.store.as_ref(), player_name, now).await?;
                let unlocked = self
                    .evaluator
                    .evaluate_quiz(session, &history.statistics, player_name, ended_at)
                    .await?;
                Evaluation { history, unlocked }
            }
        };

        let entry = ScoreEntry {
            id: Uuid::new_v4(),
            player_name: player_name.to_string(),
            score: session.score,
            game_type: GameType::Quiz,
            difficulty: session.difficulty_label().as_str().to_string(),
            date: ended_at,
            time_spent_secs: session.elapsed_secs(now),
            achievements: evaluation.unlocked.clone(),
            details: Some(ScoreDetails::Quiz {
                category: session.category,
                questions_answered: u32::try_from(session.answered_count()).unwrap_or(u32::MAX),
                correct_answers: u32::try_from(session.correct_answer_count())
                    .unwrap_or(u32::MAX),
            }),
        };
        if let Err(err) = self.store.save_score(&entry).await {
            let err = err.context(format!("Failed to record quiz {}", session.id));
            quiz.evaluation = Some(evaluation);
            return Err(err);
        }

        let Evaluation { history, unlocked } = evaluation;
        let summary = GameSummary::new(entry, unlocked, &history);
        quiz.summary = Some(summary.clone());
        info!(
            "Recorded quiz {} for {}: {} points",
            session.id, player_name, summary.entry.score
        );

        for achievement in &summary.unlocked {
            self.publish(GameEvent::AchievementUnlocked {
                session_id: session.id,
                player_name: player_name.to_string(),
                achievement: achievement.clone(),
            })
            .await;
        }
        self.publish(GameEvent::QuizCompleted {
            session_id: session.id,
            entry: summary.entry.clone(),
        })
        .await;

        Ok(summary)
    }

    async fn abandon(&self, quiz: ActiveQuiz) {
        if quiz.summary.is_some() {
            return;
        }
        debug!("Abandoning quiz {}", quiz.session.id);
        self.publish(GameEvent::SessionAbandoned {
            session_id: quiz.session.id,
        })
        .await;
    }

    async fn publish(&self, event: GameEvent) {
        self.events.lock().await.publish(event);
    }
}

use game_types::{Achievement, MoveOutcome, PuzzleDifficulty, PuzzleId, PuzzleType, ScoreEntry};
use uuid::Uuid;

/// Identifies the quiz session or puzzle an event belongs to.
pub type SessionId = Uuid;

#[derive(Debug, Clone)]
pub enum GameEvent {
    QuizStarted {
        session_id: SessionId,
        question_count: usize,
        time_limit_secs: Option<u32>,
    },
    AnswerSubmitted {
        session_id: SessionId,
        question_index: usize,
        outcome: MoveOutcome,
    },
    QuizCompleted {
        session_id: SessionId,
        entry: ScoreEntry,
    },
    PuzzleStarted {
        session_id: PuzzleId,
        puzzle_type: PuzzleType,
        difficulty: PuzzleDifficulty,
    },
    MoveApplied {
        session_id: PuzzleId,
        outcome: MoveOutcome,
    },
    PuzzleCompleted {
        session_id: PuzzleId,
        entry: ScoreEntry,
    },
    AchievementUnlocked {
        session_id: SessionId,
        player_name: String,
        achievement: Achievement,
    },
    SessionAbandoned {
        session_id: SessionId,
    },
}

impl GameEvent {
    pub fn session_id(&self) -> SessionId {
        match self {
            GameEvent::QuizStarted { session_id, .. }
            | GameEvent::AnswerSubmitted { session_id, .. }
            | GameEvent::QuizCompleted { session_id, .. }
            | GameEvent::PuzzleStarted { session_id, .. }
            | GameEvent::MoveApplied { session_id, .. }
            | GameEvent::PuzzleCompleted { session_id, .. }
            | GameEvent::AchievementUnlocked { session_id, .. }
            | GameEvent::SessionAbandoned { session_id } => *session_id,
        }
    }
}

/// Event handler trait for observing session events
pub trait GameEventHandler: Send {
    fn handle_event(&mut self, event: GameEvent);
}

/// Simple event bus for distributing session events
pub struct GameEventBus {
    handlers: Vec<Box<dyn GameEventHandler>>,
}

impl GameEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn publish(&mut self, event: GameEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }
}

impl Default for GameEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingHandler {
        events: Arc<Mutex<Vec<GameEvent>>>,
    }

    impl GameEventHandler for RecordingHandler {
        fn handle_event(&mut self, event: GameEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_event_bus_delivers_to_every_handler() {
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));

        let mut bus = GameEventBus::new();
        bus.add_handler(Box::new(RecordingHandler {
            events: first.clone(),
        }));
        bus.add_handler(Box::new(RecordingHandler {
            events: second.clone(),
        }));
        assert_eq!(bus.handler_count(), 2);

        let session_id = Uuid::new_v4();
        bus.publish(GameEvent::QuizStarted {
            session_id,
            question_count: 10,
            time_limit_secs: None,
        });
        bus.publish(GameEvent::SessionAbandoned { session_id });

        for events in [first, second] {
            let events = events.lock().unwrap();
            assert_eq!(events.len(), 2);
            assert!(events.iter().all(|event| event.session_id() == session_id));
        }
    }
}

use chrono::{DateTime, Utc};
use game_types::{
    IgnoreReason, MoveOutcome, QuizCategory, QuizDifficulty, QuizQuestion, SessionStatus,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::{remaining_secs, seconds_between};
use crate::scoring::ScoringEngine;

/// One quiz attempt. The question list is fixed when the session is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSession {
    pub id: Uuid,
    pub questions: Vec<QuizQuestion>,
    pub current_question_index: usize,
    /// Question index to chosen option index.
    pub user_answers: BTreeMap<usize, usize>,
    pub score: i32,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub is_completed: bool,
    pub time_limit_secs: Option<u32>,
    /// Category filter the quiz was built with, if any.
    pub category: Option<QuizCategory>,
    #[serde(default)]
    pub scored_questions: BTreeSet<usize>,
}

impl QuizSession {
    pub fn new(questions: Vec<QuizQuestion>, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            questions,
            current_question_index: 0,
            user_answers: BTreeMap::new(),
            score: 0,
            started_at,
            ended_at: None,
            is_completed: false,
            time_limit_secs: None,
            category: None,
            scored_questions: BTreeSet::new(),
        }
    }

    pub fn with_time_limit(mut self, time_limit_secs: Option<u32>) -> Self {
        self.time_limit_secs = time_limit_secs;
        self
    }

    pub fn with_category(mut self, category: Option<QuizCategory>) -> Self {
        self.category = category;
        self
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_completed {
            SessionStatus::Completed
        } else {
            SessionStatus::Active
        }
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        if self.is_completed {
            return None;
        }
        self.questions.get(self.current_question_index)
    }

    /// Record an answer for the current question, replacing any earlier one.
    /// A question earns its points only the first time it is answered correctly.
    pub fn submit_answer(&mut self, answer_index: usize) -> MoveOutcome {
        if self.is_completed {
            return MoveOutcome::ignored(IgnoreReason::SessionCompleted);
        }
        let index = self.current_question_index;
        let Some(question) = self.questions.get(index) else {
            return MoveOutcome::ignored(IgnoreReason::NoCurrentQuestion);
        };
        if answer_index >= question.options.len() {
            return MoveOutcome::ignored(IgnoreReason::AnswerOutOfRange);
        }

        let correct = question.is_correct(answer_index);
        let difficulty = question.difficulty;
        self.user_answers.insert(index, answer_index);

        let points = if correct && self.scored_questions.insert(index) {
            ScoringEngine::quiz_answer_points(difficulty)
        } else {
            0
        };
        self.score += points;
        debug!(
            "Question {} answered with option {} (correct: {}, +{})",
            index, answer_index, correct, points
        );

        MoveOutcome::Accepted {
            points_awarded: points,
            completed: false,
        }
    }

    /// Advance one question; moving past the last question completes the session.
    pub fn next_question(&mut self, now: DateTime<Utc>) -> SessionStatus {
        if self.is_completed {
            return SessionStatus::Completed;
        }

        if self.current_question_index < self.questions.len() {
            self.current_question_index += 1;
        }
        if self.current_question_index >= self.questions.len() {
            self.finish(now);
        }
        self.status()
    }

    pub fn previous_question(&mut self) {
        if !self.is_completed && self.current_question_index > 0 {
            self.current_question_index -= 1;
        }
    }

    /// Complete the session now, whether or not every question was visited.
    /// A timed session never ends later than its deadline.
    pub fn finish(&mut self, now: DateTime<Utc>) {
        if self.is_completed {
            return;
        }
        self.current_question_index = self.questions.len();
        self.is_completed = true;
        self.ended_at = Some(self.deadline().map_or(now, |deadline| deadline.min(now)));
        info!(
            "Quiz {} completed: {} / {} correct, score {}",
            self.id,
            self.correct_answer_count(),
            self.questions.len(),
            self.score
        );
    }

    pub fn can_go_previous(&self) -> bool {
        !self.is_completed && self.current_question_index > 0
    }

    pub fn can_go_next(&self) -> bool {
        !self.is_completed && self.current_question_index < self.questions.len()
    }

    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        self.current_question_index as f64 / self.questions.len() as f64
    }

    pub fn answered_count(&self) -> usize {
        self.user_answers.len()
    }

    pub fn correct_answer_count(&self) -> usize {
        self.user_answers
            .iter()
            .filter(|(index, answer)| self.is_correct_answer(**index, **answer))
            .count()
    }

    /// Correct answers over answered questions, 0 when nothing was answered.
    pub fn accuracy(&self) -> f64 {
        if self.user_answers.is_empty() {
            return 0.0;
        }
        self.correct_answer_count() as f64 / self.user_answers.len() as f64
    }

    pub fn is_correct_answer(&self, question_index: usize, answer_index: usize) -> bool {
        self.questions
            .get(question_index)
            .is_some_and(|question| question.is_correct(answer_index))
    }

    pub fn answer_for(&self, question_index: usize) -> Option<usize> {
        self.user_answers.get(&question_index).copied()
    }

    /// Highest score reachable if every question is answered correctly.
    pub fn maximum_score(&self) -> i32 {
        ScoringEngine::quiz_maximum(self.questions.iter().map(|question| &question.difficulty))
    }

    /// Dominant difficulty of the question list.
    pub fn difficulty_label(&self) -> QuizDifficulty {
        let count = |difficulty: QuizDifficulty| {
            self.questions
                .iter()
                .filter(|question| question.difficulty == difficulty)
                .count()
        };
        let easy = count(QuizDifficulty::Easy);
        let medium = count(QuizDifficulty::Medium);
        let hard = count(QuizDifficulty::Hard);

        if hard > medium && hard > easy {
            QuizDifficulty::Hard
        } else if medium > easy {
            QuizDifficulty::Medium
        } else {
            QuizDifficulty::Easy
        }
    }

    /// Seconds since the start, frozen once the session ends.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> f64 {
        seconds_between(self.started_at, self.ended_at.unwrap_or(now))
    }

    /// Time left under the limit; `None` for untimed quizzes.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> Option<f64> {
        self.time_limit_secs
            .map(|limit| remaining_secs(f64::from(limit), self.elapsed_secs(now)))
    }

    /// When the time limit runs out; `None` for untimed quizzes.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.time_limit_secs
            .map(|limit| self.started_at + chrono::Duration::seconds(i64::from(limit)))
    }

    pub fn is_time_expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining_secs(now).is_some_and(|remaining| remaining <= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn question(difficulty: QuizDifficulty) -> QuizQuestion {
        QuizQuestion::new(
            "Which planet is known as the Red Planet?",
            ["Venus", "Mars", "Jupiter", "Saturn"],
            1,
            QuizCategory::Science,
            difficulty,
            "Iron oxide.",
        )
    }

    fn session(difficulties: &[QuizDifficulty]) -> QuizSession {
        let questions = difficulties.iter().map(|d| question(*d)).collect();
        QuizSession::new(questions, Utc::now())
    }

    #[test]
    fn test_correct_answer_scores_once() {
        let mut quiz = session(&[QuizDifficulty::Medium, QuizDifficulty::Easy]);

        assert_eq!(quiz.submit_answer(0).points_awarded(), 0);
        assert_eq!(quiz.submit_answer(1).points_awarded(), 150);
        assert_eq!(quiz.submit_answer(1).points_awarded(), 0);
        assert_eq!(quiz.score, 150);
        assert_eq!(quiz.answer_for(0), Some(1));
    }

    #[test]
    fn test_out_of_range_answer_is_ignored() {
        let mut quiz = session(&[QuizDifficulty::Easy]);
        assert_eq!(
            quiz.submit_answer(4),
            MoveOutcome::ignored(IgnoreReason::AnswerOutOfRange)
        );
        assert!(quiz.user_answers.is_empty());
    }

    #[test]
    fn test_navigation_and_completion() {
        let now = Utc::now();
        let mut quiz = session(&[QuizDifficulty::Easy, QuizDifficulty::Easy]);

        quiz.previous_question();
        assert_eq!(quiz.current_question_index, 0);
        assert!(!quiz.can_go_previous());

        assert_eq!(quiz.next_question(now), SessionStatus::Active);
        assert!(quiz.can_go_previous());
        assert_eq!(quiz.progress(), 0.5);

        let end = now + Duration::seconds(30);
        assert_eq!(quiz.next_question(end), SessionStatus::Completed);
        assert!(quiz.is_completed);
        assert_eq!(quiz.ended_at, Some(end));
        assert!(quiz.current_question().is_none());

        quiz.previous_question();
        assert_eq!(quiz.current_question_index, 2);
        assert_eq!(
            quiz.submit_answer(1),
            MoveOutcome::ignored(IgnoreReason::SessionCompleted)
        );
    }

    #[test]
    fn test_accuracy() {
        let now = Utc::now();
        let mut quiz = session(&[QuizDifficulty::Easy, QuizDifficulty::Easy, QuizDifficulty::Easy]);
        assert_eq!(quiz.accuracy(), 0.0);

        quiz.submit_answer(1);
        quiz.next_question(now);
        quiz.submit_answer(2);
        assert_eq!(quiz.correct_answer_count(), 1);
        assert_eq!(quiz.accuracy(), 0.5);
    }

    #[test]
    fn test_difficulty_label() {
        use QuizDifficulty::*;
        assert_eq!(session(&[Hard, Hard, Easy]).difficulty_label(), Hard);
        assert_eq!(session(&[Hard, Medium]).difficulty_label(), Medium);
        assert_eq!(session(&[Medium, Medium, Easy]).difficulty_label(), Medium);
        assert_eq!(session(&[Easy, Medium]).difficulty_label(), Easy);
        assert_eq!(session(&[]).difficulty_label(), Easy);
    }

    #[test]
    fn test_time_limit() {
        let mut quiz = session(&[QuizDifficulty::Easy]).with_time_limit(Some(60));
        let start = quiz.started_at;

        assert_eq!(quiz.remaining_secs(start + Duration::seconds(20)), Some(40.0));
        assert!(!quiz.is_time_expired(start + Duration::seconds(59)));
        assert!(quiz.is_time_expired(start + Duration::seconds(60)));

        quiz.finish(start + Duration::seconds(10));
        assert_eq!(quiz.elapsed_secs(start + Duration::seconds(500)), 10.0);
        assert_eq!(session(&[QuizDifficulty::Easy]).remaining_secs(start), None);
    }

    #[test]
    fn test_late_finish_ends_at_deadline() {
        let mut quiz = session(&[QuizDifficulty::Easy]).with_time_limit(Some(30));
        let start = quiz.started_at;
        assert_eq!(quiz.deadline(), Some(start + Duration::seconds(30)));

        quiz.finish(start + Duration::seconds(120));
        assert_eq!(quiz.ended_at, Some(start + Duration::seconds(30)));
        assert_eq!(quiz.elapsed_secs(start + Duration::seconds(120)), 30.0);
        assert_eq!(session(&[QuizDifficulty::Easy]).deadline(), None);
    }

    #[test]
    fn test_maximum_score() {
        let quiz = session(&[QuizDifficulty::Easy, QuizDifficulty::Hard]);
        assert_eq!(quiz.maximum_score(), 300);
    }
}

use chrono::{DateTime, Utc};
use vocab_core::model::{QuizQuestion, SessionStats};

use crate::error::QuizError;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Where a quiz stands. `index` points into the question list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuizPhase {
    #[default]
    NotStarted,
    InProgress {
        index: usize,
    },
    Complete,
}

/// The first option picked for a question. Later picks do not replace it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedAnswer {
    pub selected: String,
    pub correct: bool,
}

/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One run through a generated quiz.
///
/// `NotStarted -> InProgress { index } -> Complete`, and back to
/// `NotStarted` through [`restart`](Self::restart).
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    phase: QuizPhase,
    questions: Vec<QuizQuestion>,
    answers: Vec<Option<LockedAnswer>>,
    stats: SessionStats,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin answering `questions`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` for an empty question list and
    /// `QuizError::AlreadyStarted` unless the session is `NotStarted`.
    pub fn start(
        &mut self,
        questions: Vec<QuizQuestion>,
        started_at: DateTime<Utc>,
    ) -> Result<(), QuizError> {
        if self.phase != QuizPhase::NotStarted {
            return Err(QuizError::AlreadyStarted);
        }
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }

        self.answers = vec![None; questions.len()];
        self.questions = questions;
        self.stats.reset();
        self.started_at = Some(started_at);
        self.completed_at = None;
        self.phase = QuizPhase::InProgress { index: 0 };
        Ok(())
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.phase {
            QuizPhase::InProgress { index } => self.questions.get(index),
            _ => None,
        }
    }

    /// Answer already locked in for the current question.
    #[must_use]
    pub fn locked_answer(&self) -> Option<&LockedAnswer> {
        match self.phase {
            QuizPhase::InProgress { index } => self.answers.get(index)?.as_ref(),
            _ => None,
        }
    }

    /// Transliteration of the current answer, available once it is answered.
    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.locked_answer()?;
        self.current_question()?.hint.as_deref()
    }

    /// Lock `option` in as the answer to the current question.
    ///
    /// Picking again after an answer is locked changes nothing and returns
    /// the locked answer.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotInProgress` outside `InProgress` and
    /// `QuizError::UnknownOption` for an option the question does not offer.
    pub fn select(&mut self, option: &str) -> Result<LockedAnswer, QuizError> {
        let QuizPhase::InProgress { index } = self.phase else {
            return Err(QuizError::NotInProgress);
        };
        if let Some(locked) = &self.answers[index] {
            return Ok(locked.clone());
        }

        let question = &self.questions[index];
        if !question.offers(option) {
            return Err(QuizError::UnknownOption(option.to_string()));
        }

        let locked = LockedAnswer {
            selected: option.to_string(),
            correct: question.is_correct(option),
        };
        self.stats.record(locked.correct);
        self.answers[index] = Some(locked.clone());
        Ok(locked)
    }

    /// Move past an answered question. After the last one the quiz is
    /// `Complete`, stamped with `at`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotInProgress` outside `InProgress` and
    /// `QuizError::Unanswered` if the current question has no answer yet.
    pub fn advance(&mut self, at: DateTime<Utc>) -> Result<QuizPhase, QuizError> {
        let QuizPhase::InProgress { index } = self.phase else {
            return Err(QuizError::NotInProgress);
        };
        if self.answers[index].is_none() {
            return Err(QuizError::Unanswered);
        }

        self.phase = if index + 1 < self.questions.len() {
            QuizPhase::InProgress { index: index + 1 }
        } else {
            self.completed_at = Some(at);
            QuizPhase::Complete
        };
        Ok(self.phase)
    }

    /// Drop the questions and answers. Allowed in any phase; mid-quiz this
    /// abandons the run.
    pub fn restart(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == QuizPhase::Complete
    }

    /// Questions whose locked answer was correct.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.stats.correct()
    }

    #[must_use]
    pub fn accuracy(&self) -> u32 {
        self.stats.accuracy()
    }

    #[must_use]
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let answered = self.answers.iter().filter(|a| a.is_some()).count();
        QuizProgress {
            total: self.questions.len(),
            answered,
            remaining: self.questions.len() - answered,
            is_complete: self.is_complete(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::time::fixed_now;

    fn question(prompt: &str, correct: &str, others: &[&str]) -> QuizQuestion {
        let mut options: Vec<String> = others.iter().map(|o| (*o).to_string()).collect();
        options.push(correct.to_string());
        QuizQuestion {
            prompt: prompt.to_string(),
            correct_answer: correct.to_string(),
            options,
            hint: Some(format!("{prompt}-hint")),
        }
    }

    fn two_questions() -> Vec<QuizQuestion> {
        vec![
            question("apple", "ஆப்பிள்", &["பேனா", "புத்தகம்"]),
            question("pen", "பேனா", &["ஆப்பிள்", "தண்ணீர்"]),
        ]
    }

    fn started() -> QuizSession {
        let mut session = QuizSession::new();
        session.start(two_questions(), fixed_now()).unwrap();
        session
    }

    #[test]
    fn empty_question_list_cannot_start() {
        let mut session = QuizSession::new();
        assert!(matches!(
            session.start(Vec::new(), fixed_now()),
            Err(QuizError::Empty)
        ));
        assert_eq!(session.phase(), QuizPhase::NotStarted);
    }

    #[test]
    fn runs_through_every_question() {
        let mut session = started();
        assert_eq!(session.phase(), QuizPhase::InProgress { index: 0 });
        assert_eq!(session.started_at(), Some(fixed_now()));

        assert!(session.select("ஆப்பிள்").unwrap().correct);
        assert_eq!(
            session.advance(fixed_now()).unwrap(),
            QuizPhase::InProgress { index: 1 }
        );
        assert!(!session.select("தண்ணீர்").unwrap().correct);
        assert_eq!(session.advance(fixed_now()).unwrap(), QuizPhase::Complete);

        assert!(session.is_complete());
        assert_eq!(session.score(), 1);
        assert_eq!(session.accuracy(), 50);
        assert_eq!(session.completed_at(), Some(fixed_now()));
        assert!(session.current_question().is_none());
    }

    #[test]
    fn reselecting_keeps_first_answer() {
        let mut session = started();
        let first = session.select("பேனா").unwrap();
        let again = session.select("ஆப்பிள்").unwrap();

        assert_eq!(again, first);
        assert!(!again.correct);
        assert_eq!(session.stats().answered(), 1);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn options_not_offered_are_rejected() {
        let mut session = started();
        assert!(matches!(
            session.select("பால்"),
            Err(QuizError::UnknownOption(option)) if option == "பால்"
        ));
        assert!(session.locked_answer().is_none());
    }

    #[test]
    fn hint_appears_only_after_answering() {
        let mut session = started();
        assert_eq!(session.hint(), None);
        session.select("ஆப்பிள்").unwrap();
        assert_eq!(session.hint(), Some("apple-hint"));
    }

    #[test]
    fn advance_requires_an_answer() {
        let mut session = started();
        assert!(matches!(
            session.advance(fixed_now()),
            Err(QuizError::Unanswered)
        ));

        let mut idle = QuizSession::new();
        assert!(matches!(
            idle.advance(fixed_now()),
            Err(QuizError::NotInProgress)
        ));
        assert!(matches!(idle.select("x"), Err(QuizError::NotInProgress)));
    }

    #[test]
    fn restart_returns_to_not_started() {
        let mut session = started();
        session.select("ஆப்பிள்").unwrap();
        assert!(matches!(
            session.start(two_questions(), fixed_now()),
            Err(QuizError::AlreadyStarted)
        ));

        session.restart();
        assert_eq!(session.phase(), QuizPhase::NotStarted);
        assert_eq!(session.score(), 0);
        assert!(session.questions().is_empty());

        session.start(two_questions(), fixed_now()).unwrap();
        assert_eq!(
            session.progress(),
            QuizProgress {
                total: 2,
                answered: 0,
                remaining: 2,
                is_complete: false,
            }
        );
    }
}

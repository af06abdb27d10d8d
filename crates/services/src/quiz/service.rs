use std::sync::Arc;

use tracing::info;
use vocab_core::{Clock, PoolSources, build_quiz};

use super::session::{QuizPhase, QuizSession};
use crate::bank_client::Activity;
use crate::error::QuizError;
use crate::word_bank::WordBankStore;

/// Questions per quiz unless the learner picks another length.
pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// Builds quizzes from the current word pool and reports finished ones.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    bank: Arc<WordBankStore>,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, bank: Arc<WordBankStore>) -> Self {
        Self { clock, bank }
    }

    /// Generate up to `count` questions from the enabled sources and start a
    /// session over them.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` when the pool yields no questions.
    pub async fn start_quiz(
        &self,
        count: usize,
        sources: PoolSources,
    ) -> Result<QuizSession, QuizError> {
        let pool = self.bank.pool(sources).await;
        let questions = build_quiz(count, &pool, &mut rand::rng());
        info!(requested = count, built = questions.len(), pool = pool.len(), "quiz generated");

        let mut session = QuizSession::new();
        session.start(questions, self.clock.now())?;
        Ok(session)
    }

    /// Move the session on, stamping completion with the service clock.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::advance`].
    pub fn advance(&self, session: &mut QuizSession) -> Result<QuizPhase, QuizError> {
        session.advance(self.clock.now())
    }

    /// Report a completed quiz to the streak counter. Returns `false` for a
    /// quiz that is not complete; reporting itself is best-effort.
    pub async fn finish(&self, session: &QuizSession) -> bool {
        if !session.is_complete() {
            return false;
        }
        info!(
            score = session.score(),
            total = session.questions().len(),
            accuracy = session.accuracy(),
            "quiz finished"
        );
        self.bank.report_activity(Activity::Quiz).await;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeBank, cache_with_token, word};
    use reqwest::StatusCode;
    use vocab_core::time::fixed_clock;

    async fn service(token: Option<&str>) -> (QuizService, FakeBank) {
        let bank = FakeBank::new();
        let cache = cache_with_token(token).await;
        let store = WordBankStore::new(Arc::new(bank.clone()), cache);
        (QuizService::new(fixed_clock(), Arc::new(store)), bank)
    }

    fn saved_only() -> PoolSources {
        PoolSources {
            include_defaults: false,
            include_saved: true,
        }
    }

    #[tokio::test]
    async fn default_quiz_uses_builtin_words() {
        let (service, bank) = service(None).await;
        bank.fail_with(StatusCode::SERVICE_UNAVAILABLE);

        let session = service
            .start_quiz(DEFAULT_QUESTION_COUNT, PoolSources::default())
            .await
            .unwrap();

        assert_eq!(session.questions().len(), DEFAULT_QUESTION_COUNT);
        assert_eq!(session.phase(), QuizPhase::InProgress { index: 0 });
        for q in session.questions() {
            assert_eq!(q.options.len(), 4);
        }
    }

    #[tokio::test]
    async fn empty_pool_cannot_start() {
        let (service, _) = service(None).await;
        let err = service.start_quiz(5, saved_only()).await.unwrap_err();
        assert!(matches!(err, QuizError::Empty));
    }

    #[tokio::test]
    async fn completed_quiz_is_reported_once_finished() {
        let (service, bank) = service(Some("token")).await;
        bank.seed(word("cat", "பூனை"));
        bank.seed(word("dog", "நாய்"));

        let mut session = service.start_quiz(2, saved_only()).await.unwrap();
        assert!(!service.finish(&session).await);

        while !session.is_complete() {
            let answer = session.current_question().unwrap().correct_answer.clone();
            session.select(&answer).unwrap();
            service.advance(&mut session).unwrap();
        }

        assert!(service.finish(&session).await);
        assert_eq!(session.score(), 2);
        assert_eq!(bank.activities(), vec![Activity::Quiz]);
    }

    #[tokio::test]
    async fn failed_report_does_not_fail_finish() {
        let (service, bank) = service(None).await;
        bank.seed(word("cat", "பூனை"));

        let mut session = service.start_quiz(1, saved_only()).await.unwrap();
        session.select("பூனை").unwrap();
        service.advance(&mut session).unwrap();

        assert!(service.finish(&session).await);
        assert!(bank.activities().is_empty());
    }
}

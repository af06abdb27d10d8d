use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;
use vocab_core::PoolSources;
use vocab_core::model::{ProgressRecord, SessionStats, VocabularyEntry};

use crate::error::FlashcardError;
use crate::progress_service::ProgressService;
use crate::word_bank::WordBankStore;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Which language a card shows before it is flipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardFront {
    #[default]
    Source,
    Target,
}

/// A shuffled deck of words walked one card at a time.
#[derive(Debug, Clone)]
pub struct FlashcardSession {
    deck: Vec<VocabularyEntry>,
    index: usize,
    revealed: bool,
    front: CardFront,
    stats: SessionStats,
}

impl FlashcardSession {
    /// Shuffle the usable words of `pool` into a deck.
    ///
    /// # Errors
    ///
    /// Returns `FlashcardError::Empty` if no usable word remains.
    pub fn start<R>(pool: Vec<VocabularyEntry>, rng: &mut R) -> Result<Self, FlashcardError>
    where
        R: Rng + ?Sized,
    {
        let mut deck: Vec<VocabularyEntry> = pool.into_iter().filter(|e| e.is_usable()).collect();
        if deck.is_empty() {
            return Err(FlashcardError::Empty);
        }
        deck.shuffle(rng);
        Ok(Self {
            deck,
            index: 0,
            revealed: false,
            front: CardFront::default(),
            stats: SessionStats::new(),
        })
    }

    #[must_use]
    pub fn current(&self) -> &VocabularyEntry {
        &self.deck[self.index]
    }

    /// Zero-based position of the current card.
    #[must_use]
    pub fn position(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.deck.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn front(&self) -> CardFront {
        self.front
    }

    /// Text on the side shown first.
    #[must_use]
    pub fn front_text(&self) -> &str {
        match self.front {
            CardFront::Source => self.current().source_text(),
            CardFront::Target => self.current().target_text(),
        }
    }

    /// Text on the reverse side.
    #[must_use]
    pub fn back_text(&self) -> &str {
        match self.front {
            CardFront::Source => self.current().target_text(),
            CardFront::Target => self.current().source_text(),
        }
    }

    #[must_use]
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn flip(&mut self) {
        self.revealed = !self.revealed;
    }

    /// Swap which language is shown first. The card turns face down.
    pub fn toggle_front(&mut self) {
        self.front = match self.front {
            CardFront::Source => CardFront::Target,
            CardFront::Target => CardFront::Source,
        };
        self.revealed = false;
    }

    /// Count the current card as known or not and move on. Passing the last
    /// card reshuffles the deck and starts over.
    pub fn record_answer<R>(&mut self, known: bool, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.stats.record(known);
        self.revealed = false;
        if self.index + 1 < self.deck.len() {
            self.index += 1;
        } else {
            self.deck.shuffle(rng);
            self.index = 0;
        }
    }

    /// Next card, wrapping to the first without reshuffling.
    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.deck.len();
        self.revealed = false;
    }

    /// Previous card, wrapping to the last without reshuffling.
    pub fn previous(&mut self) {
        self.index = self.index.checked_sub(1).unwrap_or(self.deck.len() - 1);
        self.revealed = false;
    }

    /// Zero the stats and start over on a freshly shuffled deck.
    pub fn reset<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.stats.reset();
        self.deck.shuffle(rng);
        self.index = 0;
        self.revealed = false;
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Starts flashcard sessions and persists every answer as progress.
#[derive(Clone)]
pub struct FlashcardService {
    bank: Arc<WordBankStore>,
    progress: Arc<ProgressService>,
}

impl FlashcardService {
    #[must_use]
    pub fn new(bank: Arc<WordBankStore>, progress: Arc<ProgressService>) -> Self {
        Self { bank, progress }
    }

    /// # Errors
    ///
    /// Returns `FlashcardError::Empty` when the enabled sources hold no words.
    pub async fn start(&self, sources: PoolSources) -> Result<FlashcardSession, FlashcardError> {
        let pool = self.bank.pool(sources).await;
        FlashcardSession::start(pool, &mut rand::rng())
    }

    /// Record the current card as known or not, then move on.
    ///
    /// The session does not move if the progress write fails.
    ///
    /// # Errors
    ///
    /// Returns `FlashcardError::Progress` if progress cannot be saved.
    pub async fn answer(
        &self,
        session: &mut FlashcardSession,
        known: bool,
    ) -> Result<ProgressRecord, FlashcardError> {
        let record = self.progress.record_review(session.current(), known).await?;
        session.record_answer(known, &mut rand::rng());
        Ok(record)
    }
}

/// Correct/incorrect tally for the running quiz or flashcard session.
///
/// Not persisted; reset whenever a session (re)starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    correct: u32,
    incorrect: u32,
}

impl SessionStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, was_correct: bool) {
        if was_correct {
            self.correct = self.correct.saturating_add(1);
        } else {
            self.incorrect = self.incorrect.saturating_add(1);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.correct.saturating_add(self.incorrect)
    }

    /// Percentage of correct answers rounded half up; 0 before any answer.
    #[must_use]
    pub fn accuracy(&self) -> u32 {
        let total = u64::from(self.correct) + u64::from(self.incorrect);
        if total == 0 {
            return 0;
        }
        let rounded = (200 * u64::from(self.correct) + total) / (2 * total);
        u32::try_from(rounded).unwrap_or(100)
    }
}

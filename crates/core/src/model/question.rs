/// One multiple-choice question. Built fresh for every quiz, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    /// Source-language word shown to the learner.
    pub prompt: String,
    pub correct_answer: String,
    /// The correct answer plus up to three distractors, in display order.
    pub options: Vec<String>,
    /// Transliteration of the answer, shown once the question is answered.
    pub hint: Option<String>,
}

impl QuizQuestion {
    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        option == self.correct_answer
    }

    #[must_use]
    pub fn offers(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

mod service;
mod session;

pub use crate::error::QuizError;
pub use service::{DEFAULT_QUESTION_COUNT, QuizService};
pub use session::{LockedAnswer, QuizPhase, QuizProgress, QuizSession};

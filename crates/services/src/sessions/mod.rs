mod progress;
mod runner;
mod session;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use runner::SessionRunner;
pub use session::{AnswerOutcome, QuizSession, SessionPhase, SessionTiming};
pub use view::{LifelineView, OptionView, QuestionView};

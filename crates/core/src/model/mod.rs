mod leaderboard;
mod summary;
mod topic;

pub use leaderboard::{LeaderboardEntry, Ledger};
pub use summary::{QuizSummary, SummaryError};
pub use topic::{Catalog, Question, QuestionDraft, Topic, TopicDraft, TopicError};

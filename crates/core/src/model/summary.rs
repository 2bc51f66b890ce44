use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("final score ({score}) exceeds question count ({total})")]
    ScoreOutOfRange { score: u32, total: u32 },

    #[error("summary needs at least one question")]
    NoQuestions,
}

/// Outcome of one finished quiz run, as handed to the leaderboard ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    topic_name: String,
    final_score: u32,
    total_questions: u32,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl QuizSummary {
    /// Builds a validated summary.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError` if the time range is inverted, the question
    /// count is zero, or the score exceeds the question count.
    pub fn new(
        topic_name: impl Into<String>,
        final_score: u32,
        total_questions: u32,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, SummaryError> {
        if completed_at < started_at {
            return Err(SummaryError::InvalidTimeRange);
        }
        if total_questions == 0 {
            return Err(SummaryError::NoQuestions);
        }
        if final_score > total_questions {
            return Err(SummaryError::ScoreOutOfRange {
                score: final_score,
                total: total_questions,
            });
        }

        Ok(Self {
            topic_name: topic_name.into(),
            final_score,
            total_questions,
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn topic_name(&self) -> &str {
        &self.topic_name
    }

    #[must_use]
    pub fn final_score(&self) -> u32 {
        self.final_score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// True when every question was answered correctly with no hint penalty,
    /// the condition for earning the topic badge.
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.final_score == self.total_questions
    }
}

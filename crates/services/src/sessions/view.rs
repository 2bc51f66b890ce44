use chrono::{DateTime, Utc};
use serde::Serialize;

use super::session::{QuizSession, SessionPhase};

/// One answer option as a renderer would show it.
///
/// `is_correct` is `None` while the question is still open and revealed only
/// once an answer was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub label: String,
    pub is_selected: bool,
    pub is_correct: Option<bool>,
}

/// Lifeline availability for the current moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LifelineView {
    pub fifty_fifty: bool,
    pub skip: bool,
    pub hint_unlocked: bool,
}

/// Everything a renderer needs for the question screen. Emits no rendering
/// instructions; it is a plain description of state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<OptionView>,
    pub time_remaining: u32,
    pub score: f32,
    pub hint: Option<String>,
    pub lifelines: LifelineView,
}

impl QuestionView {
    /// Builds the view for the question currently on screen, or `None` once
    /// the session has completed.
    #[must_use]
    pub fn from_session(session: &QuizSession, now: DateTime<Utc>) -> Option<Self> {
        let question = session.current_question()?;
        let revealed = matches!(session.phase(), SessionPhase::Answered { .. });

        let options = session
            .visible_options()
            .iter()
            .map(|label| OptionView {
                label: label.clone(),
                is_selected: session.selected_answer() == Some(label.as_str()),
                is_correct: revealed.then(|| question.is_correct(label)),
            })
            .collect();

        Some(Self {
            index: session.current_index(),
            total: session.topic().question_count(),
            prompt: question.prompt().to_owned(),
            options,
            time_remaining: session.time_remaining(),
            score: session.score(),
            hint: session.hint().map(str::to_owned),
            lifelines: LifelineView {
                fifty_fifty: session.fifty_fifty_available(),
                skip: session.skip_available(),
                hint_unlocked: session.hint_available(now),
            },
        })
    }
}

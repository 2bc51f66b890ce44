use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;

use quiz_core::model::{Question, QuizSummary, Topic};

use super::progress::SessionProgress;
use crate::error::SessionError;

/// Fixed delays for a quiz run, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    /// Countdown per question before it expires unanswered.
    pub question_secs: u32,
    /// How long the answer reveal stays up before auto-advancing.
    pub reveal_secs: u32,
    /// How long a question must be on screen before the hint unlocks.
    pub hint_unlock_secs: i64,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            question_secs: 15,
            reveal_secs: 2,
            hint_unlock_secs: 5,
        }
    }
}

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for an answer to the current question.
    Active,
    /// An answer was submitted; the reveal delay is counting down.
    Answered { correct: bool },
    /// All questions have been passed.
    Completed,
}

/// Captures one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub selected: String,
    pub correct: bool,
}

/// One run through a topic's question list.
///
/// A synchronous state machine driven by user commands and a once-per-second
/// [`tick`](QuizSession::tick). Every mutating entry point is a silent no-op
/// when its guard fails (already answered, lifeline consumed, session done),
/// so a stale scheduled callback can never double-apply an effect.
#[derive(Debug, Clone)]
pub struct QuizSession {
    topic: Topic,
    timing: SessionTiming,
    current: usize,
    score: f32,
    phase: SessionPhase,
    selected_answer: Option<String>,
    answers: Vec<AnswerOutcome>,
    visible_subset: Option<Vec<String>>,
    hint_revealed: Option<String>,
    hint_used_this_question: bool,
    skip_available: bool,
    fifty_fifty_available: bool,
    time_remaining: u32,
    reveal_remaining: u32,
    question_shown_at: DateTime<Utc>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Starts a session on the first question of `topic`.
    ///
    /// Question order is the topic's list order, fixed for the whole run.
    /// `Topic` guarantees at least one question.
    #[must_use]
    pub fn new(topic: Topic, timing: SessionTiming, started_at: DateTime<Utc>) -> Self {
        Self {
            topic,
            timing,
            current: 0,
            score: 0.0,
            phase: SessionPhase::Active,
            selected_answer: None,
            answers: Vec::new(),
            visible_subset: None,
            hint_revealed: None,
            hint_used_this_question: false,
            skip_available: true,
            fifty_fifty_available: true,
            time_remaining: timing.question_secs,
            reveal_remaining: 0,
            question_shown_at: started_at,
            started_at,
            completed_at: None,
        }
    }

    //
    // ─── COMMANDS ──────────────────────────────────────────────────────────────
    //

    /// Submits an answer for the current question.
    ///
    /// Only the first submission per question counts; repeats and submissions
    /// outside the `Active` phase return `None` without touching any state.
    pub fn submit_answer(&mut self, option: &str, now: DateTime<Utc>) -> Option<AnswerOutcome> {
        if self.phase != SessionPhase::Active {
            return None;
        }
        let question = self.topic.question(self.current)?;
        let correct = question.is_correct(option);

        if correct {
            self.score += 1.0;
        }
        let outcome = AnswerOutcome {
            selected: option.to_owned(),
            correct,
        };
        self.answers.push(outcome.clone());
        self.selected_answer = Some(option.to_owned());
        self.phase = SessionPhase::Answered { correct };
        self.reveal_remaining = self.timing.reveal_secs;
        if self.reveal_remaining == 0 {
            self.advance(now);
        }

        Some(outcome)
    }

    /// Advances the countdowns by one second.
    ///
    /// In `Active`, running out of time behaves like an unanswered advance:
    /// no credit, no penalty. In `Answered`, the reveal delay counts down and
    /// then auto-advances. After completion, ticks are no-ops.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        match self.phase {
            SessionPhase::Active => {
                self.time_remaining = self.time_remaining.saturating_sub(1);
                if self.time_remaining == 0 {
                    self.advance(now);
                }
            }
            SessionPhase::Answered { .. } => {
                self.reveal_remaining = self.reveal_remaining.saturating_sub(1);
                if self.reveal_remaining == 0 {
                    self.advance(now);
                }
            }
            SessionPhase::Completed => {}
        }
    }

    /// Skips the current question without scoring it either way.
    ///
    /// One use per session. Returns false (and changes nothing) if the
    /// question was already answered or the lifeline is spent.
    pub fn use_skip(&mut self, now: DateTime<Utc>) -> bool {
        if self.phase != SessionPhase::Active || !self.skip_available {
            return false;
        }
        self.skip_available = false;
        self.advance(now);
        true
    }

    /// Narrows the current question to two options: the correct one and one
    /// incorrect option chosen uniformly at random.
    ///
    /// One use per session. Returns false (and changes nothing) if the
    /// question was already answered or the lifeline is spent.
    pub fn use_fifty_fifty<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.phase != SessionPhase::Active || !self.fifty_fifty_available {
            return false;
        }
        let Some(question) = self.topic.question(self.current) else {
            return false;
        };

        let incorrect: Vec<&String> = question
            .options()
            .iter()
            .filter(|o| !question.is_correct(o))
            .collect();
        let Some(kept_incorrect) = incorrect.choose(rng) else {
            return false;
        };

        // Preserve the original display order of the two surviving options.
        let visible: Vec<String> = question
            .options()
            .iter()
            .filter(|o| question.is_correct(o) || *o == *kept_incorrect)
            .cloned()
            .collect();

        self.visible_subset = Some(visible);
        self.fifty_fifty_available = false;
        true
    }

    /// Reveals the first character of the correct answer at the cost of one
    /// point, floored at zero.
    ///
    /// Unlocks `hint_unlock_secs` after the question appeared, is usable once
    /// per question, and only before answering.
    pub fn use_hint(&mut self, now: DateTime<Utc>) -> Option<String> {
        if !self.hint_available(now) {
            return None;
        }
        let question = self.topic.question(self.current)?;

        self.hint_used_this_question = true;
        self.score = (self.score - 1.0).max(0.0);
        let hint: String = question.correct().chars().take(1).collect();
        self.hint_revealed = Some(hint.clone());
        Some(hint)
    }

    fn advance(&mut self, now: DateTime<Utc>) {
        if self.current + 1 >= self.topic.question_count() {
            self.phase = SessionPhase::Completed;
            self.completed_at = Some(now);
            return;
        }

        self.current += 1;
        self.phase = SessionPhase::Active;
        self.selected_answer = None;
        self.visible_subset = None;
        self.hint_revealed = None;
        self.hint_used_this_question = false;
        self.time_remaining = self.timing.question_secs;
        self.reveal_remaining = 0;
        self.question_shown_at = now;
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Zero-based index of the question currently on screen.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase == SessionPhase::Completed {
            return None;
        }
        self.topic.question(self.current)
    }

    /// Options to offer for the current question: the 50/50 subset when that
    /// lifeline was used here, otherwise the full list.
    #[must_use]
    pub fn visible_options(&self) -> &[String] {
        if let Some(subset) = &self.visible_subset {
            return subset;
        }
        self.current_question().map_or(&[], Question::options)
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<&str> {
        self.selected_answer.as_deref()
    }

    /// Answers submitted so far (skipped and expired questions leave no entry).
    #[must_use]
    pub fn answers(&self) -> &[AnswerOutcome] {
        &self.answers
    }

    /// Running score; fractional only in that hint penalties subtract from it.
    #[must_use]
    pub fn score(&self) -> f32 {
        self.score
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub fn skip_available(&self) -> bool {
        self.skip_available
    }

    #[must_use]
    pub fn fifty_fifty_available(&self) -> bool {
        self.fifty_fifty_available
    }

    /// The hint revealed for the current question, if any.
    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.hint_revealed.as_deref()
    }

    /// Whether the hint could be used right now.
    #[must_use]
    pub fn hint_available(&self, now: DateTime<Utc>) -> bool {
        self.phase == SessionPhase::Active
            && !self.hint_used_this_question
            && (now - self.question_shown_at).num_seconds() >= self.timing.hint_unlock_secs
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Completed
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Final score as handed to the leaderboard: the running score, rounded.
    #[must_use]
    pub fn final_score(&self) -> u32 {
        // Score is bounded by the question count and floored at zero.
        self.score.round().max(0.0) as u32
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.topic.question_count();
        let remaining = if self.is_complete() {
            0
        } else {
            total - self.current
        };
        SessionProgress {
            total,
            answered: self.answers.len(),
            remaining,
            is_complete: self.is_complete(),
        }
    }

    /// Builds the completion summary for the leaderboard ledger.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotCompleted` while questions remain, or a
    /// `SummaryError` if the summary fields fail validation.
    pub fn summary(&self) -> Result<QuizSummary, SessionError> {
        let completed_at = self.completed_at.ok_or(SessionError::NotCompleted)?;
        let total = u32::try_from(self.topic.question_count())
            .map_err(|_| SessionError::NotCompleted)?;
        Ok(QuizSummary::new(
            self.topic.name(),
            self.final_score(),
            total,
            self.started_at,
            completed_at,
        )?)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn question(prompt: &str, correct: &str, wrong: &[&str]) -> Question {
        let mut options = vec![correct.to_string()];
        options.extend(wrong.iter().map(|s| (*s).to_string()));
        Question::new(prompt, options, correct).unwrap()
    }

    fn two_question_topic() -> Topic {
        Topic::new(
            "Process",
            "test topic",
            vec![
                question("Q1?", "right1", &["wrong1a", "wrong1b", "wrong1c"]),
                question("Q2?", "right2", &["wrong2a", "wrong2b", "wrong2c"]),
            ],
        )
        .unwrap()
    }

    fn session() -> QuizSession {
        QuizSession::new(two_question_topic(), SessionTiming::default(), fixed_now())
    }

    #[test]
    fn fresh_session_starts_at_zero() {
        let session = session();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0.0);
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.time_remaining(), 15);
        assert!(session.skip_available());
        assert!(session.fifty_fifty_available());
    }

    #[test]
    fn correct_answer_scores_one_point() {
        let mut session = session();
        let outcome = session.submit_answer("right1", fixed_now()).unwrap();
        assert!(outcome.correct);
        assert_eq!(session.score(), 1.0);
        assert_eq!(session.phase(), SessionPhase::Answered { correct: true });
    }

    #[test]
    fn incorrect_answer_scores_nothing() {
        let mut session = session();
        let outcome = session.submit_answer("wrong1a", fixed_now()).unwrap();
        assert!(!outcome.correct);
        assert_eq!(session.score(), 0.0);
        assert_eq!(session.phase(), SessionPhase::Answered { correct: false });
    }

    #[test]
    fn second_submission_is_a_no_op() {
        let mut session = session();
        session.submit_answer("wrong1a", fixed_now()).unwrap();
        assert!(session.submit_answer("right1", fixed_now()).is_none());
        assert_eq!(session.score(), 0.0);
        assert_eq!(session.selected_answer(), Some("wrong1a"));
    }

    #[test]
    fn reveal_delay_then_auto_advance() {
        let now = fixed_now();
        let mut session = session();
        session.submit_answer("right1", now).unwrap();
        assert_eq!(session.current_index(), 0);

        session.tick(now);
        assert_eq!(session.current_index(), 0);
        session.tick(now);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.time_remaining(), 15);
        assert!(session.selected_answer().is_none());
    }

    #[test]
    fn countdown_expiry_advances_without_credit() {
        let now = fixed_now();
        let mut session = session();
        for _ in 0..15 {
            session.tick(now);
        }
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.score(), 0.0);
        assert_eq!(session.phase(), SessionPhase::Active);
    }

    #[test]
    fn expiry_on_final_question_completes_with_score_unchanged() {
        let now = fixed_now();
        let mut session = session();
        session.submit_answer("right1", now).unwrap();
        session.tick(now);
        session.tick(now);
        assert_eq!(session.current_index(), 1);

        for _ in 0..15 {
            session.tick(now);
        }
        assert!(session.is_complete());
        assert_eq!(session.final_score(), 1);
    }

    #[test]
    fn ticks_after_completion_are_no_ops() {
        let now = fixed_now();
        let mut session = session();
        session.submit_answer("right1", now).unwrap();
        session.tick(now);
        session.tick(now);
        session.submit_answer("right2", now).unwrap();
        session.tick(now);
        session.tick(now);
        assert!(session.is_complete());

        let score = session.score();
        session.tick(now);
        session.tick(now);
        assert!(session.is_complete());
        assert_eq!(session.score(), score);
        assert!(session.submit_answer("right2", now).is_none());
    }

    #[test]
    fn answering_last_question_completes_and_emits_summary() {
        let now = fixed_now();
        let mut session = session();
        session.submit_answer("right1", now).unwrap();
        session.tick(now);
        session.tick(now);
        session.submit_answer("wrong2a", now).unwrap();
        session.tick(now);
        session.tick(now);

        assert!(session.is_complete());
        let summary = session.summary().unwrap();
        assert_eq!(summary.final_score(), 1);
        assert_eq!(summary.total_questions(), 2);
        assert!(!summary.is_perfect());
    }

    #[test]
    fn summary_before_completion_is_an_error() {
        let session = session();
        assert!(matches!(
            session.summary(),
            Err(SessionError::NotCompleted)
        ));
    }

    #[test]
    fn hint_locked_until_unlock_delay_passes() {
        let now = fixed_now();
        let mut session = session();
        assert!(!session.hint_available(now));
        assert!(session.use_hint(now).is_none());

        let later = now + Duration::seconds(5);
        assert!(session.hint_available(later));
        let hint = session.use_hint(later).unwrap();
        assert_eq!(hint, "r");
    }

    #[test]
    fn hint_deducts_one_point_floored_at_zero() {
        let now = fixed_now();
        let unlocked = now + Duration::seconds(5);
        let mut session = session();

        session.use_hint(unlocked).unwrap();
        assert_eq!(session.score(), 0.0);
        // Once per question.
        assert!(session.use_hint(unlocked).is_none());
        assert_eq!(session.score(), 0.0);
    }

    #[test]
    fn hint_resets_on_advance() {
        let now = fixed_now();
        let unlocked = now + Duration::seconds(5);
        let mut session = session();
        session.use_hint(unlocked).unwrap();
        session.submit_answer("right1", unlocked).unwrap();
        session.tick(unlocked);
        session.tick(unlocked);

        assert_eq!(session.current_index(), 1);
        assert!(session.hint().is_none());
        // Locked again until the new question's delay passes.
        assert!(!session.hint_available(unlocked));
        assert!(session.hint_available(unlocked + Duration::seconds(5)));
    }

    #[test]
    fn hint_penalty_scenario_from_two_question_run() {
        // Q1 correct (+1), hint on Q2 (-1), Q2 correct (+1) => final score 1.
        let now = fixed_now();
        let mut session = session();
        session.submit_answer("right1", now).unwrap();
        session.tick(now);
        session.tick(now);

        let unlocked = now + Duration::seconds(5);
        session.use_hint(unlocked).unwrap();
        assert_eq!(session.score(), 0.0);
        session.submit_answer("right2", unlocked).unwrap();
        session.tick(unlocked);
        session.tick(unlocked);

        assert!(session.is_complete());
        assert_eq!(session.final_score(), 1);
    }

    #[test]
    fn skip_advances_without_scoring_and_is_single_use() {
        let now = fixed_now();
        let mut session = session();
        assert!(session.use_skip(now));
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.score(), 0.0);
        assert!(session.answers().is_empty());

        // Consumed for the rest of the session.
        assert!(!session.use_skip(now));
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn skip_is_rejected_after_answering() {
        let now = fixed_now();
        let mut session = session();
        session.submit_answer("right1", now).unwrap();
        assert!(!session.use_skip(now));
        assert!(session.skip_available());
    }

    #[test]
    fn fifty_fifty_leaves_correct_plus_one_incorrect() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut session = session();
        assert!(session.use_fifty_fifty(&mut rng));

        let visible = session.visible_options();
        assert_eq!(visible.len(), 2);
        assert!(visible.contains(&"right1".to_string()));
        // The survivor keeps its position relative to the correct answer.
        let full = session.topic().question(0).unwrap().options().to_vec();
        let positions: Vec<usize> = visible
            .iter()
            .map(|v| full.iter().position(|o| o == v).unwrap())
            .collect();
        assert!(positions[0] < positions[1]);
    }

    #[test]
    fn fifty_fifty_is_single_use_per_session() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = fixed_now();
        let mut session = session();
        session.use_fifty_fifty(&mut rng);
        session.submit_answer("right1", now).unwrap();
        session.tick(now);
        session.tick(now);

        assert!(!session.use_fifty_fifty(&mut rng));
        // Back to the full option list on the next question.
        assert_eq!(session.visible_options().len(), 4);
    }

    #[test]
    fn fifty_fifty_subset_clears_on_advance() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = fixed_now();
        let mut session = session();
        session.use_fifty_fifty(&mut rng);
        assert!(session.use_skip(now));
        assert_eq!(session.visible_options().len(), 4);
    }

    #[test]
    fn progress_tracks_answers_and_completion() {
        let now = fixed_now();
        let mut session = session();
        assert_eq!(
            session.progress(),
            SessionProgress {
                total: 2,
                answered: 0,
                remaining: 2,
                is_complete: false
            }
        );

        session.submit_answer("right1", now).unwrap();
        session.tick(now);
        session.tick(now);
        session.submit_answer("right2", now).unwrap();
        session.tick(now);
        session.tick(now);

        assert_eq!(
            session.progress(),
            SessionProgress {
                total: 2,
                answered: 2,
                remaining: 0,
                is_complete: true
            }
        );
    }

    #[test]
    fn perfect_run_yields_perfect_summary() {
        let now = fixed_now();
        let mut session = session();
        session.submit_answer("right1", now).unwrap();
        session.tick(now);
        session.tick(now);
        session.submit_answer("right2", now).unwrap();
        session.tick(now);
        session.tick(now);

        let summary = session.summary().unwrap();
        assert_eq!(summary.final_score(), 2);
        assert!(summary.is_perfect());
    }
}

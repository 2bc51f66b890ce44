use std::sync::Arc;
use std::time::Duration;

use rand::rng;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use quiz_core::Clock;
use quiz_core::model::QuizSummary;

use super::progress::SessionProgress;
use super::session::{AnswerOutcome, QuizSession};
use super::view::QuestionView;
use crate::error::SessionError;

/// Drives a [`QuizSession`] with a repeating tick while the quiz screen is up.
///
/// The runner owns the cancellable ticker handle: dropping it aborts the
/// task, so no orphaned tick can mutate a torn-down session. The session
/// itself additionally guards every mutation, which keeps a tick that was
/// already in flight during teardown harmless.
pub struct SessionRunner {
    session: Arc<Mutex<QuizSession>>,
    clock: Clock,
    ticker: JoinHandle<()>,
}

impl SessionRunner {
    /// Spawns the runner with the standard one-second tick.
    #[must_use]
    pub fn spawn(session: QuizSession, clock: Clock) -> Self {
        Self::spawn_with_period(session, clock, Duration::from_secs(1))
    }

    /// Spawns with a custom tick period. Tests shrink the period to
    /// milliseconds; each tick still counts as one second of quiz time.
    #[must_use]
    pub fn spawn_with_period(session: QuizSession, clock: Clock, period: Duration) -> Self {
        let session = Arc::new(Mutex::new(session));
        let ticker = tokio::spawn({
            let session = Arc::clone(&session);
            async move {
                let mut interval = time::interval(period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                // The first interval tick resolves immediately.
                interval.tick().await;
                loop {
                    interval.tick().await;
                    let mut guard = session.lock().await;
                    guard.tick(clock.now());
                    if guard.is_complete() {
                        break;
                    }
                }
            }
        });

        Self {
            session,
            clock,
            ticker,
        }
    }

    /// Submits an answer for the current question. `None` when the question
    /// was already answered or the session is over.
    pub async fn submit_answer(&self, option: &str) -> Option<AnswerOutcome> {
        self.session
            .lock()
            .await
            .submit_answer(option, self.clock.now())
    }

    /// Uses the skip lifeline. Returns false when unavailable.
    pub async fn use_skip(&self) -> bool {
        self.session.lock().await.use_skip(self.clock.now())
    }

    /// Uses the 50/50 lifeline with thread-local randomness. Returns false
    /// when unavailable.
    pub async fn use_fifty_fifty(&self) -> bool {
        self.session.lock().await.use_fifty_fifty(&mut rng())
    }

    /// Uses the hint for the current question, if unlocked.
    pub async fn use_hint(&self) -> Option<String> {
        self.session.lock().await.use_hint(self.clock.now())
    }

    /// Snapshot for the renderer, `None` once the session completed.
    pub async fn view(&self) -> Option<QuestionView> {
        let guard = self.session.lock().await;
        QuestionView::from_session(&guard, self.clock.now())
    }

    pub async fn progress(&self) -> SessionProgress {
        self.session.lock().await.progress()
    }

    pub async fn is_complete(&self) -> bool {
        self.session.lock().await.is_complete()
    }

    /// Completion summary for the leaderboard.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotCompleted` while questions remain.
    pub async fn summary(&self) -> Result<QuizSummary, SessionError> {
        self.session.lock().await.summary()
    }
}

impl Drop for SessionRunner {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}

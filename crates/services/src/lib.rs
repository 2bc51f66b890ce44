#![forbid(unsafe_code)]

pub mod app_services;
pub mod challenge_service;
pub mod error;
pub mod leaderboard_service;
pub mod navigation;
pub mod profile_service;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use challenge_service::{CHALLENGE_COOLDOWN_SECS, ChallengeService};
pub use error::{
    AppServicesError, ChallengeError, LeaderboardError, ProfileError, SessionError,
};
pub use leaderboard_service::LeaderboardService;
pub use navigation::{NavigationController, Screen};
pub use profile_service::ProfileService;

pub use sessions::{
    AnswerOutcome, QuestionView, QuizSession, SessionPhase, SessionProgress, SessionRunner,
    SessionTiming,
};

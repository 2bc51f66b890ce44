use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::model::QuizSummary;

/// One user's row in the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    user_name: String,
    per_topic_scores: BTreeMap<String, u32>,
}

impl LeaderboardEntry {
    fn new(user_name: &str) -> Self {
        Self {
            user_name: user_name.to_owned(),
            per_topic_scores: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    #[must_use]
    pub fn score_for(&self, topic_name: &str) -> Option<u32> {
        self.per_topic_scores.get(topic_name).copied()
    }

    /// Sum of this user's per-topic scores.
    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.per_topic_scores.values().sum()
    }

    /// Number of distinct topics the user has finished at least once.
    #[must_use]
    pub fn topics_completed(&self) -> usize {
        self.per_topic_scores.len()
    }
}

/// In-memory leaderboard and badge ledger.
///
/// Held by an explicit service object, never as ambient global state. Badge
/// sets are append-only; a badge is earned by a perfect run and never revoked.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Vec<LeaderboardEntry>,
    badges: HashMap<String, BTreeSet<String>>,
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finished run and returns true when this call earned a new
    /// badge.
    ///
    /// A retake of the same topic overwrites the stored score with the latest
    /// result, win or lose. Entries are re-sorted by total score descending;
    /// the sort is stable, so ties keep their prior relative order.
    pub fn record_result(
        &mut self,
        user_name: &str,
        topic_name: &str,
        score: u32,
        total_questions: u32,
    ) -> bool {
        let earned_badge = total_questions > 0
            && score == total_questions
            && self
                .badges
                .entry(user_name.to_owned())
                .or_default()
                .insert(topic_name.to_owned());

        let index = match self
            .entries
            .iter()
            .position(|e| e.user_name == user_name)
        {
            Some(index) => index,
            None => {
                self.entries.push(LeaderboardEntry::new(user_name));
                self.entries.len() - 1
            }
        };
        self.entries[index]
            .per_topic_scores
            .insert(topic_name.to_owned(), score);

        self.entries.sort_by_key(|e| Reverse(e.total_score()));

        earned_badge
    }

    /// Records a completed session summary.
    pub fn record_summary(&mut self, user_name: &str, summary: &QuizSummary) -> bool {
        self.record_result(
            user_name,
            summary.topic_name(),
            summary.final_score(),
            summary.total_questions(),
        )
    }

    /// Restores a user's persisted badge set, e.g. at login. Append-only:
    /// existing badges are kept.
    pub fn restore_badges<I, S>(&mut self, user_name: &str, badges: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.badges
            .entry(user_name.to_owned())
            .or_default()
            .extend(badges.into_iter().map(Into::into));
    }

    #[must_use]
    pub fn total_score(&self, user_name: &str) -> u32 {
        self.entry(user_name)
            .map_or(0, LeaderboardEntry::total_score)
    }

    #[must_use]
    pub fn topics_completed(&self, user_name: &str) -> usize {
        self.entry(user_name)
            .map_or(0, LeaderboardEntry::topics_completed)
    }

    /// Earned badges for a user, in topic-name order.
    #[must_use]
    pub fn badges(&self, user_name: &str) -> Vec<String> {
        self.badges
            .get(user_name)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Entries sorted by total score descending.
    #[must_use]
    pub fn standings(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    fn entry(&self, user_name: &str) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.user_name == user_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_score_earns_badge_once() {
        let mut ledger = Ledger::new();
        assert!(ledger.record_result("alice", "Kernel", 2, 2));
        assert!(!ledger.record_result("alice", "Kernel", 2, 2));
        assert_eq!(ledger.badges("alice"), vec!["Kernel".to_string()]);
    }

    #[test]
    fn imperfect_score_earns_no_badge() {
        let mut ledger = Ledger::new();
        assert!(!ledger.record_result("alice", "Kernel", 1, 2));
        assert!(ledger.badges("alice").is_empty());
    }

    #[test]
    fn retake_overwrites_with_latest_score() {
        let mut ledger = Ledger::new();
        ledger.record_result("alice", "Kernel", 2, 2);
        ledger.record_result("alice", "Kernel", 0, 2);

        assert_eq!(ledger.total_score("alice"), 0);
        // The badge from the earlier perfect run survives the lower retake.
        assert_eq!(ledger.badges("alice"), vec!["Kernel".to_string()]);
    }

    #[test]
    fn standings_sort_by_total_descending() {
        let mut ledger = Ledger::new();
        ledger.record_result("alice", "Kernel", 1, 2);
        ledger.record_result("bob", "Kernel", 2, 2);
        ledger.record_result("bob", "Memory", 3, 3);

        let names: Vec<&str> = ledger
            .standings()
            .iter()
            .map(LeaderboardEntry::user_name)
            .collect();
        assert_eq!(names, vec!["bob", "alice"]);
    }

    #[test]
    fn ties_keep_prior_relative_order() {
        let mut ledger = Ledger::new();
        ledger.record_result("alice", "Kernel", 2, 2);
        ledger.record_result("bob", "Memory", 2, 3);

        let names: Vec<&str> = ledger
            .standings()
            .iter()
            .map(LeaderboardEntry::user_name)
            .collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[test]
    fn topics_completed_counts_distinct_topics() {
        let mut ledger = Ledger::new();
        ledger.record_result("alice", "Kernel", 2, 2);
        ledger.record_result("alice", "Kernel", 1, 2);
        ledger.record_result("alice", "Memory", 1, 3);

        assert_eq!(ledger.topics_completed("alice"), 2);
    }

    #[test]
    fn restored_badges_merge_with_earned_ones() {
        let mut ledger = Ledger::new();
        ledger.restore_badges("alice", ["Memory"]);
        ledger.record_result("alice", "Kernel", 2, 2);

        assert_eq!(
            ledger.badges("alice"),
            vec!["Kernel".to_string(), "Memory".to_string()]
        );
    }
}

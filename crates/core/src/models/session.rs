use serde::{Deserialize, Serialize};

/// Process-wide session flags that survive restarts.
///
/// Loaded once at startup from the session file and kept until an explicit
/// [`SessionState::reset`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// The onboarding personality test has been completed
    pub test_done: bool,

    /// Score produced by the personality test
    pub user_score: Option<i64>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_test_done(&mut self, score: Option<i64>) {
        self.test_done = true;
        if score.is_some() {
            self.user_score = score;
        }
    }

    /// A returning user skips onboarding only when both the flag and a score exist.
    pub fn is_returning_user(&self) -> bool {
        self.test_done && self.user_score.is_some()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Which screen the client should open on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStep {
    /// Onboarding wizard
    Intro,
    /// Main application
    App,
}

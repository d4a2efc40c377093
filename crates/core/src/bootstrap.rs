//! Startup: decide whether the client opens on onboarding or the main app.

use tracing::{info, warn};

use crate::errors::CoreError;
use crate::models::session::{EntryStep, SessionState};
use crate::models::settings::FetchPolicy;
use crate::providers::traits::TradingBackend;

/// Resolve the entry screen.
///
/// A returning user (flag and score stored locally) goes straight to the app.
/// Otherwise the backend is asked once, under the startup timeout, whether a
/// personality result already exists; a positive score is recorded in
/// `session` (the caller persists it) and opens the app. A zero score, an
/// error or a timeout opens onboarding.
pub async fn resolve_entry(
    session: &mut SessionState,
    backend: &dyn TradingBackend,
    policy: &FetchPolicy,
) -> EntryStep {
    if session.is_returning_user() {
        info!(score = ?session.user_score, "returning user");
        return EntryStep::App;
    }

    match check_personality(backend, policy).await {
        Ok(score) if score > 0 => {
            info!(score, "personality found on backend");
            session.mark_test_done(Some(score));
            EntryStep::App
        }
        Ok(_) => {
            info!("no personality result, starting onboarding");
            EntryStep::Intro
        }
        Err(e) => {
            warn!(error = %e, "personality check failed, starting onboarding");
            EntryStep::Intro
        }
    }
}

async fn check_personality(
    backend: &dyn TradingBackend,
    policy: &FetchPolicy,
) -> Result<i64, CoreError> {
    let timeout = policy.startup_check_timeout;
    let resp = tokio::time::timeout(timeout, backend.get_personality())
        .await
        .map_err(|_| CoreError::Timeout(timeout.as_millis() as u64))??;
    Ok(resp.score)
}

use std::path::Path;

use tracing::{debug, info};

use crate::errors::CoreError;
use crate::models::session::SessionState;

use super::format;

/// Durable key-value store for the process-wide [`SessionState`].
pub struct SessionStore;

impl SessionStore {
    /// Flow: SessionState → bincode → TAS1 format bytes
    pub fn save_to_bytes(session: &SessionState) -> Result<Vec<u8>, CoreError> {
        let payload = bincode::serialize(session)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize session: {e}")))?;

        Ok(format::write_file(format::CURRENT_VERSION, &payload))
    }

    /// Flow: TAS1 bytes → parse header → bincode → SessionState
    pub fn load_from_bytes(data: &[u8]) -> Result<SessionState, CoreError> {
        let (_, payload) = format::read_file(data)?;

        bincode::deserialize(payload)
            .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize session: {e}")))
    }

    pub fn save_to_file(session: &SessionState, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes(session)?;
        std::fs::write(path.as_ref(), bytes)?;
        debug!(path = %path.as_ref().display(), "session saved");
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<SessionState, CoreError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::load_from_bytes(&bytes)
    }

    /// Startup load: a missing file is a first run and yields a fresh session.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<SessionState, CoreError> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "no session file, starting fresh");
            return Ok(SessionState::default());
        }
        Self::load_from_file(path)
    }
}

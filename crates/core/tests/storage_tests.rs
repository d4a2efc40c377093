// ═══════════════════════════════════════════════════════════════════
// Storage Tests — file format, SessionStore
// ═══════════════════════════════════════════════════════════════════

use trading_assistant_core::errors::CoreError;
use trading_assistant_core::models::session::SessionState;
use trading_assistant_core::storage::format::{self, CURRENT_VERSION, HEADER_SIZE, MAGIC};
use trading_assistant_core::storage::manager::SessionStore;

fn returning_user() -> SessionState {
    let mut s = SessionState::new();
    s.mark_test_done(Some(72));
    s
}

// ═══════════════════════════════════════════════════════════════════
// File format
// ═══════════════════════════════════════════════════════════════════

mod file_format {
    use super::*;

    #[test]
    fn header_layout() {
        let bytes = format::write_file(CURRENT_VERSION, b"abc");
        assert_eq!(bytes.len(), HEADER_SIZE + 3);
        assert_eq!(&bytes[0..4], MAGIC);
        assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), CURRENT_VERSION);
        assert_eq!(u64::from_le_bytes(bytes[6..14].try_into().unwrap()), 3);
        assert_eq!(&bytes[14..], b"abc");
    }

    #[test]
    fn read_back() {
        let bytes = format::write_file(CURRENT_VERSION, b"payload");
        let (header, payload) = format::read_file(&bytes).unwrap();
        assert_eq!(header.version, CURRENT_VERSION);
        assert_eq!(header.payload_len, 7);
        assert_eq!(payload, b"payload");
    }

    #[test]
    fn trailing_bytes_ignored() {
        let mut bytes = format::write_file(CURRENT_VERSION, b"xy");
        bytes.extend_from_slice(b"junk");
        let (_, payload) = format::read_file(&bytes).unwrap();
        assert_eq!(payload, b"xy");
    }

    #[test]
    fn too_small() {
        assert!(matches!(
            format::read_file(b"TAS1"),
            Err(CoreError::InvalidFileFormat(_))
        ));
    }

    #[test]
    fn wrong_magic() {
        let mut bytes = format::write_file(CURRENT_VERSION, b"x");
        bytes[0] = b'X';
        assert!(matches!(
            format::read_file(&bytes),
            Err(CoreError::InvalidFileFormat(_))
        ));
    }

    #[test]
    fn unsupported_versions() {
        let zero = format::write_file(0, b"x");
        assert!(matches!(format::read_file(&zero), Err(CoreError::UnsupportedVersion(0))));

        let future = format::write_file(CURRENT_VERSION + 1, b"x");
        assert!(matches!(
            format::read_file(&future),
            Err(CoreError::UnsupportedVersion(v)) if v == CURRENT_VERSION + 1
        ));
    }

    #[test]
    fn truncated_payload() {
        let mut bytes = format::write_file(CURRENT_VERSION, b"0123456789");
        bytes.truncate(HEADER_SIZE + 4);
        let err = format::read_file(&bytes).unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn huge_declared_length() {
        let mut bytes = format::write_file(CURRENT_VERSION, b"");
        bytes[6..14].copy_from_slice(&u64::MAX.to_le_bytes());
        assert!(matches!(
            format::read_file(&bytes),
            Err(CoreError::InvalidFileFormat(_))
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════
// SessionStore
// ═══════════════════════════════════════════════════════════════════

mod session_store {
    use super::*;

    #[test]
    fn bytes_round_trip() {
        let session = returning_user();
        let bytes = SessionStore::save_to_bytes(&session).unwrap();
        assert_eq!(&bytes[0..4], MAGIC);
        assert_eq!(SessionStore::load_from_bytes(&bytes).unwrap(), session);
    }

    #[test]
    fn corrupt_payload() {
        let bytes = format::write_file(CURRENT_VERSION, &[0xFF]);
        assert!(matches!(
            SessionStore::load_from_bytes(&bytes),
            Err(CoreError::Deserialization(_))
        ));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.tas");
        SessionStore::save_to_file(&returning_user(), &path).unwrap();
        let loaded = SessionStore::load_from_file(&path).unwrap();
        assert!(loaded.is_returning_user());
        assert_eq!(loaded.user_score, Some(72));
    }

    #[test]
    fn missing_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.tas");
        assert!(matches!(SessionStore::load_from_file(&path), Err(CoreError::FileIO(_))));
        assert_eq!(SessionStore::load_or_default(&path).unwrap(), SessionState::default());
    }

    #[test]
    fn reset_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.tas");
        let mut session = returning_user();
        SessionStore::save_to_file(&session, &path).unwrap();
        session.reset();
        SessionStore::save_to_file(&session, &path).unwrap();
        assert!(!SessionStore::load_or_default(&path).unwrap().test_done);
    }
}

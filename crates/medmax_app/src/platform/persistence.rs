use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use medmax_client::AtomicFileWriter;
use medmax_logging::{medmax_error, medmax_info, medmax_warn};
use serde::{Deserialize, Serialize};

const SESSION_FILENAME: &str = ".medmax_session.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSession {
    token: String,
    /// RFC 3339.
    saved_at: String,
}

/// Reads the stored session token, if any. Unreadable files count as signed out.
pub(crate) fn load_session_token(state_dir: &Path) -> Option<String> {
    let path = state_dir.join(SESSION_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            medmax_warn!("Failed to read stored session from {:?}: {}", path, err);
            return None;
        }
    };

    let session: PersistedSession = match ron::from_str(&content) {
        Ok(session) => session,
        Err(err) => {
            medmax_warn!("Failed to parse stored session from {:?}: {}", path, err);
            return None;
        }
    };
    if session.token.is_empty() {
        return None;
    }
    medmax_info!("Loaded session saved at {}", session.saved_at);
    Some(session.token)
}

/// Stores `token`, or removes the file when the session ended.
pub(crate) fn save_session_token(state_dir: &Path, token: Option<&str>) {
    let writer = AtomicFileWriter::new(PathBuf::from(state_dir));
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        if let Err(err) = writer.remove(SESSION_FILENAME) {
            medmax_error!("Failed to remove stored session in {:?}: {}", state_dir, err);
        }
        return;
    };

    let session = PersistedSession {
        token: token.to_string(),
        saved_at: Utc::now().to_rfc3339(),
    };
    let content = match ron::ser::to_string_pretty(&session, ron::ser::PrettyConfig::new()) {
        Ok(text) => text,
        Err(err) => {
            medmax_error!("Failed to serialize session: {}", err);
            return;
        }
    };
    if let Err(err) = writer.write(SESSION_FILENAME, &content) {
        medmax_error!("Failed to write session to {:?}: {}", state_dir, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_survives_a_restart() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_session_token(dir.path()), None);

        save_session_token(dir.path(), Some("s1"));
        assert_eq!(load_session_token(dir.path()).as_deref(), Some("s1"));

        save_session_token(dir.path(), Some("s2"));
        assert_eq!(load_session_token(dir.path()).as_deref(), Some("s2"));
    }

    #[test]
    fn clearing_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        save_session_token(dir.path(), Some("s1"));
        save_session_token(dir.path(), None);
        assert!(!dir.path().join(SESSION_FILENAME).exists());
        assert_eq!(load_session_token(dir.path()), None);

        // Clearing twice is fine.
        save_session_token(dir.path(), None);
    }

    #[test]
    fn garbage_reads_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SESSION_FILENAME), "not ron at all {").unwrap();
        assert_eq!(load_session_token(dir.path()), None);
    }

    #[test]
    fn nested_state_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("state").join("medmax");
        save_session_token(&nested, Some("s1"));
        assert_eq!(load_session_token(&nested).as_deref(), Some("s1"));
    }
}

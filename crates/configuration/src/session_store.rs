use crate::error::ConfigError;
use core_types::Session;
use std::path::Path;

/// Reads the stored session from disk.
///
/// A missing file means nobody is signed in, which is not an error here: the
/// aggregator reports it as an authentication failure without touching the network.
pub fn load_session(path: &Path) -> Result<Session, ConfigError> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Session file not found; continuing signed out.");
        return Ok(Session::anonymous());
    }

    let raw = std::fs::read_to_string(path)?;
    let session = Session::from_json(&raw)?;
    tracing::debug!(
        path = %path.display(),
        has_user = session.user().is_some(),
        "Loaded session."
    );
    Ok(session)
}

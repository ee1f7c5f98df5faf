//! File-backed key/value state for the client.
//!
//! Each key is one JSON file in the state directory. Writes go to a
//! temporary file that is renamed over the old one, so a crash never leaves
//! a half-written value behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::ClientError;

/// Last successfully fetched job array.
pub const JOBS_KEY: &str = "jobs";
/// Session marker of the logged-in user.
pub const USER_KEY: &str = "user";

pub struct LocalState {
    dir: PathBuf,
}

impl LocalState {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// `Ok(None)` when the key was never written.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ClientError> {
        let bytes = match std::fs::read(self.path(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ClientError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        std::fs::write(&tmp, serde_json::to_vec_pretty(value)?)?;
        std::fs::rename(&tmp, &path)?;
        debug!(key, path = %path.display(), "local state saved");
        Ok(())
    }

    /// Removing a missing key is not an error.
    pub fn remove(&self, key: &str) -> Result<(), ClientError> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let state = LocalState::new(dir.path());
        assert!(state.get::<Value>(JOBS_KEY).unwrap().is_none());
    }

    #[test]
    fn set_creates_the_directory_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let state = LocalState::new(dir.path().join("nested"));

        state.set(JOBS_KEY, &json!([1])).unwrap();
        state.set(JOBS_KEY, &json!([2, 3])).unwrap();
        assert_eq!(state.get::<Value>(JOBS_KEY).unwrap(), Some(json!([2, 3])));

        let leftovers: Vec<_> = std::fs::read_dir(state.dir())
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let state = LocalState::new(dir.path());
        state.set(USER_KEY, &json!({"user": "admin"})).unwrap();
        state.remove(USER_KEY).unwrap();
        state.remove(USER_KEY).unwrap();
        assert!(state.get::<Value>(USER_KEY).unwrap().is_none());
    }

    #[test]
    fn corrupt_value_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("jobs.json"), b"not json").unwrap();
        let state = LocalState::new(dir.path());
        assert!(matches!(state.get::<Value>(JOBS_KEY), Err(ClientError::Json(_))));
    }
}

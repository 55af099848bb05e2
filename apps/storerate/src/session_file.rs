//! Session record kept in a JSON file between CLI invocations.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use storerate_core::{SessionError, SessionRecord, SessionStore};

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionRecord>, SessionError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| SessionError::Corrupt(e.to_string()))
    }

    fn save(&mut self, record: &SessionRecord) -> Result<(), SessionError> {
        let content = serde_json::to_string_pretty(record)
            .map_err(|e| SessionError::Corrupt(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

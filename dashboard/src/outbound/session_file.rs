//! Session persistence in a local JSON file.
//!
//! The file holds the bearer token, the account and the role captured at
//! login. All access goes through `cap_std::fs::Dir` handles opened on the
//! file's parent directory; serialised content is wiped from memory after
//! each read or write.

use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::Session;
use crate::domain::ports::{SessionStore, SessionStoreError};

/// [`SessionStore`] backed by one JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store writing to `path`; parent directories are created on save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn split(&self) -> Result<(&Path, &Path), SessionStoreError> {
        let file_name = self.path.file_name().ok_or_else(|| {
            SessionStoreError::io(format!("{} has no file name", self.path.display()))
        })?;
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Ok((parent, Path::new(file_name)))
    }

    fn io_error(&self, error: &io::Error) -> SessionStoreError {
        SessionStoreError::io(format!("{}: {error}", self.path.display()))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        let (parent, file_name) = self.split()?;
        let directory = match Dir::open_ambient_dir(parent, ambient_authority()) {
            Ok(directory) => directory,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(self.io_error(&error)),
        };
        let content = match directory.read_to_string(file_name) {
            Ok(content) => Zeroizing::new(content),
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(self.io_error(&error)),
        };
        let session = serde_json::from_str(content.as_str())
            .map_err(|error| SessionStoreError::corrupt(error.to_string()))?;
        debug!(path = %self.path.display(), "session restored");
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        let (parent, file_name) = self.split()?;
        Dir::create_ambient_dir_all(parent, ambient_authority())
            .map_err(|error| self.io_error(&error))?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|error| self.io_error(&error))?;
        let content = Zeroizing::new(
            serde_json::to_string(session)
                .map_err(|error| SessionStoreError::io(error.to_string()))?,
        );
        directory
            .write(file_name, content.as_bytes())
            .map_err(|error| self.io_error(&error))?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        let (parent, file_name) = self.split()?;
        let directory = match Dir::open_ambient_dir(parent, ambient_authority()) {
            Ok(directory) => directory,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(error) => return Err(self.io_error(&error)),
        };
        match directory.remove_file(file_name) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(self.io_error(&error)),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Round-trips through a temporary directory.

    use super::*;
    use crate::domain::Role;
    use crate::test_support::{session_for, temp_session_path};
    use rstest::rstest;

    #[rstest]
    fn missing_file_means_no_session() {
        let (_dir, path) = temp_session_path();
        let store = FileSessionStore::new(path);
        assert_eq!(store.load(), Ok(None));
    }

    #[rstest]
    fn saved_session_is_restored_with_its_role() {
        let (_dir, path) = temp_session_path();
        let store = FileSessionStore::new(path);
        let session = session_for(Role::Regional);

        store.save(&session).expect("session saves");
        let restored = store.load().expect("session loads").expect("session present");

        assert_eq!(restored, session);
        assert_eq!(restored.token().expose(), "token-regional");
    }

    #[rstest]
    fn save_creates_missing_parent_directories() {
        let (dir, _) = temp_session_path();
        let store = FileSessionStore::new(dir.path().join("nested/deeper/session.json"));

        store.save(&session_for(Role::Admin)).expect("session saves");
        assert!(store.load().expect("session loads").is_some());
    }

    #[rstest]
    fn clear_removes_the_file_and_tolerates_absence() {
        let (_dir, path) = temp_session_path();
        let store = FileSessionStore::new(path);
        store.save(&session_for(Role::Employee)).expect("session saves");

        store.clear().expect("first clear");
        store.clear().expect("second clear");
        assert_eq!(store.load(), Ok(None));
    }

    #[rstest]
    fn unreadable_content_is_reported_as_corrupt() {
        let (dir, path) = temp_session_path();
        let directory =
            Dir::open_ambient_dir(dir.path(), ambient_authority()).expect("open temp dir");
        directory
            .write("session.json", b"{ not json")
            .expect("write garbage");

        let error = FileSessionStore::new(path).load().expect_err("must fail");
        assert!(matches!(error, SessionStoreError::Corrupt { .. }));
    }
}

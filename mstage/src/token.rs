use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::StageError;

/// Storage for the session token the avatar host issues after the user
/// approves the plugin. Cached tokens let later sessions skip the on-screen
/// approval prompt.
pub trait TokenStore: Send + Sync {
    /// Returns the cached token, or `None` when no token has been saved yet.
    fn load(&self) -> Result<Option<String>, StageError>;

    /// Persists a freshly issued token.
    fn save(&self, token: &str) -> Result<(), StageError>;
}

/// Token store backed by a plain text file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, StageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StageError::io(format!(
                "token file {} is not readable: {err}",
                self.path.display()
            ))),
        }
    }

    fn save(&self, token: &str) -> Result<(), StageError> {
        fs::write(&self.path, token).map_err(|err| {
            StageError::io(format!(
                "token file {} is not writable: {err}",
                self.path.display()
            ))
        })
    }
}

/// Token store that lives in process memory. Useful for tests and for callers
/// that manage persistence themselves.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for InMemoryTokenStore {
    fn load(&self) -> Result<Option<String>, StageError> {
        let guard = self
            .token
            .lock()
            .map_err(|_| StageError::io("token store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, token: &str) -> Result<(), StageError> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| StageError::io("token store lock poisoned"))?;
        *guard = Some(token.to_string());
        Ok(())
    }
}

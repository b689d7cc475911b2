use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::PlayerSnapshot;

/// Persistence port used by the controller.
///
/// Implementations decide where the snapshot lives; the controller only
/// ever loads once at startup and saves after each change.
pub trait StateStore {
    /// Read the last saved snapshot. `Ok(None)` when nothing was saved yet.
    fn load(&mut self) -> Result<Option<PlayerSnapshot>, PersistError>;
    fn save(&mut self, snapshot: &PlayerSnapshot) -> Result<(), PersistError>;
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("state io: {0}")]
    Io(#[from] std::io::Error),
    #[error("state parse: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("state encode: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// TOML-on-disk backend, the browser-storage analog for native builds.
#[derive(Debug)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backend at the resolved default location. `None` when no home
    /// directory can be determined.
    pub fn at_default_path() -> Option<Self> {
        resolve_state_path(None).map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for StateFile {
    fn load(&mut self) -> Result<Option<PlayerSnapshot>, PersistError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(toml::from_str(&text)?))
    }

    fn save(&mut self, snapshot: &PlayerSnapshot) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(snapshot)?)?;
        Ok(())
    }
}

/// In-memory backend for tests and embedders that do not want disk
/// persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Option<PlayerSnapshot>,
}

impl MemoryStore {
    pub fn snapshot(&self) -> Option<&PlayerSnapshot> {
        self.snapshot.as_ref()
    }
}

impl StateStore for MemoryStore {
    fn load(&mut self) -> Result<Option<PlayerSnapshot>, PersistError> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, snapshot: &PlayerSnapshot) -> Result<(), PersistError> {
        self.snapshot = Some(snapshot.clone());
        Ok(())
    }
}

/// Resolve the state file location: `MUSILA_STATE_PATH`, then the
/// configured override, then the XDG default.
pub fn resolve_state_path(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = env::var_os("MUSILA_STATE_PATH") {
        return Some(PathBuf::from(p));
    }
    if let Some(p) = configured {
        return Some(p.to_path_buf());
    }
    default_state_path()
}

/// Compute the default state path under `$XDG_STATE_HOME/musila/player.toml`
/// or `~/.local/state/musila/player.toml` when `XDG_STATE_HOME` is not set.
pub fn default_state_path() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".local").join("state"))
    } else {
        None
    };

    state_home.map(|d| d.join("musila").join("player.toml"))
}

//! Persistence for saved chat sessions.
//!
//! The whole session list is read and written as one unit. A store that
//! cannot be read is treated as empty; a failed write is reported to the
//! caller and never retried.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::{from_reader, to_writer_pretty};

use crate::error::{Error, Result};
use crate::observability::{STORE_LOAD_ERRORS, STORE_LOADS, STORE_SAVE_ERRORS, STORE_SAVES};
use crate::types::Session;

/// File name used beneath the data directory.
pub const SESSIONS_FILE: &str = "chat_sessions.json";

const FORMAT_VERSION: u8 = 1;

/// Persistent storage for the list of sessions.
pub trait SessionStore: Send + Sync {
    /// Returns every saved session, or an empty list if none can be read.
    fn load(&self) -> Vec<Session>;

    /// Replaces the saved sessions with `sessions`.
    fn save(&self, sessions: &[Session]) -> Result<()>;
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn load(&self) -> Vec<Session> {
        (**self).load()
    }

    fn save(&self, sessions: &[Session]) -> Result<()> {
        (**self).save(sessions)
    }
}

/////////////////////////////////////////// JSON file ///////////////////////////////////////////

/// Stores sessions as a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSessionStore {
    path: PathBuf,
}

impl JsonFileSessionStore {
    /// Creates a store backed by `path`; the file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The per-user default location of the sessions file.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join("palaver"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(SESSIONS_FILE)
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<Session>> {
        let file = File::open(&self.path)
            .map_err(|err| Error::io("failed to open sessions file", err))?;
        let stored: StoredSessions = from_reader(BufReader::new(file)).map_err(|err| {
            Error::serialization("failed to parse sessions file", Some(Box::new(err)))
        })?;
        Ok(stored.into_sessions())
    }

    fn write(&self, sessions: &[Session]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|err| Error::io("failed to create sessions directory", err))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let file = File::create(&tmp)
            .map_err(|err| Error::io("failed to create sessions file", err))?;
        let mut writer = BufWriter::new(file);
        to_writer_pretty(&mut writer, &SessionsFile::new(sessions)).map_err(|err| {
            Error::serialization("failed to serialize sessions", Some(Box::new(err)))
        })?;
        writer
            .flush()
            .map_err(|err| Error::io("failed to flush sessions file", err))?;
        fs::rename(&tmp, &self.path)
            .map_err(|err| Error::io("failed to replace sessions file", err))
    }
}

impl SessionStore for JsonFileSessionStore {
    fn load(&self) -> Vec<Session> {
        STORE_LOADS.click();
        match self.read() {
            Ok(sessions) => sessions,
            Err(Error::Io { source, .. }) if source.kind() == ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                STORE_LOAD_ERRORS.click();
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring unreadable sessions file");
                Vec::new()
            }
        }
    }

    fn save(&self, sessions: &[Session]) -> Result<()> {
        STORE_SAVES.click();
        self.write(sessions).inspect_err(|_| STORE_SAVE_ERRORS.click())
    }
}

#[derive(Serialize, Deserialize)]
struct SessionsFile {
    version: u8,
    sessions: Vec<Session>,
}

impl SessionsFile {
    fn new(sessions: &[Session]) -> Self {
        Self {
            version: FORMAT_VERSION,
            sessions: sessions.to_vec(),
        }
    }
}

/// Accepts both the versioned document and a bare array of sessions.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSessions {
    Versioned(SessionsFile),
    Bare(Vec<Session>),
}

impl StoredSessions {
    fn into_sessions(self) -> Vec<Session> {
        match self {
            StoredSessions::Versioned(file) => file.sessions,
            StoredSessions::Bare(sessions) => sessions,
        }
    }
}

//////////////////////////////////////////// Memory /////////////////////////////////////////////

/// Keeps sessions in memory; useful for tests and ephemeral chats.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<Vec<Session>>,
    saves: AtomicUsize,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `sessions`.
    pub fn with_sessions(sessions: Vec<Session>) -> Self {
        Self {
            sessions: Mutex::new(sessions),
            saves: AtomicUsize::new(0),
        }
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Vec<Session> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, sessions: &[Session]) -> Result<()> {
        self.saves.fetch_add(1, Ordering::Relaxed);
        *self.sessions.lock().unwrap_or_else(PoisonError::into_inner) = sessions.to_vec();
        Ok(())
    }
}

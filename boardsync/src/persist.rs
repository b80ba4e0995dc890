//! Persistence port for client-side state that outlives the process
//!
//! The browser client kept its session token and consent flags in cookies
//! behind a global cookie store. Here that is an injected key-value port so
//! the session and remote-access layers can be wired to an in-memory fake
//! in tests, or a file on disk in a desktop shell.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Key under which the session token is persisted
pub const TOKEN_KEY: &str = "token";
/// Key for the analytics consent flag
pub const CONSENT_KEY: &str = "analytics-consent";
/// Key for the "has seen cookie notice" flag
pub const SEEN_COOKIE_NOTICE_KEY: &str = "has-seen-cookie-notice";

/// Key-value persistence port
///
/// Implementations must be safe to share across commands; values are small
/// strings (tokens and flags), so the interface is synchronous.
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Read a value by key
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value by key
    fn set(&self, key: &str, value: &str) -> std::io::Result<()>;

    /// Remove a value by key
    fn remove(&self, key: &str) -> std::io::Result<()>;
}

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> std::io::Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> std::io::Result<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

/// File-backed store holding a single JSON object of key-value pairs
///
/// The file is created with 0600 permissions on unix since it carries the
/// session token.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open a store at the given path, loading existing values if present
    pub fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err),
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    fn flush(&self, values: &HashMap<String, String>) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(values)?;
        let mut file = std::fs::File::create(&self.path)?;
        file.write_all(contents.as_bytes())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)?;
        }

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> std::io::Result<()> {
        let mut values = self.values.lock().unwrap();
        values.insert(key.to_string(), value.to_string());
        self.flush(&values)
    }

    fn remove(&self, key: &str) -> std::io::Result<()> {
        let mut values = self.values.lock().unwrap();
        if values.remove(key).is_some() {
            self.flush(&values)?;
        }
        Ok(())
    }
}

//! Best-score storage
//!
//! The only persisted state is one integer stored under [`SCORE_STORAGE_KEY`].

use std::cell::Cell;
use std::rc::Rc;

pub use crate::consts::SCORE_STORAGE_KEY;

/// Durable best-score persistence
pub trait ScoreStore {
    /// Stored best score, 0 when nothing is stored
    fn get(&self) -> u32;
    fn set(&mut self, value: u32);
}

/// In-memory store
///
/// Clones share the same value, so a caller can keep a handle after handing
/// a clone to a [`Game`](crate::sim::Game).
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    value: Rc<Cell<u32>>,
    writes: Rc<Cell<u32>>,
}

impl MemoryScoreStore {
    pub fn new(initial: u32) -> Self {
        Self {
            value: Rc::new(Cell::new(initial)),
            writes: Rc::new(Cell::new(0)),
        }
    }

    /// Number of `set` calls so far
    pub fn writes(&self) -> u32 {
        self.writes.get()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn get(&self) -> u32 {
        self.value.get()
    }

    fn set(&mut self, value: u32) {
        self.value.set(value);
        self.writes.set(self.writes.get() + 1);
    }
}

/// Best score kept in a small JSON file
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileScoreStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_CONFIG_HOME/fruit-merge/maxScore.json`, falling back to
    /// `~/.config` and then the working directory.
    pub fn default_path() -> std::path::PathBuf {
        use std::path::PathBuf;

        let base = match std::env::var("XDG_CONFIG_HOME") {
            Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
            _ => std::env::var("HOME")
                .map(|h| PathBuf::from(h).join(".config"))
                .unwrap_or_else(|_| PathBuf::from(".")),
        };
        base.join("fruit-merge")
            .join(format!("{SCORE_STORAGE_KEY}.json"))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn read(&self) -> crate::Result<u32> {
        let json = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(json.trim())?)
    }

    fn write(&self, value: u32) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string(&value)?)?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for FileScoreStore {
    fn get(&self) -> u32 {
        match self.read() {
            Ok(value) => value,
            Err(crate::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => {
                log::warn!("Could not read best score from {}: {}", self.path.display(), e);
                0
            }
        }
    }

    fn set(&mut self, value: u32) {
        if let Err(e) = self.write(value) {
            log::warn!("Could not save best score to {}: {}", self.path.display(), e);
        }
    }
}

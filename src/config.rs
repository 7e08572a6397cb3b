use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::error::Result;
use crate::language::Mode;
use crate::session::TimerMode;

/// Countdown length for word sessions when none is configured
pub const DEFAULT_WORD_SECS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub mode: Mode,
    pub number_of_words: usize,
    pub number_of_secs: Option<u64>,
    pub language: String,
    pub bell: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Words,
            number_of_words: 200,
            number_of_secs: None,
            language: "english".to_string(),
            bell: false,
        }
    }
}

impl Config {
    /// Word sessions always count down; other modes only when a duration is set
    pub fn timer_mode(&self) -> TimerMode {
        match (self.mode, self.number_of_secs) {
            (_, Some(secs)) => TimerMode::Countdown { secs },
            (Mode::Words, None) => TimerMode::Countdown {
                secs: DEFAULT_WORD_SECS,
            },
            _ => TimerMode::Stopwatch,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        serde_json::from_slice::<Config>(&bytes).unwrap_or_else(|err| {
            warn!(path = %self.path.display(), %err, "ignoring unreadable config");
            Config::default()
        })
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(cfg)?)?;
        Ok(())
    }
}

/// Keeps config in memory; used where nothing should touch the filesystem
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    cfg: std::cell::RefCell<Config>,
}

impl MemoryConfigStore {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg: std::cell::RefCell::new(cfg),
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Config {
        self.cfg.borrow().clone()
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        *self.cfg.borrow_mut() = cfg.clone();
        Ok(())
    }
}

//! Application preferences
//!
//! Preferences persist across runs, separate from session files:
//! recently opened exports, the last browsed folder, the parser policy and
//! the colour scheme.
//!
//! # App Data Location
//!
//! - **Linux**: `~/.local/share/dev.scopeview.scopeview-rs/`
//! - **macOS**: `~/Library/Application Support/dev.scopeview.scopeview-rs/`
//! - **Windows**: `%APPDATA%\dev.scopeview.scopeview-rs\`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, ScopeViewError};
use crate::parser::ParserConfig;

/// Application identifier for data directories
pub const APP_ID: &str = "dev.scopeview.scopeview-rs";

/// App state filename
pub const APP_STATE_FILE: &str = "app_state.json";

/// Maximum number of recent entries to remember
pub const MAX_RECENT_FILES: usize = 10;

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Get the path to the app state file
pub fn app_state_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(APP_STATE_FILE))
}

/// What a recent entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecentKind {
    Csv,
    Folder,
    Session,
}

/// A recently opened path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentFile {
    pub path: PathBuf,
    pub kind: RecentKind,
    pub opened_at: DateTime<Utc>,
}

impl RecentFile {
    pub fn new(path: impl Into<PathBuf>, kind: RecentKind) -> Self {
        Self {
            path: path.into(),
            kind,
            opened_at: Utc::now(),
        }
    }

    /// Display name: the file or folder name
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// Persistent application state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Version for future migration support
    #[serde(default = "default_app_state_version")]
    pub version: u32,

    /// Most recent first
    #[serde(default)]
    pub recent_files: Vec<RecentFile>,

    /// Folder the file dialogs open in
    #[serde(default)]
    pub last_directory: Option<PathBuf>,

    #[serde(default)]
    pub parser: ParserConfig,

    #[serde(default = "default_true")]
    pub dark_mode: bool,
}

fn default_app_state_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: 1,
            recent_files: Vec::new(),
            last_directory: None,
            parser: ParserConfig::default(),
            dark_mode: true,
        }
    }
}

impl AppState {
    /// Load app state from the default location
    pub fn load() -> Result<Self> {
        let path = app_state_path()
            .ok_or_else(|| ScopeViewError::Config("Could not determine app state path".to_string()))?;
        Self::load_from(path)
    }

    /// Load app state from `path`; a missing file gives defaults
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ScopeViewError::Config(format!("Failed to read app state: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| ScopeViewError::Config(format!("Failed to parse app state: {}", e)))
    }

    /// Load app state, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load app state, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save app state to the default location
    pub fn save(&self) -> Result<()> {
        let path = app_state_path()
            .ok_or_else(|| ScopeViewError::Config("Could not determine app data directory".to_string()))?;
        self.save_to(path)
    }

    /// Save app state to `path`, creating parent directories
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| {
                ScopeViewError::Config(format!("Failed to create app data directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ScopeViewError::Config(format!("Failed to serialize app state: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ScopeViewError::Config(format!("Failed to write app state: {}", e)))
    }

    /// Record an opened path at the front of the recent list
    ///
    /// Also remembers the containing folder for the next file dialog.
    pub fn add_recent(&mut self, path: impl AsRef<Path>, kind: RecentKind) {
        let path = path.as_ref().to_path_buf();

        self.recent_files.retain(|r| r.path != path);
        self.last_directory = match kind {
            RecentKind::Folder => Some(path.clone()),
            _ => path.parent().map(Path::to_path_buf),
        };
        self.recent_files.insert(0, RecentFile::new(path, kind));
        self.recent_files.truncate(MAX_RECENT_FILES);
    }

    /// Remove an entry (e.g. after it failed to open)
    pub fn remove_recent(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.recent_files.retain(|r| r.path != path);
    }

    /// Drop entries whose files no longer exist
    pub fn cleanup_missing(&mut self) {
        self.recent_files.retain(|r| r.exists());
    }
}

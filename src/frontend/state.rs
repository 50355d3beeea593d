//! Front end actions and status messages
//!
//! Panels return [`AppAction`]s instead of mutating application state
//! directly; [`ScopeApp`](super::ScopeApp) applies them in one place.

use std::path::PathBuf;

use crate::parser::DataMarkerPolicy;
use crate::types::Channel;

/// Actions any panel or menu can emit
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Load one export into the first free channel
    OpenCsv(PathBuf),
    /// Load a CH1/CH2 pair from a folder, replacing both channels
    OpenFolder(PathBuf),
    SaveSession(PathBuf),
    LoadSession(PathBuf),
    /// Write the displayed points for GeoGebra
    ExportPoints(PathBuf),
    ClearChannel(Channel),
    ResetView,
    TogglePin,
    /// Apply typed text as the pinned cursor time
    SetPinnedTime(String),
    /// Recompile the math overlay
    SetFormula(String),
    SetParserPolicy(DataMarkerPolicy),
    SetDarkMode(bool),
}

/// Last message shown in the status bar
#[derive(Debug, Clone, Default, PartialEq)]
pub enum StatusMessage {
    #[default]
    None,
    Info(String),
    Error(String),
}

impl StatusMessage {
    pub fn info(msg: impl Into<String>) -> Self {
        Self::Info(msg.into())
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Info(s) | Self::Error(s) => Some(s),
        }
    }
}

/// Choose the action for a path given on the command line
///
/// Folders load as a channel pair, `.json` files as sessions, anything else
/// as a single export.
pub fn action_for_path(path: PathBuf) -> AppAction {
    if path.is_dir() {
        AppAction::OpenFolder(path)
    } else if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    {
        AppAction::LoadSession(path)
    } else {
        AppAction::OpenCsv(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_for_path() {
        assert_eq!(
            action_for_path(PathBuf::from("run/session.JSON")),
            AppAction::LoadSession(PathBuf::from("run/session.JSON"))
        );
        assert_eq!(
            action_for_path(PathBuf::from("run/A0001CH1.CSV")),
            AppAction::OpenCsv(PathBuf::from("run/A0001CH1.CSV"))
        );

        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            action_for_path(dir.path().to_path_buf()),
            AppAction::OpenFolder(dir.path().to_path_buf())
        );
    }

    #[test]
    fn test_status_message() {
        assert_eq!(StatusMessage::default().text(), None);
        let err = StatusMessage::error("bad file");
        assert!(err.is_error());
        assert_eq!(err.text(), Some("bad file"));
    }
}

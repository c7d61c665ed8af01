use crate::executor::Interpreters;
use crate::history::HISTORY_LIMIT;
use crate::hotkey::{parse_shortcut, Shortcut};
use crate::search::SEARCH_LIMIT;
use crate::session::SessionOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// Directory holding one JSON file per shelf. If `None`, a folder in the
    /// platform data directory is used.
    #[serde(default)]
    pub shelf_dir: Option<String>,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Write log output to this file instead of stderr.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Maximum number of queries kept in the search history.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Maximum number of search results shown.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
    #[serde(default)]
    pub interpreters: Interpreters,
    /// Show inline toast messages for edit errors and failed commands.
    #[serde(default = "default_toasts")]
    pub enable_toasts: bool,
    /// Duration of toast notifications in seconds.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
    #[serde(default = "default_window_size")]
    pub window_size: Option<(i32, i32)>,
    #[serde(default = "default_save_hotkey")]
    pub save_hotkey: Option<String>,
    #[serde(default = "default_focus_search_hotkey")]
    pub focus_search_hotkey: Option<String>,
    /// Ask before deleting a shelf or button.
    #[serde(default = "default_confirm_delete")]
    pub confirm_delete: bool,
}

fn default_history_limit() -> usize {
    HISTORY_LIMIT
}

fn default_search_limit() -> usize {
    SEARCH_LIMIT
}

fn default_toasts() -> bool {
    true
}

fn default_toast_duration() -> f32 {
    3.0
}

fn default_window_size() -> Option<(i32, i32)> {
    Some((640, 480))
}

fn default_save_hotkey() -> Option<String> {
    Some("Ctrl+S".into())
}

fn default_focus_search_hotkey() -> Option<String> {
    Some("Ctrl+F".into())
}

fn default_confirm_delete() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            shelf_dir: None,
            debug_logging: false,
            log_file: None,
            history_limit: default_history_limit(),
            search_limit: default_search_limit(),
            interpreters: Interpreters::default(),
            enable_toasts: true,
            toast_duration: default_toast_duration(),
            window_size: default_window_size(),
            save_hotkey: default_save_hotkey(),
            focus_search_hotkey: default_focus_search_hotkey(),
            confirm_delete: true,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Default shelf folder inside the platform data directory.
    pub fn default_shelf_dir() -> PathBuf {
        dirs_next::data_dir()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| std::env::temp_dir()))
            .join("tak_tools")
            .join("shelves")
    }

    pub fn shelf_dir(&self) -> PathBuf {
        match &self.shelf_dir {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => Self::default_shelf_dir(),
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            history_limit: self.history_limit,
            search_limit: self.search_limit,
        }
    }

    pub fn save_hotkey(&self) -> Option<Shortcut> {
        parse_setting("save_hotkey", self.save_hotkey.as_deref())
    }

    pub fn focus_search_hotkey(&self) -> Option<Shortcut> {
        parse_setting("focus_search_hotkey", self.focus_search_hotkey.as_deref())
    }
}

fn parse_setting(name: &str, value: Option<&str>) -> Option<Shortcut> {
    let value = value?;
    match parse_shortcut(value) {
        Some(s) => Some(s),
        None => {
            tracing::warn!("provided {name} string '{value}' is invalid; ignoring");
            None
        }
    }
}

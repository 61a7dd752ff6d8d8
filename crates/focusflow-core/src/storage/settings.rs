//! TOML-based user settings.
//!
//! Stores the current-view preferences that feed the prioritizer and the
//! pomodoro preferences that configure the timer.
//!
//! Settings are stored at `~/.config/focusflow/settings.toml` unless
//! `FOCUSFLOW_SETTINGS` points elsewhere.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::prioritizer::{
    FilterConfig, DEFAULT_EVENING_START_HOUR, DEFAULT_MAX_ANYTIME_TASKS,
    DEFAULT_OLD_TASK_DAYS_THRESHOLD, DEFAULT_PRIORITIZE_SHORT_TASKS,
};

pub const MAX_ANYTIME_TASKS_RANGE: (usize, usize) = (1, 10);
pub const MAX_OLD_TASK_DAYS: i64 = 365;
pub const MAX_WORK_MINUTES: u32 = 120;
pub const MAX_REST_MINUTES: u32 = 60;

/// Current view (focus list) preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentViewSettings {
    #[serde(default = "default_max_anytime_tasks")]
    pub max_anytime_tasks: usize,
    #[serde(default = "default_true")]
    pub auto_switch_after_complete: bool,
    #[serde(default = "default_true")]
    pub celebration_animation: bool,
    #[serde(default)]
    pub sound_effects: bool,
    #[serde(default = "default_prioritize_short_tasks")]
    pub prioritize_short_tasks: bool,
    #[serde(default = "default_evening_start_hour")]
    pub evening_start_hour: u32,
    #[serde(default = "default_old_task_days_threshold")]
    pub old_task_days_threshold: i64,
}

/// Pomodoro timer preferences. Durations are minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSettings {
    #[serde(default)]
    pub enable_pomodoro: bool,
    #[serde(default = "default_work_duration")]
    pub work_duration: u32,
    #[serde(default = "default_rest_duration")]
    pub rest_duration: u32,
    #[serde(default)]
    pub sound_enabled: bool,
    #[serde(default)]
    pub auto_start_rest: bool,
}

/// User settings.
///
/// Serialized to/from TOML at `~/.config/focusflow/settings.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub current_view: CurrentViewSettings,
    #[serde(default)]
    pub pomodoro: PomodoroSettings,
}

fn default_max_anytime_tasks() -> usize {
    DEFAULT_MAX_ANYTIME_TASKS
}
fn default_prioritize_short_tasks() -> bool {
    DEFAULT_PRIORITIZE_SHORT_TASKS
}
fn default_evening_start_hour() -> u32 {
    DEFAULT_EVENING_START_HOUR
}
fn default_old_task_days_threshold() -> i64 {
    DEFAULT_OLD_TASK_DAYS_THRESHOLD
}
fn default_work_duration() -> u32 {
    25
}
fn default_rest_duration() -> u32 {
    5
}
fn default_true() -> bool {
    true
}

impl Default for CurrentViewSettings {
    fn default() -> Self {
        Self {
            max_anytime_tasks: default_max_anytime_tasks(),
            auto_switch_after_complete: true,
            celebration_animation: true,
            sound_effects: false,
            prioritize_short_tasks: default_prioritize_short_tasks(),
            evening_start_hour: default_evening_start_hour(),
            old_task_days_threshold: default_old_task_days_threshold(),
        }
    }
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            enable_pomodoro: false,
            work_duration: default_work_duration(),
            rest_duration: default_rest_duration(),
            sound_enabled: false,
            auto_start_rest: false,
        }
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

impl Settings {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => value
                        .parse::<bool>()
                        .map(serde_json::Value::Bool)
                        .map_err(|_| invalid(key, format!("cannot parse '{value}' as bool")))?,
                    serde_json::Value::Number(_) => value
                        .parse::<i64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(key, format!("cannot parse '{value}' as integer")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid(key, "is a section, not a value"));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Location of the settings file: `FOCUSFLOW_SETTINGS` if set, otherwise
    /// `settings.toml` in the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os("FOCUSFLOW_SETTINGS") {
            return Ok(PathBuf::from(path));
        }
        Ok(data_dir()?.join("settings.toml"))
    }

    /// Load from the default location, writing defaults if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed or validated,
    /// or if the default settings cannot be written.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults if the file is absent.
    ///
    /// # Errors
    ///
    /// See [`Settings::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        match Self::read_file(path)? {
            Some(settings) => Ok(settings),
            None => {
                let settings = Self::default();
                settings.save_to(path)?;
                debug!(path = %path.display(), "wrote default settings");
                Ok(settings)
            }
        }
    }

    /// Read from the default location without writing anything; defaults
    /// when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed or validated.
    pub fn read() -> Result<Self> {
        Self::read_from(&Self::path()?)
    }

    /// Read from `path` without writing anything; defaults when absent.
    ///
    /// # Errors
    ///
    /// See [`Settings::read`].
    pub fn read_from(path: &Path) -> Result<Self> {
        Ok(Self::read_file(path)?.unwrap_or_default())
    }

    fn read_file(path: &Path) -> Result<Option<Self>> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(load_failed(e.to_string()).into()),
        };
        let settings: Settings = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
        settings.validate()?;
        debug!(path = %path.display(), "loaded settings");
        Ok(Some(settings))
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be serialized or written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a value as string by dot-separated key, e.g. `current_view.max_anytime_tasks`.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key. The change is validated but not saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting settings are out of range. `self` is unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Settings =
            serde_json::from_value(json).map_err(|e| invalid(key, e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check every value against its permitted range.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range value.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let view = &self.current_view;
        let (min, max) = MAX_ANYTIME_TASKS_RANGE;
        if !(min..=max).contains(&view.max_anytime_tasks) {
            return Err(invalid(
                "current_view.max_anytime_tasks",
                format!("must be between {min} and {max}"),
            ));
        }
        if view.evening_start_hour > 23 {
            return Err(invalid(
                "current_view.evening_start_hour",
                "must be between 0 and 23",
            ));
        }
        if !(0..=MAX_OLD_TASK_DAYS).contains(&view.old_task_days_threshold) {
            return Err(invalid(
                "current_view.old_task_days_threshold",
                format!("must be between 0 and {MAX_OLD_TASK_DAYS}"),
            ));
        }

        let pomodoro = &self.pomodoro;
        if !(1..=MAX_WORK_MINUTES).contains(&pomodoro.work_duration) {
            return Err(invalid(
                "pomodoro.work_duration",
                format!("must be between 1 and {MAX_WORK_MINUTES} minutes"),
            ));
        }
        if !(1..=MAX_REST_MINUTES).contains(&pomodoro.rest_duration) {
            return Err(invalid(
                "pomodoro.rest_duration",
                format!("must be between 1 and {MAX_REST_MINUTES} minutes"),
            ));
        }
        Ok(())
    }

    /// Prioritizer policy derived from these settings. The reference
    /// instant is left for the caller to supply.
    pub fn filter_config(&self) -> FilterConfig {
        let view = &self.current_view;
        FilterConfig {
            max_anytime_tasks: Some(view.max_anytime_tasks),
            evening_start_hour: Some(view.evening_start_hour),
            old_task_days_threshold: Some(view.old_task_days_threshold),
            prioritize_short_tasks: Some(view.prioritize_short_tasks),
            current_time: None,
        }
    }
}

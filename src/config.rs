use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use dinnerplan_mealplan::{DEFAULT_RETRY_FACTOR, MAX_RETRY_FACTOR, WeekPlan};
use dinnerplan_shared::Day;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub plan: WeekPlan,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    #[serde(default = "default_catalog_path")]
    pub catalog: PathBuf,
    #[serde(default = "default_state_path")]
    pub state: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog_path(),
            state: default_state_path(),
        }
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("dinners.json")
}

fn default_state_path() -> PathBuf {
    PathBuf::from("dinner_state.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct CalendarConfig {
    /// Day the rotation week starts on
    #[serde(default = "default_week_starts_on")]
    pub week_starts_on: Day,
    /// IANA zone name; the local offset is used when unset
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            week_starts_on: default_week_starts_on(),
            timezone: None,
        }
    }
}

fn default_week_starts_on() -> Day {
    Day::Sunday
}

#[derive(Debug, Deserialize, Clone)]
pub struct SelectionConfig {
    #[serde(default = "default_retry_factor")]
    pub retry_factor: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            retry_factor: default_retry_factor(),
        }
    }
}

fn default_retry_factor() -> usize {
    DEFAULT_RETRY_FACTOR
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DINNERPLAN__PATHS__STATE, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let explicit = config_path.or_else(|| env::var("CONFIG_PATH").ok());

        match explicit {
            // A file the user asked for must exist
            Some(path) => builder = builder.add_source(File::with_name(&path)),
            None => {
                let fallback = "config/default.toml";
                if std::path::Path::new(fallback).exists() {
                    builder = builder.add_source(File::with_name(fallback));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("DINNERPLAN")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        self.plan.validate().map_err(|e| e.to_string())?;

        if !(1..=MAX_RETRY_FACTOR).contains(&self.selection.retry_factor) {
            return Err(format!(
                "Selection retry_factor must be between 1 and {MAX_RETRY_FACTOR}"
            ));
        }
        if self.paths.state.as_os_str().is_empty() {
            return Err("State path must not be empty".to_string());
        }
        if let Some(tz) = &self.calendar.timezone {
            if time_tz::timezones::get_by_name(tz).is_none() {
                return Err(format!("Unknown timezone: {tz}"));
            }
        }
        Ok(())
    }
}

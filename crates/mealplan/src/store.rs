use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dinnerplan_shared::{Error, Result};
use time::Date;

use crate::RotationState;

/// Where the rotation state lives between runs.
///
/// Loading happens once at startup and saving once after a successful
/// selection. No locking is done: two concurrent runs against the same
/// store can lose one run's selections.
pub trait RotationStore {
    /// Load the persisted rotation, or an empty one anchored at `boundary`
    /// when nothing has been persisted yet.
    ///
    /// A record that exists but cannot be read or parsed is an error, never
    /// a silent reset.
    fn load(&self, boundary: Date) -> Result<RotationState>;

    /// Replace the persisted rotation with `state`.
    fn save(&mut self, state: &RotationState) -> Result<()>;
}

/// JSON file store. Saves are written to a sibling temp file and renamed
/// over the target, so a failed save leaves the previous record intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl RotationStore for JsonFileStore {
    fn load(&self, boundary: Date) -> Result<RotationState> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::info!(
                    path = %self.path.display(),
                    week_start = %boundary,
                    "no rotation state found, starting fresh"
                );
                return Ok(RotationState::new(boundary));
            }
            Err(err) => return Err(Error::persistence(self.path.display(), err)),
        };

        let state = RotationState::from_json(&json)
            .map_err(|err| Error::persistence(self.path.display(), err))?;

        tracing::debug!(
            path = %self.path.display(),
            week_start = %state.week_start,
            current = state.current_week.len(),
            previous = state.previous_week.len(),
            "rotation state loaded"
        );

        Ok(state)
    }

    fn save(&mut self, state: &RotationState) -> Result<()> {
        let json = state
            .to_json()
            .map_err(|err| Error::persistence(self.path.display(), err))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|err| Error::persistence(parent.display(), err))?;
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, json).map_err(|err| Error::persistence(temp_path.display(), err))?;
        fs::rename(&temp_path, &self.path)
            .map_err(|err| Error::persistence(self.path.display(), err))?;

        tracing::info!(
            path = %self.path.display(),
            current = state.current_week.len(),
            previous = state.previous_week.len(),
            "rotation state saved"
        );

        Ok(())
    }
}

/// In-memory store holding the serialized record, for running the planner
/// without touching the filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: Option<String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already persisted state.
    pub fn with_state(state: &RotationState) -> Result<Self> {
        let record = state
            .to_json()
            .map_err(|err| Error::persistence("memory", err))?;

        Ok(Self {
            record: Some(record),
            saves: 0,
        })
    }

    /// Start from a raw record, which may be malformed.
    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            record: Some(record.into()),
            saves: 0,
        }
    }

    pub fn record(&self) -> Option<&str> {
        self.record.as_deref()
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl RotationStore for MemoryStore {
    fn load(&self, boundary: Date) -> Result<RotationState> {
        match &self.record {
            Some(record) => {
                RotationState::from_json(record).map_err(|err| Error::persistence("memory", err))
            }
            None => Ok(RotationState::new(boundary)),
        }
    }

    fn save(&mut self, state: &RotationState) -> Result<()> {
        self.record = Some(
            state
                .to_json()
                .map_err(|err| Error::persistence("memory", err))?,
        );
        self.saves += 1;

        Ok(())
    }
}

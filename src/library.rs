//! Saved results and scheduled series.
//!
//! The whole library is one immutable-by-convention snapshot ([`Library`])
//! that is loaded from and written back to a [`LibraryStore`]. Commands never
//! hold it in a global; the store is handed to them by the shell.

use crate::calc::CalculationResult;
use crate::error::AppError;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

pub const LIBRARY_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    pub version: String,
    #[serde(default)]
    pub saved_results: Vec<SavedResult>,
    #[serde(default)]
    pub scheduled: Vec<ScheduledAnime>,
}

impl Default for Library {
    fn default() -> Self {
        Self {
            version: LIBRARY_VERSION.to_string(),
            saved_results: Vec::new(),
            scheduled: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedResult {
    pub anime_name: String,
    #[serde(flatten)]
    pub result: CalculationResult,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledAnime {
    pub id: String,
    pub name: String,
    pub episodes: u64,
    pub duration_per_episode: u64,
    pub total_minutes: u64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ScheduledAnime {
    /// Whether `date` (in `tz`) falls between the start and end dates, inclusive.
    pub fn covers<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> bool {
        let first = self.start_date.with_timezone(tz).date_naive();
        let last = self.end_date.with_timezone(tz).date_naive();
        first <= date && date <= last
    }
}

fn require_name(name: &str, action: &'static str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::MissingName(action).into());
    }
    Ok(trimmed.to_string())
}

/// Format a save date the way the saved list has always shown it (`d/m/yyyy`).
pub fn format_saved_on(date: NaiveDate) -> String {
    date.format("%-d/%-m/%Y").to_string()
}

impl Library {
    pub fn save_result(
        &mut self,
        result: &CalculationResult,
        anime_name: &str,
        saved_on: NaiveDate,
    ) -> Result<&SavedResult> {
        let anime_name = require_name(anime_name, "save a result")?;

        let mut result = result.clone();
        result.saved_at = Some(format_saved_on(saved_on));
        self.saved_results.push(SavedResult { anime_name, result });

        Ok(&self.saved_results[self.saved_results.len() - 1])
    }

    pub fn schedule(
        &mut self,
        result: &CalculationResult,
        name: &str,
        start: DateTime<Utc>,
        image_url: Option<String>,
    ) -> Result<&ScheduledAnime> {
        let name = require_name(name, "schedule")?;

        let span = i64::try_from(result.total_minutes)
            .ok()
            .and_then(TimeDelta::try_minutes)
            .ok_or_else(|| AppError::InvalidInput("total minutes out of range".to_string()))?;
        let end_date = start
            .checked_add_signed(span)
            .ok_or_else(|| AppError::InvalidInput("end date out of range".to_string()))?;

        self.scheduled.push(ScheduledAnime {
            id: Uuid::new_v4().to_string(),
            name,
            episodes: result.episodes,
            duration_per_episode: result.duration_per_episode,
            total_minutes: result.total_minutes,
            start_date: start,
            end_date,
            image_url,
        });

        Ok(&self.scheduled[self.scheduled.len() - 1])
    }

    pub fn unschedule(&mut self, id: &str) -> Result<ScheduledAnime> {
        let index = self
            .scheduled
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        Ok(self.scheduled.remove(index))
    }

    pub fn scheduled_on<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> Vec<&ScheduledAnime> {
        self.scheduled
            .iter()
            .filter(|item| item.covers(date, tz))
            .collect()
    }
}

/// Where library snapshots live.
pub trait LibraryStore {
    fn load(&self) -> Result<Library>;

    fn save(&self, library: &Library) -> Result<()>;

    /// Load, mutate, and save only if `f` succeeds.
    fn update<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Library) -> Result<R>,
        Self: Sized,
    {
        let mut library = self.load()?;
        let result = f(&mut library)?;
        self.save(&library)?;
        Ok(result)
    }
}

/// JSON file guarded by an exclusive lock file.
pub struct FileStore {
    data_path: PathBuf,
    lock_path: PathBuf,
}

impl FileStore {
    pub fn new(data_path: PathBuf, lock_path: PathBuf) -> Self {
        Self {
            data_path,
            lock_path,
        }
    }

    /// `library.json` and `library.lock` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("library.json"), dir.join("library.lock"))
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    fn read(path: &Path) -> Result<Library> {
        if !path.exists() {
            return Ok(Library::default());
        }
        let content = fs::read_to_string(path).context("Failed to read library file")?;

        if content.trim().is_empty() {
            return Ok(Library::default());
        }

        serde_json::from_str(&content).context("Failed to parse library JSON")
    }

    fn write(path: &Path, library: &Library) -> Result<()> {
        let content =
            serde_json::to_string_pretty(library).context("Failed to serialize library")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // temp file + rename keeps a crash from leaving half a file behind
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }
}

impl LibraryStore for FileStore {
    fn load(&self) -> Result<Library> {
        Self::read(&self.data_path)
    }

    fn save(&self, library: &Library) -> Result<()> {
        Self::write(&self.data_path, library)
    }

    fn update<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Library) -> Result<R>,
    {
        if let Some(parent) = self.lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.lock_path)
            .context("Failed to open lock file")?;

        file.lock_exclusive().context("Failed to acquire lock")?;

        let mut library = Self::read(&self.data_path)?;
        let result = f(&mut library);

        if result.is_ok() {
            Self::write(&self.data_path, &library)?;
        }

        file.unlock().context("Failed to unlock")?;

        tracing::debug!(path = %self.data_path.display(), ok = result.is_ok(), "library updated");
        result
    }
}

/// In-process store, mostly for tests and embedding.
#[derive(Default)]
pub struct MemoryStore {
    library: Mutex<Library>,
}

impl MemoryStore {
    pub fn new(library: Library) -> Self {
        Self {
            library: Mutex::new(library),
        }
    }
}

impl LibraryStore for MemoryStore {
    fn load(&self) -> Result<Library> {
        let guard = self
            .library
            .lock()
            .map_err(|_| anyhow::anyhow!("Library lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, library: &Library) -> Result<()> {
        let mut guard = self
            .library
            .lock()
            .map_err(|_| anyhow::anyhow!("Library lock poisoned"))?;
        *guard = library.clone();
        Ok(())
    }

    fn update<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Library) -> Result<R>,
    {
        let mut guard = self
            .library
            .lock()
            .map_err(|_| anyhow::anyhow!("Library lock poisoned"))?;
        let mut working = guard.clone();
        let result = f(&mut working)?;
        *guard = working;
        Ok(result)
    }
}

use crate::OutputFormat;
use crate::calc::compute_at;
use crate::commands::calc::INVALID_INPUT_MESSAGE;
use crate::commands::emit;
use crate::config::Config;
use crate::error::AppError;
use crate::library::{LibraryStore, SavedResult, ScheduledAnime};
use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};

pub fn saved<S: LibraryStore>(store: &S, format: OutputFormat) -> Result<Vec<SavedResult>> {
    let results = store.load()?.saved_results;

    emit(format, &results, |results| {
        if results.is_empty() {
            println!("No saved results.");
            return;
        }
        for saved in results {
            let r = &saved.result;
            println!("Anime: {}", saved.anime_name);
            println!("  Total: {}d, {}h, {}m", r.days, r.hours, r.minutes);
            println!(
                "  Episodes: {}, Duration: {} min",
                r.episodes, r.duration_per_episode
            );
            println!("  Saved on: {}", r.saved_at.as_deref().unwrap_or("N/A"));
        }
    })?;

    Ok(results)
}

pub fn scheduled<S: LibraryStore>(store: &S, format: OutputFormat) -> Result<Vec<ScheduledAnime>> {
    let items = store.load()?.scheduled;

    emit(format, &items, |items| {
        if items.is_empty() {
            println!("Nothing scheduled.");
            return;
        }
        println!("{:<36}  {:<30} {:<17} {:<17}", "ID", "Name", "Start", "End");
        println!("{}", "-".repeat(104));
        for item in items {
            print_item(item);
        }
    })?;

    Ok(items)
}

pub(crate) fn print_item(item: &ScheduledAnime) {
    let name = if item.name.chars().count() > 30 {
        format!("{}...", item.name.chars().take(27).collect::<String>())
    } else {
        item.name.clone()
    };
    println!(
        "{:<36}  {:<30} {:<17} {:<17}",
        item.id,
        name,
        item.start_date
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M"),
        item.end_date.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
    );
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleRequest {
    pub name: String,
    pub episodes: i64,
    pub duration: i64,
    /// RFC 3339; now when absent
    pub start: Option<String>,
    pub image_url: Option<String>,
}

pub fn schedule<S: LibraryStore>(
    config: &Config,
    store: &S,
    request: &ScheduleRequest,
    format: OutputFormat,
) -> Result<ScheduledAnime> {
    let start = match &request.start {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .context("Invalid start time format. Use RFC 3339: 2026-01-08T20:00:00+01:00")?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let locale = config.display.locale()?;
    let result = compute_at(
        request.episodes,
        request.duration,
        start.with_timezone(&Local),
        locale,
    )
    .ok_or_else(|| AppError::InvalidInput(INVALID_INPUT_MESSAGE.to_string()))?;

    let item = store.update(|library| {
        Ok(library
            .schedule(&result, &request.name, start, request.image_url.clone())?
            .clone())
    })?;

    tracing::info!(id = %item.id, name = %item.name, "scheduled");

    emit(format, &item, |item| {
        println!("✓ \"{}\" scheduled", item.name);
        println!("  ID: {}", item.id);
        println!("  Start: {}", item.start_date.with_timezone(&Local));
        println!("  End:   {}", item.end_date.with_timezone(&Local));
    })?;

    Ok(item)
}

pub fn unschedule<S: LibraryStore>(
    store: &S,
    id: &str,
    format: OutputFormat,
) -> Result<ScheduledAnime> {
    let removed = store.update(|library| library.unschedule(id))?;

    tracing::info!(id = %removed.id, "unscheduled");

    emit(format, &removed, |item| {
        println!("✓ Scheduled anime \"{}\" deleted", item.name);
    })?;

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::MemoryStore;

    #[test]
    fn test_schedule_then_unschedule() {
        let config = Config::default();
        let store = MemoryStore::default();
        let request = ScheduleRequest {
            name: "Monster".to_string(),
            episodes: 74,
            duration: 24,
            start: Some("2026-10-17T20:00:00+02:00".to_string()),
            image_url: None,
        };

        let item = schedule(&config, &store, &request, OutputFormat::Json).unwrap();
        assert_eq!(item.total_minutes, 74 * 24);
        assert_eq!(item.start_date.to_rfc3339(), "2026-10-17T18:00:00+00:00");

        unschedule(&store, &item.id, OutputFormat::Json).unwrap();
        assert!(store.load().unwrap().scheduled.is_empty());
    }

    #[test]
    fn test_schedule_rejects_bad_start() {
        let config = Config::default();
        let store = MemoryStore::default();
        let request = ScheduleRequest {
            name: "Monster".to_string(),
            episodes: 74,
            duration: 24,
            start: Some("tomorrow".to_string()),
            image_url: None,
        };

        assert!(schedule(&config, &store, &request, OutputFormat::Json).is_err());
    }

    #[test]
    fn test_schedule_rejects_zero_episodes() {
        let config = Config::default();
        let store = MemoryStore::default();
        let request = ScheduleRequest {
            name: "Monster".to_string(),
            episodes: 0,
            duration: 24,
            start: None,
            image_url: None,
        };

        assert!(schedule(&config, &store, &request, OutputFormat::Json).is_err());
        assert!(store.load().unwrap().scheduled.is_empty());
    }
}

use crate::OutputFormat;
use crate::calc::{CalculationResult, compute_at, parse_count};
use crate::commands::emit;
use crate::config::Config;
use crate::error::AppError;
use crate::library::{LibraryStore, SavedResult, ScheduledAnime};
use anyhow::Result;
use chrono::Local;
use serde::Serialize;

pub const INVALID_INPUT_MESSAGE: &str =
    "Please enter valid values (greater than zero) for episodes and duration.";

/// What the user typed into the calculator form.
#[derive(Debug, Clone, Default)]
pub struct CalcRequest {
    pub episodes: String,
    pub duration: String,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub save: bool,
    pub schedule: bool,
}

#[derive(Debug, Serialize)]
pub struct CalcOutput {
    pub result: CalculationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<SavedResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled: Option<ScheduledAnime>,
}

/// Compute from raw form values; non-numeric text counts as invalid input.
pub fn calculate(config: &Config, episodes: &str, duration: &str) -> Result<CalculationResult> {
    let locale = config.display.locale()?;
    parse_count(episodes)
        .zip(parse_count(duration))
        .and_then(|(e, d)| compute_at(e, d, Local::now(), locale))
        .ok_or_else(|| AppError::InvalidInput(INVALID_INPUT_MESSAGE.to_string()).into())
}

pub fn run<S: LibraryStore>(
    config: &Config,
    store: &S,
    request: &CalcRequest,
    format: OutputFormat,
) -> Result<CalcOutput> {
    let missing_name = request
        .name
        .as_deref()
        .map(str::trim)
        .is_none_or(str::is_empty);
    if (request.save || request.schedule) && missing_name {
        let action = if request.save {
            "save a result"
        } else {
            "schedule"
        };
        return Err(AppError::MissingName(action).into());
    }

    let result = calculate(config, &request.episodes, &request.duration)?;
    let name = request.name.clone().unwrap_or_default();

    let (saved, scheduled) = if request.save || request.schedule {
        let today = Local::now().date_naive();
        store.update(|library| {
            let saved = if request.save {
                Some(library.save_result(&result, &name, today)?.clone())
            } else {
                None
            };
            let scheduled = if request.schedule {
                let image_url = request.image_url.clone();
                Some(
                    library
                        .schedule(&result, &name, result.started_at, image_url)?
                        .clone(),
                )
            } else {
                None
            };
            Ok((saved, scheduled))
        })?
    } else {
        (None, None)
    };

    let output = CalcOutput {
        result,
        saved,
        scheduled,
    };

    emit(format, &output, |out| {
        print_result(&out.result);
        if out.saved.is_some() {
            println!("✓ Result saved.");
        }
        if let Some(item) = &out.scheduled {
            println!("✓ \"{}\" scheduled (ID: {})", item.name, item.id);
        }
    })?;

    Ok(output)
}

pub fn print_result(result: &CalculationResult) {
    println!(
        "To watch the whole series you will need {}.",
        result.summary()
    );
    println!("Start: {} ({})", result.start_time, result.start_date);
    println!("End:   {} ({})", result.end_time, result.end_date);
    println!("Episodes: {}", result.episodes);
    println!(
        "Duration per episode: {} minutes",
        result.duration_per_episode
    );
}

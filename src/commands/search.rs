use crate::OutputFormat;
use crate::calc::compute_at;
use crate::catalog::{FormInput, JikanClient, Suggestion, SuggestionSearch, SuggestionState};
use crate::commands::calc::{INVALID_INPUT_MESSAGE, print_result};
use crate::commands::emit;
use crate::config::Config;
use crate::error::AppError;
use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Serialize)]
pub struct PickOutput {
    pub suggestion: Suggestion,
    pub result: crate::calc::CalculationResult,
}

/// One-shot catalog search.
pub async fn search(
    config: &Config,
    query: &str,
    format: OutputFormat,
) -> Result<Vec<Suggestion>> {
    let client = JikanClient::new(&config.catalog)?;
    let hits = client.search(query).await?;

    emit(format, &hits, |hits| print_hits(hits))?;

    Ok(hits)
}

/// Search, take the `pick`th hit (1-based) and compute its viewing time.
/// `duration` overrides the default runtime applied from the hit.
pub async fn pick(
    config: &Config,
    query: &str,
    pick: usize,
    duration: Option<i64>,
    format: OutputFormat,
) -> Result<PickOutput> {
    let client = JikanClient::new(&config.catalog)?;
    let hits = client.search(query).await?;

    let suggestion = pick
        .checked_sub(1)
        .and_then(|index| hits.get(index))
        .cloned()
        .with_context(|| format!("No result #{} for '{}' ({} found)", pick, query, hits.len()))?;

    let mut form = FormInput::default();
    suggestion.apply_to_form(&mut form);
    if let Some(minutes) = duration {
        form.duration_per_episode = minutes;
    }

    let locale = config.display.locale()?;
    let result = compute_at(
        form.episodes,
        form.duration_per_episode,
        Local::now(),
        locale,
    )
    .ok_or_else(|| AppError::InvalidInput(INVALID_INPUT_MESSAGE.to_string()))?;

    let output = PickOutput { suggestion, result };
    emit(format, &output, |out| {
        println!("{}", out.suggestion.title);
        print_result(&out.result);
    })?;

    Ok(output)
}

/// Live autocomplete: every stdin line is the current content of the name
/// field. Suggestions are printed as they settle; stale lookups never are.
/// End of input waits for the last lookup; Ctrl-C drops it.
pub async fn suggest(config: &Config, format: OutputFormat) -> Result<()> {
    let client = JikanClient::new(&config.catalog)?;
    let mut search = SuggestionSearch::new(
        client,
        Duration::from_millis(config.catalog.debounce_ms),
        config.catalog.min_query_len,
    );
    let mut updates = search.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            _ = &mut interrupt => {
                search.cancel();
                return Ok(());
            }
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    Some(text) => search.submit(&text),
                    None => break,
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let state = updates.borrow_and_update().clone();
                print_state(&state, format)?;
            }
        }
    }

    search.settle().await;
    if updates.has_changed().unwrap_or(false) {
        let state = updates.borrow_and_update().clone();
        print_state(&state, format)?;
    }

    Ok(())
}

fn print_state(state: &SuggestionState, format: OutputFormat) -> Result<()> {
    if let OutputFormat::Json = format {
        let line = serde_json::to_string(state).context("Failed to serialize output")?;
        println!("{}", line);
        return Ok(());
    }

    match state {
        SuggestionState::Idle => {}
        SuggestionState::Loading { query } => println!("Loading suggestions for '{}'...", query),
        SuggestionState::Ready { hits, .. } => print_hits(hits),
        SuggestionState::Failed { query, message } => {
            eprintln!("✗ Suggestions for '{}' failed: {}", query, message)
        }
    }
    Ok(())
}

fn print_hits(hits: &[Suggestion]) {
    if hits.is_empty() {
        println!("No suggestions.");
        return;
    }
    println!("{:<4} {:<8} {:<50} {:<8}", "#", "MAL ID", "Title", "Episodes");
    println!("{}", "-".repeat(72));
    for (index, hit) in hits.iter().enumerate() {
        let episodes = hit
            .episodes
            .map(|e| e.to_string())
            .unwrap_or_else(|| "?".to_string());
        println!(
            "{:<4} {:<8} {:<50} {:<8}",
            index + 1,
            hit.mal_id,
            hit.title,
            episodes
        );
    }
}

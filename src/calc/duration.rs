use crate::calc::models::CalculationResult;
use anyhow::Result;
use chrono::{DateTime, Local, Locale, TimeDelta, TimeZone, Utc};
use std::fmt::Display;

pub const MINUTES_PER_HOUR: u64 = 60;
pub const MINUTES_PER_DAY: u64 = 24 * MINUTES_PER_HOUR;

/// Locale used when none is configured.
pub const DEFAULT_LOCALE: Locale = Locale::es_ES;

/// Canonical days/hours/minutes split of a minute count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakdown {
    pub days: u64,
    pub hours: u32,
    pub minutes: u32,
}

impl Breakdown {
    pub fn from_minutes(total: u64) -> Self {
        let days = total / MINUTES_PER_DAY;
        let remainder = total % MINUTES_PER_DAY;
        Self {
            days,
            hours: (remainder / MINUTES_PER_HOUR) as u32,
            minutes: (remainder % MINUTES_PER_HOUR) as u32,
        }
    }
}

pub fn format_breakdown(breakdown: Breakdown) -> String {
    format!(
        "{}d {}h {}m",
        breakdown.days, breakdown.hours, breakdown.minutes
    )
}

/// Parse a user-typed count. Anything that is not an integer yields `None`,
/// which `compute` treats the same as a non-positive value.
pub fn parse_count(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

pub fn parse_locale(name: &str) -> Result<Locale> {
    Locale::try_from(name).map_err(|_| anyhow::anyhow!("Unknown locale '{}'", name))
}

/// Compute viewing time starting now, in the local timezone.
pub fn compute(episodes: i64, duration_per_episode: i64) -> Option<CalculationResult> {
    compute_at(episodes, duration_per_episode, Local::now(), DEFAULT_LOCALE)
}

/// Compute viewing time starting at `now`.
///
/// Returns `None` when either input is not positive, when the total
/// overflows, or when the end instant falls outside the representable
/// calendar range.
pub fn compute_at<Tz>(
    episodes: i64,
    duration_per_episode: i64,
    now: DateTime<Tz>,
    locale: Locale,
) -> Option<CalculationResult>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if episodes <= 0 || duration_per_episode <= 0 {
        return None;
    }
    let episodes = u64::try_from(episodes).ok()?;
    let duration_per_episode = u64::try_from(duration_per_episode).ok()?;

    let total_minutes = episodes.checked_mul(duration_per_episode)?;
    let breakdown = Breakdown::from_minutes(total_minutes);

    let span = TimeDelta::try_minutes(i64::try_from(total_minutes).ok()?)?;
    let end = now.clone().checked_add_signed(span)?;

    Some(CalculationResult {
        episodes,
        duration_per_episode,
        total_minutes,
        days: breakdown.days,
        hours: breakdown.hours,
        minutes: breakdown.minutes,
        start_time: now.format_localized("%X", locale).to_string(),
        end_time: end.format_localized("%X", locale).to_string(),
        start_date: now.format_localized("%x", locale).to_string(),
        end_date: end.format_localized("%x", locale).to_string(),
        started_at: now.with_timezone(&Utc),
        ends_at: end.with_timezone(&Utc),
        saved_at: None,
    })
}

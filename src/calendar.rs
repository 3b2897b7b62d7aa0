use crate::library::{Library, ScheduledAnime};
use anyhow::{Context, Result};
use chrono::{Datelike, Days, Months, NaiveDate, TimeZone};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthStep {
    Prev,
    Next,
}

/// One cell of the month grid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayInfo {
    pub date: NaiveDate,
    pub day_of_month: u32,
    pub is_current_month: bool,
    pub is_today: bool,
    pub scheduled_items: Vec<ScheduledAnime>,
}

/// Move one month back or forward, rolling the year over.
pub fn shift_month(year: i32, month: u32, step: MonthStep) -> Result<(i32, u32)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .with_context(|| format!("Invalid month {}-{:02}", year, month))?;
    let shifted = match step {
        MonthStep::Prev => first.checked_sub_months(Months::new(1)),
        MonthStep::Next => first.checked_add_months(Months::new(1)),
    }
    .context("Month out of range")?;
    Ok((shifted.year(), shifted.month()))
}

/// Parse `YYYY-MM`.
pub fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", raw))?;
    Ok((date.year(), date.month()))
}

/// Whole Monday-first weeks covering `year`-`month`, each day carrying the
/// scheduled series active on it (dates taken in `tz`).
pub fn month_grid<Tz: TimeZone>(
    year: i32,
    month: u32,
    today: NaiveDate,
    library: &Library,
    tz: &Tz,
) -> Result<Vec<DayInfo>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .with_context(|| format!("Invalid month {}-{:02}", year, month))?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .context("Month out of range")?;

    let lead = u64::from(first.weekday().num_days_from_monday());
    let trail = u64::from(6 - last.weekday().num_days_from_monday());
    let grid_start = first
        .checked_sub_days(Days::new(lead))
        .context("Month out of range")?;
    let grid_end = last
        .checked_add_days(Days::new(trail))
        .context("Month out of range")?;

    let cells = grid_start
        .iter_days()
        .take_while(|date| *date <= grid_end)
        .map(|date| DayInfo {
            date,
            day_of_month: date.day(),
            is_current_month: date.month() == month && date.year() == year,
            is_today: date == today,
            scheduled_items: library
                .scheduled_on(date, tz)
                .into_iter()
                .cloned()
                .collect(),
        })
        .collect();

    Ok(cells)
}

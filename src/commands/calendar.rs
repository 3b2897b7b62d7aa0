use crate::OutputFormat;
use crate::calendar::{DayInfo, MonthStep, month_grid, parse_month, shift_month};
use crate::commands::emit;
use crate::commands::library::print_item;
use crate::library::{LibraryStore, ScheduledAnime};
use anyhow::Result;
use chrono::{Datelike, Local, Locale, NaiveDate};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub days: Vec<DayInfo>,
}

/// Render the month grid for `month` (YYYY-MM, default: current month),
/// optionally stepped back or forward once.
pub fn show<S: LibraryStore>(
    store: &S,
    month: Option<&str>,
    step: Option<MonthStep>,
    locale: Locale,
    format: OutputFormat,
) -> Result<MonthView> {
    let today = Local::now().date_naive();
    let (mut year, mut month) = match month {
        Some(raw) => parse_month(raw)?,
        None => (today.year(), today.month()),
    };
    if let Some(step) = step {
        (year, month) = shift_month(year, month, step)?;
    }

    let library = store.load()?;
    let days = month_grid(year, month, today, &library, &Local)?;
    let view = MonthView { year, month, days };

    emit(format, &view, |view| render(view, locale))?;

    Ok(view)
}

fn render(view: &MonthView, locale: Locale) {
    println!("{:^35}", month_title(view.year, view.month, locale));
    println!(" Mon  Tue  Wed  Thu  Fri  Sat  Sun");

    for week in view.days.chunks(7) {
        let line: String = week.iter().map(cell).collect();
        println!("{}", line);
    }

    println!();
    println!("Legend: [d] today, d* scheduled, (d) outside month");

    let mut in_month: Vec<&ScheduledAnime> = Vec::new();
    for day in view.days.iter().filter(|d| d.is_current_month) {
        for item in &day.scheduled_items {
            if !in_month.iter().any(|seen| seen.id == item.id) {
                in_month.push(item);
            }
        }
    }
    if !in_month.is_empty() {
        println!();
        for item in in_month {
            print_item(item);
        }
    }
}

fn month_title(year: i32, month: u32, locale: Locale) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().format_localized("%B %Y", locale).to_string())
        .unwrap_or_default()
}

fn cell(day: &DayInfo) -> String {
    let mark = if day.scheduled_items.is_empty() { " " } else { "*" };
    let label = if day.is_today {
        format!("[{}]", day.day_of_month)
    } else if !day.is_current_month {
        format!("({})", day.day_of_month)
    } else {
        day.day_of_month.to_string()
    };
    format!("{:>4}{}", label, mark)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::MemoryStore;

    #[test]
    fn test_step_from_explicit_month() {
        let store = MemoryStore::default();
        let view = show(
            &store,
            Some("2026-12"),
            Some(MonthStep::Next),
            Locale::es_ES,
            OutputFormat::Json,
        )
        .unwrap();
        assert_eq!((view.year, view.month), (2027, 1));
        assert!(view.days.iter().all(|d| d.scheduled_items.is_empty()));
    }

    #[test]
    fn test_month_title_follows_locale() {
        assert_eq!(month_title(2026, 10, Locale::es_ES), "octubre 2026");
        assert_eq!(month_title(2026, 10, Locale::en_US), "October 2026");
    }

    #[test]
    fn test_cell_markers() {
        let day = DayInfo {
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            day_of_month: 17,
            is_current_month: true,
            is_today: true,
            scheduled_items: Vec::new(),
        };
        assert_eq!(cell(&day), "[17] ");
    }
}

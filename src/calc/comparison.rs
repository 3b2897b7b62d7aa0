use crate::calc::duration::{Breakdown, format_breakdown};

/// Runtime assumed for every row of the reference table.
pub const REFERENCE_EPISODE_MINUTES: u32 = 24;
/// Largest chapter count listed in the table.
pub const MAX_CHAPTERS: u32 = 1000;
pub const PAGE_SIZE: u32 = 10;

pub fn page_count() -> u32 {
    MAX_CHAPTERS.div_ceil(PAGE_SIZE)
}

/// Clamp a requested page into `1..=page_count()`.
pub fn clamp_page(page_number: i64) -> u32 {
    page_number.clamp(1, i64::from(page_count())) as u32
}

fn entry(chapters: u32, minutes_per_episode: u32) -> String {
    let total = u64::from(chapters) * u64::from(minutes_per_episode);
    let noun = if chapters == 1 { "episode" } else { "episodes" };
    format!(
        "{} {}: {}",
        chapters,
        noun,
        format_breakdown(Breakdown::from_minutes(total))
    )
}

/// One page of the chapters-to-viewing-time table at the reference runtime.
pub fn page(page_number: i64) -> Vec<String> {
    page_with(page_number, REFERENCE_EPISODE_MINUTES)
}

pub fn page_with(page_number: i64, minutes_per_episode: u32) -> Vec<String> {
    let page = clamp_page(page_number);
    let first = (page - 1) * PAGE_SIZE + 1;
    let last = (first + PAGE_SIZE - 1).min(MAX_CHAPTERS);

    (first..=last)
        .map(|chapters| entry(chapters, minutes_per_episode))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(), 100);
    }

    #[test]
    fn test_first_page() {
        let rows = page(1);
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0], "1 episode: 0d 0h 24m");
        assert_eq!(rows[9], "10 episodes: 0d 4h 0m");
    }

    #[test]
    fn test_last_page() {
        let rows = page(100);
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[9], "1000 episodes: 16d 16h 0m");
    }

    #[test]
    fn test_out_of_range_clamps() {
        assert_eq!(page(101), page(100));
        assert_eq!(page(i64::MAX), page(100));
        assert_eq!(page(0), page(1));
        assert_eq!(page(-7), page(1));
    }

    #[test]
    fn test_custom_runtime() {
        let rows = page_with(1, 45);
        assert_eq!(rows[1], "2 episodes: 0d 1h 30m");
    }
}

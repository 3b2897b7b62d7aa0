use crate::OutputFormat;
use crate::calc::comparison::clamp_page;
use crate::calc::{page_count, page_with};
use crate::commands::emit;
use crate::config::Config;
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonPage {
    pub page: u32,
    pub page_count: u32,
    pub episode_minutes: u32,
    pub entries: Vec<String>,
}

pub fn show(config: &Config, page: i64, format: OutputFormat) -> Result<ComparisonPage> {
    let minutes = config.comparison.episode_minutes;
    let output = ComparisonPage {
        page: clamp_page(page),
        page_count: page_count(),
        episode_minutes: minutes,
        entries: page_with(page, minutes),
    };

    emit(format, &output, |out| {
        println!("Episodes vs. viewing time ({} min per episode)", out.episode_minutes);
        for entry in &out.entries {
            println!("  {}", entry);
        }
        println!("\nPage {} of {}", out.page, out.page_count);
    })?;

    Ok(output)
}

use crate::catalog::models::{AnimeSearchResponse, Suggestion};
use crate::catalog::retry::with_retry;
use crate::config::CatalogConfig;
use crate::error::AppError;
use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

pub const JIKAN_BASE_URL: &str = "https://api.jikan.moe/v4";

/// Read-only client for the Jikan anime catalog.
pub struct JikanClient {
    client: Client,
    base_url: String,
    min_query_len: usize,
    limit: u32,
    max_retries: u32,
}

impl JikanClient {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("animetime/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            min_query_len: config.min_query_len,
            limit: config.limit,
            max_retries: config.max_retries,
        })
    }

    /// Search anime by title. Queries shorter than the configured minimum
    /// return no suggestions without touching the network.
    pub async fn search(&self, query: &str) -> Result<Vec<Suggestion>> {
        let query = query.trim();
        if query.chars().count() < self.min_query_len {
            return Ok(Vec::new());
        }

        with_retry(|| self.search_once(query), self.max_retries).await
    }

    async fn search_once(&self, query: &str) -> Result<Vec<Suggestion>> {
        let url = format!("{}/anime", self.base_url);
        let limit = self.limit.to_string();

        tracing::debug!(%url, query, "searching catalog");

        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("sfw", "true"), ("limit", limit.as_str())])
            .send()
            .await
            .context("Failed to reach anime catalog")?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Catalog {
                status: status.as_u16(),
            }
            .into());
        }

        let body = response
            .json::<AnimeSearchResponse>()
            .await
            .context("Failed to parse catalog response")?;

        Ok(body.data.into_iter().map(Suggestion::from).collect())
    }
}

//! Jikan catalog lookup for the name field's autocomplete.

pub mod client;
pub mod debounce;
pub mod models;
pub mod retry;

pub use client::{JIKAN_BASE_URL, JikanClient};
pub use debounce::{SuggestionSearch, SuggestionState};
pub use models::{DEFAULT_EPISODE_MINUTES, FormInput, Suggestion};

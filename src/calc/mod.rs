//! Viewing-time arithmetic.
//!
//! Everything in here is pure: the only thing read from the environment is
//! the wall clock, and only by [`compute`]. Callers that need determinism
//! use [`compute_at`] with an explicit instant.

pub mod comparison;
pub mod duration;
pub mod models;

pub use comparison::{PAGE_SIZE, page, page_count, page_with};
pub use duration::{
    Breakdown, DEFAULT_LOCALE, compute, compute_at, format_breakdown, parse_count, parse_locale,
};
pub use models::CalculationResult;

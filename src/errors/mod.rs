//! Centralized error handling for the M3U filter
//!
//! # Error Categories
//!
//! - **Parse Errors**: reserved for structurally impossible playlist input
//! - **Pattern Errors**: invalid `name_matches` patterns in a filter spec
//! - **Missing Source Errors**: playlist or spec locations that could not be read
//! - **Configuration Errors**: invalid configuration files

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for pattern compilation Results
pub type PatternResult<T> = Result<T, PatternError>;

//! Stratus Types
//!
//! Time primitives shared by every stratus view: timestamps, hour-based
//! frequencies, and the time-grid utilities that build and merge calendars.

#![deny(clippy::all)]

pub mod calendar;
pub mod error;
pub mod frequency;

// Re-export main types for convenience
pub use calendar::{
    Timestamp, advance, format_timestamp, make_dates, merge_span, parse_timestamp, round_datetime,
    window_code,
};
pub use error::CoreError;
pub use frequency::Frequency;

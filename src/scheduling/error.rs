//! Scheduling failure taxonomy. Adapters map their own errors into these
//! so callers can decide between rejecting a request and failing open.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    /// The language model produced nothing usable for the given text.
    #[error("Could not extract meeting details: {0}")]
    Extraction(String),

    /// The calendar backend was unreachable or answered with an error.
    #[error("Calendar request failed: {0}")]
    Transport(String),

    /// Extracted details are malformed. Raised before any calendar call.
    #[error("Invalid meeting details: {0}")]
    Validation(String),
}

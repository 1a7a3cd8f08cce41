//! Error types for scheduling-engine operations.
//!
//! Business-rule rejections (bad time range, unknown participant, working-hours
//! violation, booking conflict) are not errors; they are reported through
//! [`crate::engine::ScheduleOutcome`]. Only store-level failures end up here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    #[error("Invalid meeting: {0}")]
    InvalidMeeting(String),
}

pub type Result<T> = std::result::Result<T, SchedulingError>;

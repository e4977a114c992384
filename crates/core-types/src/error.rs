use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid calendar year: {0}")]
    InvalidYear(i32),

    #[error("No authentication token found")]
    MissingToken,

    #[error("User data not found. Please log in again.")]
    MissingUser,

    #[error("Organizer ID not found in user data")]
    MissingOrganizerId,

    #[error("Invalid session data: {0}")]
    InvalidSession(String),
}

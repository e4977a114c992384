use core_types::{CoreError, Section};
use thiserror::Error;

/// Why an aggregation failed. The dashboard shows every kind the same way:
/// one message next to a retry action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// No usable session: missing token or organizer id. No request was sent.
    #[error("{0}")]
    Auth(String),

    /// The request for a section did not produce an envelope (transport
    /// failure, non-2xx status, unparseable body).
    #[error("Failed to fetch {section} analytics: {message}")]
    Network { section: Section, message: String },

    /// The backend answered for a section but reported a failure, or sent no data.
    #[error("{section} analytics request failed: {message}")]
    Api { section: Section, message: String },
}

impl AnalyticsError {
    /// The section whose request failed, when the failure is tied to one.
    pub fn section(&self) -> Option<Section> {
        match self {
            AnalyticsError::Auth(_) => None,
            AnalyticsError::Network { section, .. } | AnalyticsError::Api { section, .. } => {
                Some(*section)
            }
        }
    }
}

impl From<CoreError> for AnalyticsError {
    fn from(err: CoreError) -> Self {
        AnalyticsError::Auth(err.to_string())
    }
}

pub mod enums;
pub mod error;
pub mod session;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{LoadState, Section};
pub use error::CoreError;
pub use session::{Session, SessionUser};
pub use structs::{AnalyticsSection, AnalyticsViewModel, DateRange, QUERY_DATE_FORMAT};

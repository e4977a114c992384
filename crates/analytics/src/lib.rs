//! # Organizer Analytics
//!
//! This crate turns three backend responses (dashboard summary, events
//! analytics, revenue analytics) into one consistent view model for the
//! organizer dashboard.
//!
//! ## Architectural Principles
//!
//! - **All or nothing:** the `AnalyticsAggregator` replaces the whole
//!   `AnalyticsViewModel` or nothing. A failure in any section leaves the
//!   previous model in place and reports a single message.
//! - **Last request wins:** each refresh is tagged with a sequence number and
//!   only the latest one may commit, whatever order the responses arrive in.
//! - **Injected collaborators:** the backend is reached through the
//!   `api_client::ApiClient` trait and credentials come from an explicit
//!   `Session`, so everything here runs against mocks in tests.
//!
//! ## Public API
//!
//! - `AnalyticsAggregator`: the refresh/retry state machine.
//! - `DashboardState`, `RefreshOutcome`: what callers read back.
//! - `report`: lenient typed readers over the sections plus currency/date formatting.
//! - `AnalyticsError`: the failure taxonomy surfaced as one message.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{AnalyticsAggregator, DashboardState, RefreshOutcome};
pub use error::AnalyticsError;
pub use report::{EventsSummary, OverviewSummary, RevenueSummary};

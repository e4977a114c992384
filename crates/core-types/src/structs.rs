use crate::enums::Section;
use crate::error::CoreError;
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The wire format for dates in analytics queries.
pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive range of calendar days. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// January 1st through December 31st of the given year.
    pub fn calendar_year(year: i32) -> Result<Self, CoreError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(CoreError::InvalidYear(year))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(CoreError::InvalidYear(year))?;
        Ok(Self { start, end })
    }

    /// The calendar year containing today's local date. This is the range a
    /// freshly opened dashboard shows.
    pub fn current_year() -> Self {
        let today = Local::now().date_naive();
        // Any date chrono can represent has a representable Jan 1 and Dec 31.
        Self::calendar_year(today.year()).unwrap_or(Self {
            start: today,
            end: today,
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns a copy with a new start date, keeping the end.
    pub fn with_start(&self, start: NaiveDate) -> Result<Self, CoreError> {
        Self::new(start, self.end)
    }

    /// Returns a copy with a new end date, keeping the start.
    pub fn with_end(&self, end: NaiveDate) -> Result<Self, CoreError> {
        Self::new(self.start, end)
    }

    pub fn start_param(&self) -> String {
        self.start.format(QUERY_DATE_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(QUERY_DATE_FORMAT).to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start_param(), self.end_param())
    }
}

/// One backend-defined analytics payload. Its shape belongs to the backend;
/// only presence is checked when it is received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalyticsSection(Value);

impl AnalyticsSection {
    pub fn new(payload: Value) -> Self {
        Self(payload)
    }

    /// An empty JSON object, the content of every section before the first load.
    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn payload(&self) -> &Value {
        &self.0
    }

    pub fn into_payload(self) -> Value {
        self.0
    }
}

impl Default for AnalyticsSection {
    fn default() -> Self {
        Self::empty()
    }
}

/// The merged, presentation-ready aggregate of the three analytics sections.
/// It is only ever replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsViewModel {
    pub overview: AnalyticsSection,
    pub events: AnalyticsSection,
    pub revenue: AnalyticsSection,
}

impl AnalyticsViewModel {
    pub fn section(&self, section: Section) -> &AnalyticsSection {
        match section {
            Section::Overview => &self.overview,
            Section::Events => &self.events,
            Section::Revenue => &self.revenue,
        }
    }
}

use crate::error::ApiError;
use core_types::{DateRange, Section};
use serde::Serialize;

/// Query parameters shared by the three organizer analytics endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DateQuery {
    start_date: String,
    end_date: String,
}

fn resource(section: Section) -> &'static str {
    match section {
        Section::Overview => "dashboard",
        Section::Events => "analytics/events",
        Section::Revenue => "analytics/revenue",
    }
}

/// Builds the request path (with query string) for one analytics section.
///
/// `/api/organizers/{id}/dashboard?startDate=YYYY-MM-DD&endDate=YYYY-MM-DD`
/// and likewise for `analytics/events` and `analytics/revenue`.
pub fn section_path(section: Section, organizer_id: &str, range: &DateRange) -> Result<String, ApiError> {
    let organizer_id = organizer_id.trim();
    if organizer_id.is_empty() {
        return Err(ApiError::InvalidData("organizer id is empty".to_string()));
    }
    if organizer_id.contains(['/', '?', '#', '%']) {
        return Err(ApiError::InvalidData(format!(
            "organizer id '{}' is not a single path segment",
            organizer_id
        )));
    }

    let query = serde_qs::to_string(&DateQuery {
        start_date: range.start_param(),
        end_date: range.end_param(),
    })
    .map_err(|e| ApiError::Query(e.to_string()))?;

    Ok(format!(
        "/api/organizers/{}/{}?{}",
        organizer_id,
        resource(section),
        query
    ))
}

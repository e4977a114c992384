use crate::error::AnalyticsError;
use api_client::{section_path, ApiClient};
use core_types::{
    AnalyticsSection, AnalyticsViewModel, DateRange, LoadState, Section, Session,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// What the dashboard shows: the last committed model, the load state, and
/// the most recently requested date range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub model: AnalyticsViewModel,
    pub load_state: LoadState,
    pub date_range: Option<DateRange>,
}

impl DashboardState {
    /// The model to render, which is only the case once it is loaded. A failed
    /// or in-flight aggregation shows an error panel or a spinner instead.
    pub fn visible_model(&self) -> Option<&AnalyticsViewModel> {
        match self.load_state {
            LoadState::Loaded => Some(&self.model),
            _ => None,
        }
    }
}

/// How a `refresh` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// This call's result is now the dashboard's model.
    Committed,
    /// A newer call was issued before this one resolved; its result was dropped.
    Superseded,
}

/// Produces a consistent `AnalyticsViewModel` for an organizer and a date range.
///
/// Every call to `refresh` takes a sequence number from a monotonic counter.
/// Results are only applied if their number is still the latest one issued,
/// so a slow, older request can never overwrite a newer one. The state lock
/// is taken only before and after the network join, never across it.
pub struct AnalyticsAggregator {
    client: Arc<dyn ApiClient>,
    session: Session,
    latest: AtomicU64,
    state: Mutex<DashboardState>,
}

impl AnalyticsAggregator {
    pub fn new(client: Arc<dyn ApiClient>, session: Session) -> Self {
        Self {
            client,
            session,
            latest: AtomicU64::new(0),
            state: Mutex::new(DashboardState::default()),
        }
    }

    /// A copy of the current dashboard state.
    pub async fn snapshot(&self) -> DashboardState {
        self.state.lock().await.clone()
    }

    /// First render: loads the current calendar year for the signed-in organizer.
    pub async fn open(&self) -> Result<RefreshOutcome, AnalyticsError> {
        self.on_date_range_changed(DateRange::current_year()).await
    }

    /// Handler for the date range picker. Every change triggers a new aggregation.
    pub async fn on_date_range_changed(
        &self,
        date_range: DateRange,
    ) -> Result<RefreshOutcome, AnalyticsError> {
        // Token first, then user, then id: a signed-out session reports the missing token.
        let organizer_id = match self.session.token().and_then(|_| self.session.organizer_id()) {
            Ok(id) => id.to_string(),
            Err(e) => {
                let seq = self.begin(date_range).await;
                return self.finish(seq, Err(e.into())).await;
            }
        };
        self.refresh(&organizer_id, date_range).await
    }

    /// Re-runs the last requested aggregation from scratch.
    pub async fn retry(&self) -> Result<RefreshOutcome, AnalyticsError> {
        let last = self.state.lock().await.date_range;
        self.on_date_range_changed(last.unwrap_or_else(DateRange::current_year))
            .await
    }

    /// Fetches the three analytics sections concurrently and, if all of them
    /// succeed and no newer call has been issued meanwhile, replaces the model
    /// as a whole.
    ///
    /// On failure the model is left untouched and the load state carries the
    /// error message. A superseded call returns `Ok(Superseded)` whether it
    /// succeeded or not, since its result is discarded either way.
    pub async fn refresh(
        &self,
        organizer_id: &str,
        date_range: DateRange,
    ) -> Result<RefreshOutcome, AnalyticsError> {
        let seq = self.begin(date_range).await;

        let token = match self.session.token() {
            Ok(token) => token,
            Err(e) => return self.finish(seq, Err(e.into())).await,
        };
        let organizer_id = organizer_id.trim();
        if organizer_id.is_empty() {
            let err = AnalyticsError::Auth(core_types::CoreError::MissingOrganizerId.to_string());
            return self.finish(seq, Err(err)).await;
        }

        tracing::info!(seq, organizer_id, range = %date_range, "Refreshing analytics.");
        let result = self.fetch_all(organizer_id, &date_range, token).await;
        self.finish(seq, result).await
    }

    /// Issues a new sequence number and moves to `Loading`.
    async fn begin(&self, date_range: DateRange) -> u64 {
        let mut state = self.state.lock().await;
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        state.load_state = LoadState::Loading;
        state.date_range = Some(date_range);
        seq
    }

    /// The single point where results are applied to the dashboard state.
    async fn finish(
        &self,
        seq: u64,
        result: Result<AnalyticsViewModel, AnalyticsError>,
    ) -> Result<RefreshOutcome, AnalyticsError> {
        let mut state = self.state.lock().await;

        let latest = self.latest.load(Ordering::SeqCst);
        if seq != latest {
            tracing::debug!(seq, latest, "Discarding superseded analytics result.");
            return Ok(RefreshOutcome::Superseded);
        }

        match result {
            Ok(model) => {
                state.model = model;
                state.load_state = LoadState::Loaded;
                tracing::info!(seq, "Analytics loaded.");
                Ok(RefreshOutcome::Committed)
            }
            Err(e) => {
                tracing::error!(seq, error = %e, "Analytics refresh failed.");
                state.load_state = LoadState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    async fn fetch_all(
        &self,
        organizer_id: &str,
        date_range: &DateRange,
        token: &str,
    ) -> Result<AnalyticsViewModel, AnalyticsError> {
        // A join, not a race: all three sections are needed for a consistent model.
        let (overview, events, revenue) = tokio::join!(
            self.fetch_section(Section::Overview, organizer_id, date_range, token),
            self.fetch_section(Section::Events, organizer_id, date_range, token),
            self.fetch_section(Section::Revenue, organizer_id, date_range, token)
        );

        Ok(AnalyticsViewModel {
            overview: overview?,
            events: events?,
            revenue: revenue?,
        })
    }

    async fn fetch_section(
        &self,
        section: Section,
        organizer_id: &str,
        date_range: &DateRange,
        token: &str,
    ) -> Result<AnalyticsSection, AnalyticsError> {
        let path = section_path(section, organizer_id, date_range).map_err(|e| {
            AnalyticsError::Network {
                section,
                message: e.to_string(),
            }
        })?;

        let envelope = self
            .client
            .get(&path, token)
            .await
            .map_err(|e| AnalyticsError::Network {
                section,
                message: e.to_string(),
            })?;

        if !envelope.success {
            return Err(AnalyticsError::Api {
                section,
                message: envelope
                    .message
                    .unwrap_or_else(|| "the server reported a failure".to_string()),
            });
        }

        match envelope.data {
            Some(data) => Ok(AnalyticsSection::new(data)),
            None => Err(AnalyticsError::Api {
                section,
                message: "the response carried no data".to_string(),
            }),
        }
    }
}

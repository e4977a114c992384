use analytics::{AnalyticsAggregator, AnalyticsError, RefreshOutcome};
use api_client::error::ApiError;
use api_client::{ApiClient, Envelope};
use async_trait::async_trait;
use core_types::{AnalyticsSection, AnalyticsViewModel, DateRange, LoadState, Section, Session};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// A scripted backend. Responses are keyed by section and the requested
/// start date; requests for a held range wait until that range is released.
struct ScriptedClient {
    responses: HashMap<(Section, String), Result<Envelope, String>>,
    calls: Mutex<Vec<String>>,
    gates: HashMap<String, watch::Sender<bool>>,
}

impl ScriptedClient {
    fn new() -> Self {
        Self {
            responses: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            gates: HashMap::new(),
        }
    }

    fn respond(mut self, section: Section, range: &DateRange, response: Result<Envelope, String>) -> Self {
        self.responses.insert((section, range.start_param()), response);
        self
    }

    fn respond_all(self, range: &DateRange, overview: Value, events: Value, revenue: Value) -> Self {
        self.respond(Section::Overview, range, Ok(Envelope::ok(overview)))
            .respond(Section::Events, range, Ok(Envelope::ok(events)))
            .respond(Section::Revenue, range, Ok(Envelope::ok(revenue)))
    }

    fn hold(mut self, range: &DateRange) -> Self {
        let (gate, _) = watch::channel(false);
        self.gates.insert(range.start_param(), gate);
        self
    }

    fn release(&self, range: &DateRange) {
        if let Some(gate) = self.gates.get(&range.start_param()) {
            gate.send_replace(true);
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn section_of(path: &str) -> Section {
    if path.contains("/analytics/events") {
        Section::Events
    } else if path.contains("/analytics/revenue") {
        Section::Revenue
    } else {
        Section::Overview
    }
}

fn start_of(path: &str) -> String {
    path.split("startDate=")
        .nth(1)
        .and_then(|rest| rest.split('&').next())
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl ApiClient for ScriptedClient {
    async fn get(&self, path: &str, token: &str) -> Result<Envelope, ApiError> {
        assert_eq!(token, "t-1");
        self.calls.lock().unwrap().push(path.to_string());

        let start = start_of(path);
        if let Some(gate) = self.gates.get(&start) {
            let mut open = gate.subscribe();
            open.wait_for(|released| *released).await.unwrap();
        }

        match self.responses.get(&(section_of(path), start)) {
            Some(Ok(envelope)) => Ok(envelope.clone()),
            Some(Err(message)) => Err(ApiError::Deserialization(message.clone())),
            None => Err(ApiError::Status {
                status: 404,
                body: format!("no route for {}", path),
            }),
        }
    }
}

fn session() -> Session {
    Session::from_json(r#"{"token":"t-1","user":{"id":"org-42"}}"#).unwrap()
}

fn year(y: i32) -> DateRange {
    DateRange::calendar_year(y).unwrap()
}

#[tokio::test]
async fn all_sections_succeeding_loads_the_exact_payloads() {
    let range = year(2024);
    let overview = json!({ "totalEvents": 5, "totalRevenue": "1000" });
    let events = json!({ "totalEvents": 5, "eventsByStatus": [{ "status": "approved", "count": 3 }] });
    let revenue = json!({ "revenueByPeriod": [] });
    let client = Arc::new(ScriptedClient::new().respond_all(
        &range,
        overview.clone(),
        events.clone(),
        revenue.clone(),
    ));
    let aggregator = AnalyticsAggregator::new(client.clone(), session());

    let outcome = aggregator.refresh("org-42", range).await.unwrap();
    assert_eq!(outcome, RefreshOutcome::Committed);

    let state = aggregator.snapshot().await;
    assert_eq!(state.load_state, LoadState::Loaded);
    assert_eq!(
        state.model,
        AnalyticsViewModel {
            overview: AnalyticsSection::new(overview),
            events: AnalyticsSection::new(events),
            revenue: AnalyticsSection::new(revenue),
        }
    );
    assert_eq!(state.model.overview.field("totalEvents"), Some(&json!(5)));
    assert_eq!(
        state.model.events.field("eventsByStatus").and_then(Value::as_array).map(Vec::len),
        Some(1)
    );
    assert_eq!(
        state.model.revenue.field("revenueByPeriod").and_then(Value::as_array).map(Vec::len),
        Some(0)
    );

    let mut calls = client.calls();
    calls.sort();
    assert_eq!(
        calls,
        vec![
            "/api/organizers/org-42/analytics/events?startDate=2024-01-01&endDate=2024-12-31",
            "/api/organizers/org-42/analytics/revenue?startDate=2024-01-01&endDate=2024-12-31",
            "/api/organizers/org-42/dashboard?startDate=2024-01-01&endDate=2024-12-31",
        ]
    );
}

#[tokio::test]
async fn one_backend_failure_keeps_the_previous_model() {
    let good = year(2023);
    let bad = year(2024);
    let client = Arc::new(
        ScriptedClient::new()
            .respond_all(&good, json!({ "totalEvents": 2 }), json!({}), json!({}))
            .respond(Section::Overview, &bad, Ok(Envelope::ok(json!({ "totalEvents": 9 }))))
            .respond(Section::Events, &bad, Ok(Envelope::failure("Events service unavailable")))
            .respond(Section::Revenue, &bad, Ok(Envelope::ok(json!({})))),
    );
    let aggregator = AnalyticsAggregator::new(client, session());

    aggregator.refresh("org-42", good).await.unwrap();
    let before = aggregator.snapshot().await.model;

    let err = aggregator.refresh("org-42", bad).await.unwrap_err();
    assert_eq!(
        err,
        AnalyticsError::Api {
            section: Section::Events,
            message: "Events service unavailable".to_string(),
        }
    );

    let state = aggregator.snapshot().await;
    assert_eq!(state.model, before);
    assert_eq!(state.model.overview.field("totalEvents"), Some(&json!(2)));
    assert_eq!(
        state.load_state,
        LoadState::Failed("Events analytics request failed: Events service unavailable".to_string())
    );
    assert!(state.visible_model().is_none());
}

#[tokio::test]
async fn network_failure_on_first_load_leaves_the_model_empty() {
    let range = year(2024);
    let client = Arc::new(
        ScriptedClient::new()
            .respond(Section::Overview, &range, Ok(Envelope::ok(json!({ "totalEvents": 5 }))))
            .respond(Section::Events, &range, Ok(Envelope::ok(json!({}))))
            .respond(Section::Revenue, &range, Err("connection reset".to_string())),
    );
    let aggregator = AnalyticsAggregator::new(client, session());

    let err = aggregator.refresh("org-42", range).await.unwrap_err();
    assert!(matches!(err, AnalyticsError::Network { section: Section::Revenue, .. }));

    let state = aggregator.snapshot().await;
    assert!(matches!(state.load_state, LoadState::Failed(_)));
    assert_eq!(state.model, AnalyticsViewModel::default());
}

#[tokio::test]
async fn a_newer_refresh_wins_over_a_slower_older_one() {
    let older = year(2023);
    let newer = year(2024);
    let client = Arc::new(
        ScriptedClient::new()
            .respond_all(&older, json!({ "totalEvents": 1 }), json!({}), json!({}))
            .respond_all(&newer, json!({ "totalEvents": 7 }), json!({}), json!({}))
            .hold(&older),
    );
    let aggregator = AnalyticsAggregator::new(client.clone(), session());

    let slow = aggregator.refresh("org-42", older);
    let fast = async {
        // Wait until the older refresh has sent all three requests.
        while client.call_count() < 3 {
            tokio::task::yield_now().await;
        }
        let outcome = aggregator.refresh("org-42", newer).await;
        client.release(&older);
        outcome
    };
    let (slow, fast) = tokio::join!(slow, fast);

    assert_eq!(fast.unwrap(), RefreshOutcome::Committed);
    assert_eq!(slow.unwrap(), RefreshOutcome::Superseded);

    let state = aggregator.snapshot().await;
    assert_eq!(state.load_state, LoadState::Loaded);
    assert_eq!(state.date_range, Some(newer));
    assert_eq!(state.model.overview.field("totalEvents"), Some(&json!(7)));
    assert_eq!(client.call_count(), 6);
}

#[tokio::test]
async fn an_older_failure_after_a_newer_commit_is_ignored() {
    let older = year(2023);
    let newer = year(2024);
    let client = Arc::new(
        ScriptedClient::new()
            .respond(Section::Overview, &older, Ok(Envelope::failure("Database unavailable")))
            .respond(Section::Events, &older, Ok(Envelope::ok(json!({}))))
            .respond(Section::Revenue, &older, Ok(Envelope::ok(json!({}))))
            .respond_all(&newer, json!({ "totalEvents": 7 }), json!({}), json!({}))
            .hold(&older),
    );
    let aggregator = AnalyticsAggregator::new(client.clone(), session());

    let slow = aggregator.refresh("org-42", older);
    let fast = async {
        while client.call_count() < 3 {
            tokio::task::yield_now().await;
        }
        let outcome = aggregator.refresh("org-42", newer).await;
        client.release(&older);
        outcome
    };
    let (slow, fast) = tokio::join!(slow, fast);

    assert_eq!(fast.unwrap(), RefreshOutcome::Committed);
    assert_eq!(slow.unwrap(), RefreshOutcome::Superseded);

    let state = aggregator.snapshot().await;
    assert_eq!(state.load_state, LoadState::Loaded);
    assert_eq!(state.date_range, Some(newer));
    assert_eq!(state.model.overview.field("totalEvents"), Some(&json!(7)));
}

#[tokio::test]
async fn an_older_result_arriving_first_is_not_committed() {
    let older = year(2023);
    let newer = year(2024);
    let client = Arc::new(
        ScriptedClient::new()
            .respond_all(&older, json!({ "totalEvents": 1 }), json!({}), json!({}))
            .respond_all(&newer, json!({ "totalEvents": 7 }), json!({}), json!({}))
            .hold(&older)
            .hold(&newer),
    );
    let aggregator = AnalyticsAggregator::new(client.clone(), session());

    // Both refreshes are in flight before either resolves; the older one
    // resolves first, and the state is inspected before the newer one is let go.
    let slow = async {
        let outcome = aggregator.refresh("org-42", older).await;
        let in_between = aggregator.snapshot().await;
        client.release(&newer);
        (outcome, in_between)
    };
    let fast = aggregator.refresh("org-42", newer);
    let driver = async {
        while client.call_count() < 6 {
            tokio::task::yield_now().await;
        }
        client.release(&older);
    };
    let ((slow, in_between), fast, ()) = tokio::join!(slow, fast, driver);

    assert_eq!(slow.unwrap(), RefreshOutcome::Superseded);
    assert_eq!(in_between.load_state, LoadState::Loading);
    assert_eq!(in_between.model, AnalyticsViewModel::default());
    assert!(in_between.visible_model().is_none());

    assert_eq!(fast.unwrap(), RefreshOutcome::Committed);
    let state = aggregator.snapshot().await;
    assert_eq!(state.load_state, LoadState::Loaded);
    assert_eq!(state.date_range, Some(newer));
    assert_eq!(state.model.overview.field("totalEvents"), Some(&json!(7)));
}

#[tokio::test]
async fn missing_token_fails_before_any_request() {
    let client = Arc::new(ScriptedClient::new());
    let session = Session::from_json(r#"{"user":{"id":"org-42"}}"#).unwrap();
    let aggregator = AnalyticsAggregator::new(client.clone(), session);

    let err = aggregator.refresh("org-42", year(2024)).await.unwrap_err();
    assert_eq!(err, AnalyticsError::Auth("No authentication token found".to_string()));
    assert_eq!(client.call_count(), 0);
    assert_eq!(
        aggregator.snapshot().await.load_state,
        LoadState::Failed("No authentication token found".to_string())
    );
}

#[tokio::test]
async fn a_failed_dashboard_recovers_on_the_next_refresh() {
    let unknown = year(2022);
    let known = year(2024);
    let client = Arc::new(ScriptedClient::new().respond_all(&known, json!({ "totalEvents": 3 }), json!({}), json!({})));
    let aggregator = AnalyticsAggregator::new(client, session());

    let err = aggregator.refresh("org-42", unknown).await.unwrap_err();
    assert!(matches!(err, AnalyticsError::Network { .. }));
    assert!(aggregator.snapshot().await.load_state.failure().is_some());

    let outcome = aggregator.on_date_range_changed(known).await.unwrap();
    assert_eq!(outcome, RefreshOutcome::Committed);
    let state = aggregator.snapshot().await;
    assert_eq!(state.load_state, LoadState::Loaded);
    let model = state.visible_model().expect("loaded model is visible");
    assert_eq!(model.overview.field("totalEvents"), Some(&json!(3)));
}

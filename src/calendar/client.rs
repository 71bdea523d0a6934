use super::models::CalendarEvent;
use crate::error::{google_calendar_error, SyncResult};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info};
use url::Url;

/// Base URL of the Google Calendar v3 API
pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3/";

/// Something that accepts event payloads, one at a time
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Insert a single event
    async fn insert_event(&self, event: &CalendarEvent) -> SyncResult<()>;
}

/// Inserts events through the Google Calendar REST API
#[derive(Clone)]
pub struct GoogleCalendarClient {
    client: Client,
    api_base: String,
    calendar_id: String,
    access_token: String,
}

impl GoogleCalendarClient {
    pub fn new(calendar_id: &str, access_token: &str) -> Self {
        Self {
            client: Client::new(),
            api_base: CALENDAR_API_BASE.to_string(),
            calendar_id: calendar_id.to_string(),
            access_token: access_token.to_string(),
        }
    }

    /// Send requests to another API root, such as a local test server
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.to_string();
        self
    }

    /// Endpoint for inserting events into the configured calendar
    pub fn events_url(&self) -> SyncResult<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| google_calendar_error("Calendar API URL cannot be a base"))?
            .pop_if_empty()
            .extend(["calendars", self.calendar_id.as_str(), "events"]);
        Ok(url)
    }
}

#[async_trait]
impl EventSink for GoogleCalendarClient {
    async fn insert_event(&self, event: &CalendarEvent) -> SyncResult<()> {
        let url = self.events_url()?;

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .json(event)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to insert event: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to insert event: HTTP {} - {}",
                status, error_body
            )));
        }

        Ok(())
    }
}

/// Logs each payload instead of sending it
#[derive(Debug, Clone, Default)]
pub struct DryRunSink;

#[async_trait]
impl EventSink for DryRunSink {
    async fn insert_event(&self, event: &CalendarEvent) -> SyncResult<()> {
        let payload = serde_json::to_string_pretty(event)?;
        info!("Dry run, not submitting:\n{}", payload);
        Ok(())
    }
}

/// Outcome of submitting a batch of events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionReport {
    pub created: usize,
    pub failed: Vec<String>,
}

/// Submit events one after another. A failed insert does not stop the batch.
pub async fn submit_events(sink: &dyn EventSink, events: &[CalendarEvent]) -> SubmissionReport {
    let mut report = SubmissionReport::default();

    for event in events {
        match sink.insert_event(event).await {
            Ok(()) => {
                info!("Event created: {}", event.title);
                report.created += 1;
            }
            Err(e) => {
                error!("Failed to create event {}: {}", event.title, e);
                report.failed.push(event.title.clone());
            }
        }
    }

    report
}

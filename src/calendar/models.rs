use serde::{Deserialize, Serialize};

/// Start or end of an event in the Google Calendar v3 schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

/// Event payload sent to the calendar service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(rename = "summary")]
    pub title: String,
    pub location: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

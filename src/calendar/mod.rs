//! Date parsing and calendar event production for scraped lectures.

pub mod builder;
pub mod client;
pub mod models;
pub mod time;

pub use builder::{build_event, plan_events, EventPlan};
pub use client::{submit_events, DryRunSink, EventSink, GoogleCalendarClient, SubmissionReport};
pub use models::{CalendarEvent, EventDateTime};
pub use time::{DateContext, TimeRange};

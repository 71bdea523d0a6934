use super::models::{CalendarEvent, EventDateTime};
use super::time::{parse_time_range, DateContext, TimeRange};
use crate::config::EventSettings;
use crate::error::Error;
use crate::extract::NormalizedLecture;
use tracing::error;

/// Map a lecture and its time range to an event payload
pub fn build_event(name: &str, range: &TimeRange, venue: &str, timezone: &str) -> CalendarEvent {
    CalendarEvent {
        title: name.to_string(),
        location: venue.to_string(),
        start: EventDateTime {
            date_time: range.start_iso(),
            time_zone: timezone.to_string(),
        },
        end: EventDateTime {
            date_time: range.end_iso(),
            time_zone: timezone.to_string(),
        },
    }
}

/// Events ready to submit, and the lectures whose dates could not be read
#[derive(Debug, Default)]
pub struct EventPlan {
    pub events: Vec<CalendarEvent>,
    pub rejected: Vec<(NormalizedLecture, Error)>,
}

/// Parse every lecture's date line and build its event.
///
/// A lecture with an unreadable date is rejected on its own; the others are
/// still planned.
pub fn plan_events(
    lectures: &[NormalizedLecture],
    ctx: &DateContext,
    settings: &EventSettings,
) -> EventPlan {
    let mut plan = EventPlan::default();

    for lecture in lectures {
        match parse_time_range(&lecture.date_text, ctx) {
            Ok(range) => plan.events.push(build_event(
                &lecture.name,
                &range,
                &settings.venue,
                &settings.timezone,
            )),
            Err(e) => {
                error!(lecture = %lecture.name, "Rejecting lecture: {}", e);
                plan.rejected.push((lecture.clone(), e));
            }
        }
    }

    plan
}

use crate::error::{Error, SyncResult};
use crate::extract::fragments::DATE_MARKER;
use chrono::{
    DateTime, Datelike, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone, Utc,
};
use chrono_tz::Tz;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

/// Bulgarian month names, January first
pub const MONTHS: [&str; 12] = [
    "януари",
    "февруари",
    "март",
    "април",
    "май",
    "юни",
    "юли",
    "август",
    "септември",
    "октомври",
    "ноември",
    "декември",
];

/// Format of the rendered event timestamps
const ISO_8601: &str = "%Y-%m-%dT%H:%M:%S%:z";

lazy_static! {
    // marker, day, filler, month, filler, start, filler, end
    static ref DATE_EXPRESSION: Regex = Regex::new(&format!(
        r"^\s*{}\s+(\d{{1,2}}).*?({}).+?(\d{{1,2}}[:;]\d{{1,2}}).+?(\d{{1,2}}[:;]\d{{1,2}})",
        regex::escape(DATE_MARKER),
        MONTHS.join("|")
    ))
    .unwrap();
    static ref CLOCK_TIME: Regex = Regex::new(r"\d{1,2}[:;]\d{1,2}").unwrap();
}

/// Day, month and clock times read from a date line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LectureDate {
    pub day: u32,
    pub month: u32,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Absolute start and end of a lecture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeRange {
    /// Start as `YYYY-MM-DDTHH:MM:SS±HH:MM`
    pub fn start_iso(&self) -> String {
        self.start.format(ISO_8601).to_string()
    }

    /// End as `YYYY-MM-DDTHH:MM:SS±HH:MM`
    pub fn end_iso(&self) -> String {
        self.end.format(ISO_8601).to_string()
    }
}

/// How the UTC offset of a rendered timestamp is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetSource {
    /// One offset for every event, taken when the context was created
    Fixed(FixedOffset),
    /// The offset in force in this zone on each event's own date
    Zone(Tz),
}

/// Year and offset used to turn a [`LectureDate`] into a [`TimeRange`].
///
/// The page never states a year, so the current one is assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateContext {
    pub year: i32,
    pub offset: OffsetSource,
}

impl DateContext {
    /// Current year and the local offset right now.
    ///
    /// Events across a daylight-saving change get the offset of today, not of
    /// their own date.
    pub fn now() -> Self {
        let now = Local::now();
        Self {
            year: now.year(),
            offset: OffsetSource::Fixed(*now.offset()),
        }
    }

    /// A fixed year and offset
    pub fn fixed(year: i32, offset: FixedOffset) -> Self {
        Self {
            year,
            offset: OffsetSource::Fixed(offset),
        }
    }

    /// Current year in `zone`, with offsets resolved per event date
    pub fn in_zone(zone: Tz) -> Self {
        Self {
            year: Utc::now().with_timezone(&zone).year(),
            offset: OffsetSource::Zone(zone),
        }
    }

    fn resolve(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self.offset {
            OffsetSource::Fixed(offset) => offset.from_local_datetime(&local).single(),
            OffsetSource::Zone(zone) => match zone.from_local_datetime(&local) {
                LocalResult::Single(dt) => Some(dt.fixed_offset()),
                LocalResult::Ambiguous(earliest, _) => Some(earliest.fixed_offset()),
                LocalResult::None => None,
            },
        }
    }
}

impl LectureDate {
    /// Place the lecture in the context's year and offset
    pub fn to_time_range(&self, ctx: &DateContext) -> SyncResult<TimeRange> {
        let invalid = || {
            Error::InvalidDate(format!(
                "{:02}.{:02}.{} {}-{}",
                self.day,
                self.month,
                ctx.year,
                self.start.format("%H:%M"),
                self.end.format("%H:%M")
            ))
        };

        let date = NaiveDate::from_ymd_opt(ctx.year, self.month, self.day).ok_or_else(invalid)?;
        let start = ctx.resolve(date.and_time(self.start)).ok_or_else(invalid)?;
        let end = ctx.resolve(date.and_time(self.end)).ok_or_else(invalid)?;

        if end <= start {
            return Err(invalid());
        }

        Ok(TimeRange { start, end })
    }
}

/// Month number for a Bulgarian month name, `октомври` is 10.
///
/// Only the exact lowercase names in [`MONTHS`] are accepted.
pub fn month_number(month: &str) -> SyncResult<u32> {
    MONTHS
        .iter()
        .position(|name| *name == month)
        .map(|idx| idx as u32 + 1)
        .ok_or_else(|| Error::UnknownMonth(month.to_string()))
}

/// Parse time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Clock time from the page, where `;` is a common typo for `:`
fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let (hour, minute) = parse_time(&raw.replace(';', ":"))?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Read day, month and times from a date line such as
/// `Дата: 26-ти септември, 18:00 - 22:00`.
///
/// Only the first range is read. Retake listings that add a second date are
/// not validated against the first one.
pub fn parse_date_text(date_text: &str) -> SyncResult<LectureDate> {
    let mismatch = || Error::GrammarMismatch(date_text.to_string());
    let caps = DATE_EXPRESSION.captures(date_text).ok_or_else(mismatch)?;

    let day = caps[1].parse::<u32>().map_err(|_| mismatch())?;
    let month = month_number(&caps[2])?;
    let start = parse_clock_time(&caps[3]).ok_or_else(mismatch)?;
    let end = parse_clock_time(&caps[4]).ok_or_else(mismatch)?;

    if CLOCK_TIME.find_iter(date_text).count() > 2 {
        warn!(date_text, "Date line has more than one range, using the first");
    }

    Ok(LectureDate {
        day,
        month,
        start,
        end,
    })
}

/// Parse a date line and render it in the given context
pub fn parse_time_range(date_text: &str, ctx: &DateContext) -> SyncResult<TimeRange> {
    parse_date_text(date_text)?
        .to_time_range(ctx)
        .map_err(|_| Error::InvalidDate(date_text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn sofia_summer() -> DateContext {
        DateContext::fixed(2016, FixedOffset::east_opt(3 * 3600).unwrap())
    }

    #[test]
    fn test_month_number() {
        assert_eq!(month_number("януари").unwrap(), 1);
        assert_eq!(month_number("октомври").unwrap(), 10);
        assert_eq!(month_number("декември").unwrap(), 12);
        for month in ["Декември", "ОКТОМВРИ", " октомври ", "october", ""] {
            assert!(
                matches!(month_number(month), Err(Error::UnknownMonth(_))),
                "{month:?}"
            );
        }
    }

    #[test]
    fn test_month_case_must_match() {
        assert!(matches!(
            parse_date_text("Дата: 4 ОКТОМВРИ, 18:00 - 22:00"),
            Err(Error::GrammarMismatch(_))
        ));
    }

    #[test]
    fn test_parse_date_text() {
        let date = parse_date_text("Дата: 26-ти септември, 18:00 - 22:00").unwrap();
        assert_eq!(date.day, 26);
        assert_eq!(date.month, 9);
        assert_eq!(date.start, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(date.end, NaiveTime::from_hms_opt(22, 0, 0).unwrap());
    }

    #[test]
    fn test_semicolon_is_a_colon() {
        let date = parse_date_text("Дата: 4 октомври, 18;30 - 22;00").unwrap();
        assert_eq!(date.start, NaiveTime::from_hms_opt(18, 30, 0).unwrap());
        assert_eq!(date.end, NaiveTime::from_hms_opt(22, 0, 0).unwrap());
    }

    #[test]
    fn test_renders_iso_timestamps() {
        let range = parse_time_range("Дата: 5 март, 9:00 - 12:30", &sofia_summer()).unwrap();
        assert_eq!(range.start_iso(), "2016-03-05T09:00:00+03:00");
        assert_eq!(range.end_iso(), "2016-03-05T12:30:00+03:00");
    }

    #[test]
    fn test_rendered_timestamp_parses_back() {
        let range =
            parse_time_range("Дата: 26-ти септември, 18:00 - 22:00", &sofia_summer()).unwrap();
        assert!(range.start < range.end);
        assert_eq!(range.start.date_naive(), range.end.date_naive());

        let start = DateTime::parse_from_rfc3339(&range.start_iso()).unwrap();
        assert_eq!((start.day(), start.hour(), start.minute()), (26, 18, 0));
        let end = DateTime::parse_from_rfc3339(&range.end_iso()).unwrap();
        assert_eq!((end.day(), end.hour(), end.minute()), (26, 22, 0));
    }

    #[test]
    fn test_only_first_range_is_used() {
        let date =
            parse_date_text("Дата: 5 март, 18:00 - 20:00 и 12 април, 10:00 - 12:00").unwrap();
        assert_eq!((date.day, date.month), (5, 3));
        assert_eq!(date.end, NaiveTime::from_hms_opt(20, 0, 0).unwrap());
    }

    #[test]
    fn test_grammar_mismatch() {
        for text in [
            "Начало: 5 март, 18:00 - 20:00",
            "Дата: скоро",
            "Дата: 5 март, 18:00",
            "Дата: 5 март, 25:00 - 26:00",
        ] {
            assert!(
                matches!(parse_date_text(text), Err(Error::GrammarMismatch(_))),
                "{text}"
            );
        }
    }

    #[test]
    fn test_impossible_dates() {
        let ctx = sofia_summer();
        assert!(matches!(
            parse_time_range("Дата: 31 февруари, 18:00 - 20:00", &ctx),
            Err(Error::InvalidDate(_))
        ));
        assert!(matches!(
            parse_time_range("Дата: 3 март, 20:00 - 18:00", &ctx),
            Err(Error::InvalidDate(_))
        ));
    }

    #[test]
    fn test_zone_offset_follows_event_date() {
        let ctx = DateContext {
            year: 2016,
            offset: OffsetSource::Zone(chrono_tz::Europe::Sofia),
        };
        let winter = parse_time_range("Дата: 15 януари, 18:00 - 20:00", &ctx).unwrap();
        assert_eq!(winter.start_iso(), "2016-01-15T18:00:00+02:00");
        let summer = parse_time_range("Дата: 15 юли, 18:00 - 20:00", &ctx).unwrap();
        assert_eq!(summer.start_iso(), "2016-07-15T18:00:00+03:00");
    }
}

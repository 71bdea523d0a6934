use crate::calendar::time::DateContext;
use crate::error::{config_error, env_error, SyncResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Where the lectures take place
pub const DEFAULT_VENUE: &str = "ул. Тинтява 15-17, етаж 2, 1113 Sofia, Bulgaria";

/// IANA zone attached to every event
pub const DEFAULT_TIMEZONE: &str = "Europe/Sofia";

/// Class attribute of the `div` that wraps one lecture on the course page
pub const DEFAULT_LECTURE_CLASS: &str = "lecture-paragraph html-raw-wrapper";

/// Optional overrides file for the event settings
pub const SETTINGS_PATH: &str = "config/lectures.toml";

/// Settings that shape the scraped page and the produced events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSettings {
    /// Location written into every event
    pub venue: String,
    /// IANA timezone label written into every event
    pub timezone: String,
    /// Class attribute marking a lecture block
    pub lecture_class: String,
    /// Resolve the UTC offset at each event's date instead of at parse time
    pub offset_at_event_date: bool,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            venue: DEFAULT_VENUE.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            lecture_class: DEFAULT_LECTURE_CLASS.to_string(),
            offset_at_event_date: false,
        }
    }
}

impl EventSettings {
    /// Read settings from a TOML file, falling back to defaults for missing keys
    pub fn from_file(path: &Path) -> SyncResult<Self> {
        let content = fs::read_to_string(path)?;
        let settings: EventSettings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse the configured timezone
    pub fn zone(&self) -> SyncResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Unknown timezone: {}", self.timezone)))
    }

    /// Build the date context used to render timestamps
    pub fn date_context(&self) -> SyncResult<DateContext> {
        if self.offset_at_event_date {
            Ok(DateContext::in_zone(self.zone()?))
        } else {
            Ok(DateContext::now())
        }
    }

    fn validate(&self) -> SyncResult<()> {
        self.zone()?;
        if self.lecture_class.trim().is_empty() {
            return Err(config_error("lecture_class must not be empty"));
        }
        Ok(())
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Course page to scrape
    pub course_url: String,
    /// Google Calendar API access token
    pub google_access_token: String,
    /// Google Calendar ID to insert events into
    pub google_calendar_id: String,
    /// Log payloads instead of submitting them
    pub dry_run: bool,
    /// Event and page settings
    pub settings: EventSettings,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> SyncResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let course_url = env::var("COURSE_URL").map_err(|_| env_error("COURSE_URL"))?;

        let dry_run = env::var("DRY_RUN")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        // The token is only needed when events are actually sent
        let google_access_token = match env::var("GOOGLE_ACCESS_TOKEN") {
            Ok(token) => token,
            Err(_) if dry_run => String::new(),
            Err(_) => return Err(env_error("GOOGLE_ACCESS_TOKEN")),
        };

        let google_calendar_id =
            env::var("GOOGLE_CALENDAR_ID").unwrap_or_else(|_| String::from("primary"));

        let settings_path = Path::new(SETTINGS_PATH);
        let settings = if settings_path.exists() {
            EventSettings::from_file(settings_path)?
        } else {
            EventSettings::default()
        };

        Ok(Config {
            course_url,
            google_access_token,
            google_calendar_id,
            dry_run,
            settings,
        })
    }
}

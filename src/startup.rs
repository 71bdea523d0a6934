use lecture_sync::calendar::{
    plan_events, submit_events, DryRunSink, EventSink, GoogleCalendarClient,
};
use lecture_sync::config::Config;
use lecture_sync::error::{fetch_error, other_error, Error, SyncResult};
use lecture_sync::extract::extract_course_info;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,html5ever=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| other_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Download the course page as text
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> SyncResult<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| fetch_error(&format!("{}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(fetch_error(&format!("{}: HTTP {}", url, response.status())));
    }

    response
        .text()
        .await
        .map_err(|e| fetch_error(&format!("Failed to read body of {}: {}", url, e)))
}

/// Scrape the course, plan its events and submit them
pub async fn run(config: Config) -> miette::Result<()> {
    let client = reqwest::Client::new();

    info!("Fetching course page {}", config.course_url);
    let html = fetch_page(&client, &config.course_url).await?;

    let course = extract_course_info(&html, &config.settings.lecture_class)?;
    let ctx = config.settings.date_context()?;
    let plan = plan_events(&course.lectures, &ctx, &config.settings);

    let sink: Box<dyn EventSink> = if config.dry_run {
        Box::new(DryRunSink)
    } else {
        Box::new(GoogleCalendarClient::new(
            &config.google_calendar_id,
            &config.google_access_token,
        ))
    };

    let report = submit_events(sink.as_ref(), &plan.events).await;
    info!(
        "Done! Added {} lectures from {} to your calendar",
        report.created, course.title
    );

    if !report.failed.is_empty() {
        warn!("{} events could not be created", report.failed.len());
    }

    if !plan.rejected.is_empty() || !report.failed.is_empty() {
        return Err(Error::Other(format!(
            "{} lectures rejected, {} events failed",
            plan.rejected.len(),
            report.failed.len()
        ))
        .into());
    }

    Ok(())
}

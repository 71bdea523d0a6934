mod startup;

use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting lecture-sync");

    // Load configuration
    let config = startup::load_config()?;

    // Scrape the course page and fill the calendar
    startup::run(config).await
}

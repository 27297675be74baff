use tripjournal::config::AppConfig;
use tripjournal::error::JournalError;
use tripjournal::service::JournalService;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), JournalError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let service = JournalService::new(&config)?;

    let Some((username, password)) = config.credentials() else {
        warn!("TRIPJOURNAL_USERNAME / TRIPJOURNAL_PASSWORD not set, nothing to do");
        return Ok(());
    };

    service.log_in(username, password).await?;
    info!("logged in to {}", config.base_url);

    let trips = service.get_trips().await?;
    info!("{} trips", trips.len());
    for trip in &trips {
        info!(
            id = trip.id,
            events = trip.events.len(),
            "{} ({} - {})",
            trip.name,
            trip.start_date.format("%Y-%m-%d"),
            trip.end_date.format("%Y-%m-%d"),
        );
    }

    service.log_out();
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tripjournal=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

use splitzy::{
    config::{database, settings},
    core::{report, trip},
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenvy::dotenv().ok();

    // 3. Load the application configuration
    let app_config = settings::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Connect and make sure every table exists
    let database_url = database::get_database_url(app_config.database.url.as_deref());
    if database_url == database::DEFAULT_DATABASE_URL {
        std::fs::create_dir_all("data")?;
    }
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;

    // 5. Print the overview of every stored trip
    let trips = trip::list_trips(&db).await?;
    info!("Found {} trip(s)", trips.len());
    for stored in trips {
        let overview = report::generate_trip_overview(&db, stored.id).await?;
        println!("{}", report::format_overview(&overview, app_config.display.decimals));
    }

    Ok(())
}

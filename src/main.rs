use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use local_library::infrastructure::AppState;
use local_library::{config, db, seed, server};

/// Value following `--profile`, if any
fn profile_arg(args: &[String]) -> Option<String> {
    args.iter()
        .position(|arg| arg == "--profile")
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "local_library=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::from_env(profile_arg(&args));
    tracing::info!("Using profile '{}'", config.profile);

    // Initialize database
    let db = db::init_db(&config.database_url, config.max_connections).await?;
    let state = AppState::new(db);

    // Check for seed flag
    if config.seed_demo || args.iter().any(|arg| arg == "--seed") {
        tracing::info!("Seeding demo data...");
        match seed::seed_demo_data(&state.catalog()).await {
            Ok(true) => tracing::info!("Demo data seeded successfully."),
            Ok(false) => {}
            Err(e) => tracing::error!("Failed to seed data: {}", e),
        }
    }

    server::serve(state, &config).await?;
    Ok(())
}

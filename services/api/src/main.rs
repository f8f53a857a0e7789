use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use api::{
    AppState,
    config::AppConfig,
    jwt::JwtService,
    routes::{cors_layer, create_router},
};
use common::database::{connect, health_check};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("api=info,common=info,tower_http=info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting DishDynamo API service");

    let config = AppConfig::load()?;

    // Initialize the document store
    let store = connect(&config.database()).await?;

    // Check database connectivity
    match health_check(store.as_ref()).await {
        Ok(_) => info!("Database connection successful"),
        // Requests report 503 until the store becomes reachable
        Err(e) => tracing::warn!("Database not reachable yet: {}", e),
    }

    let jwt_service = JwtService::new(&config.access_token_secret);
    let app_state = AppState::new(store, jwt_service, config.cookie_policy()?);

    // Start the web server
    let app = create_router(app_state)
        .layer(cors_layer(&config.allowed_origins())?)
        .layer(TraceLayer::new_for_http());

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("DishDynamo API listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}

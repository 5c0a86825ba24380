use clinicdesk::api::{clinic_api_router, ApiContext};
use clinicdesk::config::AppConfig;
use clinicdesk::db::open_database;
use clinicdesk::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::from_env();
    std::fs::create_dir_all(&config.audio_dir)?;
    std::fs::create_dir_all(&config.prescriptions_dir)?;

    // Open once at startup so migrations run before the first request.
    open_database(&config.db_path)?;
    tracing::info!(db = %config.db_path.display(), "database ready");

    let bind_addr = config.bind_addr.clone();
    let app = clinic_api_router(ApiContext::new(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "front desk listening");
    axum::serve(listener, app).await?;
    Ok(())
}

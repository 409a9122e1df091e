use chrono::Utc;
use culinaria_server::auth::purge_expired_sessions;
use culinaria_server::config::Config;
use culinaria_server::{api, app, db, telemetry, AppState};
use std::env;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        return match api::openapi().to_pretty_json() {
            Ok(spec) => {
                println!("{}", spec);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("failed to render OpenAPI document: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let telemetry = telemetry::init_telemetry();
    let result = run(Config::load()).await;
    telemetry.shutdown();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("server error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let pool = db::create_pool(&config.database_url)?;

    {
        let mut conn = pool.get()?;
        let purged = purge_expired_sessions(&mut conn, Utc::now())?;
        if purged > 0 {
            tracing::info!(count = purged, "purged expired sessions");
        }
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let addr = listener.local_addr()?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);
    tracing::info!("OpenAPI spec available at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app(AppState::new(pool, config))).await?;
    Ok(())
}

mod api;
mod config;
mod editor;
mod error;
mod export;
mod matchup;
mod report;
mod state;
mod types;

use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::error::Result;
use crate::state::SessionStore;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let sessions = SessionStore::new(
        cfg.max_sessions,
        Duration::from_secs(cfg.session_idle_secs),
    );
    info!(
        "Session store ready (max_sessions={}, idle_timeout={}s, max_table_rows={})",
        cfg.max_sessions, cfg.session_idle_secs, cfg.max_table_rows,
    );

    let app = router(ApiState::new(sessions, cfg.max_table_rows));
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Matchup analyzer listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

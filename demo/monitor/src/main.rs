mod config;
use config::MonitorConfig;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use vigil_core::dashboard::{DashboardConfig, DashboardServer};
use vigil_core::faces::KnownFaceClient;
use vigil_core::Vigil;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging / tracing
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,vigil_core=info,monitor=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        target = "monitor",
        "Starting monitor demo: telemetry feed + camera stream + dashboard"
    );

    // Load configuration (defaults + env)
    let cfg = MonitorConfig::load();

    // Initialize the Vigil runtime (state, feed orchestrator, video relay)
    let mut vigil = Vigil::new(cfg.runtime).await?;
    vigil.start().await?;

    // Dashboard server, opt-in via VIGIL_DASHBOARD=true
    if DashboardConfig::enabled() {
        let faces = Arc::new(KnownFaceClient::new(cfg.faces)?);
        let server = DashboardServer::new(cfg.dashboard, vigil.dashboard_context(faces));
        tokio::spawn(async move {
            if let Err(e) = server.serve().await {
                error!(target = "monitor", error = %e, "Dashboard server failed");
            }
        });
    } else {
        info!(
            target = "monitor",
            "Dashboard disabled; set VIGIL_DASHBOARD=true to enable"
        );
    }

    // Run until interrupted
    signal::ctrl_c().await?;
    info!(target = "monitor", "Interrupt received, shutting down");

    vigil.shutdown().await?;
    Ok(())
}

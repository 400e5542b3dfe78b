mod addressing;
mod config;
mod console;
mod error;
mod fleet;
mod models;
mod netconf;
mod orchestrator;
mod payload;
mod report;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use fleet::FleetRunner;
use models::DeviceTarget;
use orchestrator::NetconfProvisioner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loopforge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== LoopForge - bulk NETCONF loopback provisioning ===");

    let cfg = Config::load();
    let hosts = cfg.load_inventory()?;
    tracing::info!(
        "Provisioning {} devices (port {}, timeout {}s)",
        hosts.len(),
        cfg.port,
        cfg.timeout_secs
    );

    let credentials = Arc::new(console::prompt_credentials()?);
    let params = console::prompt_run_params(&cfg)?;

    let devices: Vec<DeviceTarget> = hosts
        .into_iter()
        .map(|host| DeviceTarget {
            host,
            credentials: credentials.clone(),
        })
        .collect();

    let runner = FleetRunner::new(devices, params, NetconfProvisioner);
    let summary = runner.run().await;

    report::print_summary(&summary);
    Ok(())
}

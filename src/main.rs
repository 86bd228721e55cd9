use anyhow::Result;
use sigenbridge::config::Config;
use sigenbridge::coordinator::PollCoordinator;
use sigenbridge::modbus::ModbusHub;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Optional config path argument, otherwise the default locations
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(&path),
        None => Config::load(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    sigenbridge::logging::init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Sigenbridge {} starting up ({} inverters, {} AC chargers{})",
        env!("APP_VERSION"),
        config.inverters.len(),
        config.ac_chargers.len(),
        if config.plant.read_only {
            ", read-only"
        } else {
            ""
        }
    );

    let hub = Arc::new(ModbusHub::new(
        &config.modbus,
        &config.probe,
        config.plant.read_only,
    ));
    let mut coordinator = PollCoordinator::new(&config, hub);

    // Translate Ctrl+C into a coordinator shutdown request
    let shutdown = coordinator.shutdown_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal");
                let _ = shutdown.send(());
            }
            Err(e) => error!("Unable to listen for shutdown signal: {}", e),
        }
    });

    match coordinator.run().await {
        Ok(()) => {
            info!("Sigenbridge stopped");
            Ok(())
        }
        Err(e) => {
            error!("Coordinator failed with error: {}", e);
            Err(anyhow::anyhow!("Coordinator error: {}", e))
        }
    }
}

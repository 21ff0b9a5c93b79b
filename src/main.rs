use crate::app_config::AppConfig;
use crate::ble::{ScanError, matches_target, scan_devices};
use crate::cli::{Cli, Commands};
use crate::light_controller::LightController;
use btleplug::platform::{Adapter, Peripheral};
use clap::Parser;
use tracing::{debug, info};

mod app_config;
mod ble;
mod cli;
mod domain;
mod gatt;
mod light_controller;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    tracing_subscriber::fmt().with_max_level(config.core().log_level()).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let adapter = ble::get_adapter(config.ble().adapter_index()).await?;
    info!("✅  Found Bluetooth adapter");

    if cli.command == Commands::Scan {
        return list_devices(&adapter, &config).await;
    }

    let peripheral = choose_device(&adapter, &config, cli.device.as_deref()).await?;
    let transport = ble::connect(peripheral, config.ble()).await?;
    let controller = LightController::new(transport);
    info!("✅  Connected to device");

    if let Some(output) = cli::run(&controller, &cli.command).await? {
        println!("{}", output);
    }

    Ok(())
}

async fn list_devices(adapter: &Adapter, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("Scanning for devices ({:?})...", config.ble().scan_timeout());

    let result = scan_devices(adapter, config.ble().scan_timeout(), |device, _| {
        println!("  {} {} ({})", device.id, device.address, device.name);
    })
    .await;

    match result {
        Err(ScanError::Timeout(_)) => Ok(()),
        Err(e) => Err(e.into()),
        Ok(_) => Ok(()),
    }
}

async fn choose_device(adapter: &Adapter, config: &AppConfig, target: Option<&str>) -> Result<Peripheral, ScanError> {
    scan_devices(adapter, config.ble().scan_timeout(), |device, selector| {
        if !matches_target(device, target) {
            return;
        }

        match selector.select(device.id.clone()) {
            Ok(()) => info!(device_id = device.id, "Selected device '{}'", device.name),
            Err(e) => debug!(device_id = device.id, "Ignoring '{}': {}", device.name, e),
        }
    })
    .await
}

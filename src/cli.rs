use crate::gatt::Transport;
use crate::light_controller::{LightControlError, LightController};
use clap::{Parser, Subcommand};
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "lumiere")]
#[command(about = "Control a Bluetooth Low Energy smart light", version)]
pub struct Cli {
    /// Device name fragment or address to connect to, defaults to the first named device found
    #[arg(short, long, global = true)]
    pub device: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// List nearby devices until the scan timeout
    Scan,
    /// Print the light state, color and brightness
    Status,
    /// Turn the light on
    On,
    /// Turn the light off
    Off,
    /// Set the color from a hex value such as #ff8800
    Color { hex: String },
    /// Set the color from CIE xy coordinates between 0.0 and 1.0
    Xy { x: f64, y: f64 },
    /// Set the brightness, clamped to 1-254 by the light
    Brightness { value: u8 },
}

/// Runs a control command against a connected light and returns the line to print, if any.
pub async fn execute<T: Transport>(controller: &LightController<T>, command: &Commands) -> Result<Option<String>, LightControlError> {
    match command {
        Commands::Scan => Ok(None),
        Commands::Status => Ok(Some(controller.snapshot().await?.to_string())),
        Commands::On => controller.turn_on_light().await.map(|_| None),
        Commands::Off => controller.turn_off_light().await.map(|_| None),
        Commands::Color { hex } => controller.set_color_hex(hex).await.map(|_| None),
        Commands::Xy { x, y } => controller.set_color_xy(*x, *y).await.map(|_| None),
        Commands::Brightness { value } => controller.set_brightness(*value).await.map(|_| None),
    }
}

/// Runs a control command and then disconnects. A failed disconnect is logged and never replaces the
/// command's own result.
pub async fn run<T: Transport>(controller: &LightController<T>, command: &Commands) -> Result<Option<String>, LightControlError> {
    let result = execute(controller, command).await;

    if let Err(e) = controller.transport().disconnect().await {
        warn!("⚠️ Unable to disconnect: {}", e);
    }
    result
}

pub mod color;
mod coordinate;
mod device;
mod light_snapshot;

pub use coordinate::CartesianCoordinate;
pub use device::DiscoveredDevice;
pub use light_snapshot::LightSnapshot;

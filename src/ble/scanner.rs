use crate::ble::selection::{DeviceSelector, SelectionError, selection};
use crate::domain::DiscoveredDevice;
use btleplug::api::{Central, CentralEvent, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::{Stream, StreamExt};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Returns the Bluetooth adapter at `index` in the order the OS reports them.
#[instrument]
pub async fn get_adapter(index: usize) -> Result<Adapter, ScanError> {
    let manager = Manager::new().await?;
    let adapters = manager.adapters().await?;
    adapters.into_iter().nth(index).ok_or(ScanError::NoAdapter(index))
}

/// Scans until a device is selected through the [`DeviceSelector`] passed to `on_device`.
///
/// `on_device` is called once per device, the first time it advertises a name. The scan ends with
/// [`ScanError::Timeout`] if nothing is selected within `scan_timeout`, and with
/// [`SelectionError::Cancelled`] if the selection is cancelled.
#[instrument(skip(adapter, on_device))]
pub async fn scan_devices<F>(adapter: &Adapter, scan_timeout: Duration, on_device: F) -> Result<Peripheral, ScanError>
where
    F: FnMut(&DiscoveredDevice, &DeviceSelector),
{
    let events = adapter.events().await?;

    info!("📡 Scanning for devices...");
    adapter.start_scan(ScanFilter::default()).await?;

    let result = select_device(sightings(adapter.clone(), events), scan_timeout, on_device).await;

    if let Err(e) = adapter.stop_scan().await {
        warn!("⚠️ Unable to stop scanning: {}", e);
    }
    result
}

/// A peripheral seen in an advertisement, named or not.
struct Sighting<P> {
    id: String,
    address: String,
    local_name: Option<String>,
    peripheral: P,
}

fn sightings(adapter: Adapter, events: impl Stream<Item = CentralEvent>) -> impl Stream<Item = Sighting<Peripheral>> {
    events.filter_map(move |event| {
        let adapter = adapter.clone();
        async move {
            let id = match event {
                CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id) => id,
                _ => return None,
            };

            match adapter.peripheral(&id).await {
                Ok(peripheral) => describe(peripheral).await,
                Err(e) => {
                    warn!("⚠️ Unable to look up discovered peripheral: {}", e);
                    None
                }
            }
        }
    })
}

async fn describe(peripheral: Peripheral) -> Option<Sighting<Peripheral>> {
    let properties = match peripheral.properties().await {
        Ok(properties) => properties,
        Err(e) => {
            warn!("⚠️ Unable to read peripheral properties: {}", e);
            return None;
        }
    };

    Some(Sighting {
        id: peripheral.id().to_string(),
        address: peripheral.address().to_string(),
        local_name: properties.and_then(|properties| properties.local_name),
        peripheral,
    })
}

/// Reports every named sighting once, keyed by id, and resolves to the peripheral that gets selected.
async fn select_device<S, P, F>(sightings: S, scan_timeout: Duration, mut on_device: F) -> Result<P, ScanError>
where
    S: Stream<Item = Sighting<P>>,
    F: FnMut(&DiscoveredDevice, &DeviceSelector),
{
    let (selector, mut pending) = selection();
    let mut discovered: HashMap<String, P> = HashMap::new();

    let sightings = sightings.fuse();
    tokio::pin!(sightings);
    let deadline = sleep(scan_timeout);
    tokio::pin!(deadline);

    let device_id = loop {
        tokio::select! {
            selected = &mut pending => break selected?,
            _ = &mut deadline => {
                selector.cancel();
                return Err(ScanError::Timeout(scan_timeout));
            }
            Some(sighting) = sightings.next() => {
                let Some(name) = sighting.local_name else {
                    continue;
                };
                if discovered.contains_key(&sighting.id) {
                    continue;
                }

                let device = DiscoveredDevice {
                    id: sighting.id,
                    address: sighting.address,
                    name,
                };
                debug!(device_id = device.id, "🔵 Discovered '{}'", device.name);
                discovered.insert(device.id.clone(), sighting.peripheral);
                on_device(&device, &selector);
            }
        }
    };

    info!(device_id, "📡 Scanning for devices... OK, {} found", discovered.len());
    discovered
        .remove(&device_id)
        .ok_or(ScanError::Selection(SelectionError::UnknownDevice(device_id)))
}

/// Whether `device` matches a user supplied name fragment, exact id or address. No target matches anything.
pub fn matches_target(device: &DiscoveredDevice, target: Option<&str>) -> bool {
    match target {
        Some(target) => {
            device.id.eq_ignore_ascii_case(target)
                || device.address.eq_ignore_ascii_case(target)
                || device.name.contains(target)
        }
        None => true,
    }
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("bluetooth error: {0}")]
    Ble(#[from] btleplug::Error),
    #[error("no Bluetooth adapter found at index {0}")]
    NoAdapter(usize),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("no device selected within {0:?}")]
    Timeout(Duration),
}

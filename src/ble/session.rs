use crate::app_config::Ble;
use crate::gatt::uuids::SERVICE_UUID;
use crate::gatt::{Transport, TransportError};
use async_trait::async_trait;
use btleplug::api::{Characteristic, Peripheral as _, WriteType};
use btleplug::platform::Peripheral;
use std::fmt::Display;
use thiserror::Error;
use tokio::time::sleep;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Connects to the selected peripheral and checks that it exposes the light service.
///
/// Establishing the connection is retried with exponential backoff, up to the configured number of
/// attempts. Reads and writes on the returned session are never retried.
#[instrument(skip_all, fields(address = %peripheral.address()))]
pub async fn connect(peripheral: Peripheral, config: &Ble) -> Result<BtleTransport, ConnectError> {
    sleep(config.connect_delay()).await;

    let strategy = ExponentialBackoff::from_millis(config.retry_ms())
        .max_delay(config.retry_max_delay_ms())
        .map(jitter)
        .take(config.connect_attempts().saturating_sub(1));

    info!("🔗 Connecting to device...");
    let device = &peripheral;
    Retry::spawn(strategy, || async move {
        device.connect().await.inspect_err(|e| {
            warn!("⚠️ Unable to connect: {}. Retrying...", e);
        })
    })
    .await?;

    let checked = check_light_service(&peripheral).await;
    disconnect_on_error(checked, peripheral.disconnect()).await?;

    info!("🔗 Connecting to device... OK");
    Ok(BtleTransport { peripheral })
}

async fn check_light_service(peripheral: &Peripheral) -> Result<(), ConnectError> {
    peripheral.discover_services().await?;
    has_light_service(&peripheral.services().into_iter().map(|service| service.uuid).collect::<Vec<_>>())
}

/// Awaits `disconnect` only when `result` is an error. A failed disconnect is logged, the original
/// error is returned.
async fn disconnect_on_error<D, E>(result: Result<(), ConnectError>, disconnect: D) -> Result<(), ConnectError>
where
    D: Future<Output = Result<(), E>>,
    E: Display,
{
    if result.is_err() {
        if let Err(e) = disconnect.await {
            warn!("⚠️ Unable to disconnect after a failed connection: {}", e);
        }
    }
    result
}

fn has_light_service(services: &[Uuid]) -> Result<(), ConnectError> {
    if services.contains(&SERVICE_UUID) {
        Ok(())
    } else {
        Err(ConnectError::ServiceNotFound(SERVICE_UUID))
    }
}

/// A connected peripheral. Characteristics are looked up in the light service on every call.
#[derive(Debug)]
pub struct BtleTransport {
    peripheral: Peripheral,
}

impl BtleTransport {
    fn characteristic(&self, address: Uuid) -> Result<Characteristic, TransportError> {
        self.peripheral
            .characteristics()
            .into_iter()
            .find(|characteristic| characteristic.service_uuid == SERVICE_UUID && characteristic.uuid == address)
            .ok_or(TransportError::CharacteristicNotFound(address))
    }
}

#[async_trait]
impl Transport for BtleTransport {
    async fn read_characteristic(&self, address: Uuid) -> Result<Vec<u8>, TransportError> {
        let characteristic = self.characteristic(address)?;
        Ok(self.peripheral.read(&characteristic).await?)
    }

    async fn write_characteristic(&self, address: Uuid, payload: &[u8]) -> Result<(), TransportError> {
        let characteristic = self.characteristic(address)?;
        self.peripheral.write(&characteristic, payload, WriteType::WithResponse).await?;
        debug!("Wrote to characteristic {}", address);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn disconnect(&self) -> Result<(), TransportError> {
        self.peripheral.disconnect().await?;
        info!("🔌 Disconnected");
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("bluetooth error: {0}")]
    Ble(#[from] btleplug::Error),
    #[error("service '{0}' not found on the device")]
    ServiceNotFound(Uuid),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use test_log::test;

    #[test]
    fn light_service_is_required() {
        let other = Uuid::from_u128(0x1800);

        assert!(has_light_service(&[other, SERVICE_UUID]).is_ok());
        assert!(matches!(
            has_light_service(&[other]),
            Err(ConnectError::ServiceNotFound(uuid)) if uuid == SERVICE_UUID
        ));
    }

    #[test(tokio::test)]
    async fn failed_check_disconnects_and_keeps_its_error() {
        let disconnected = AtomicBool::new(false);

        let result = disconnect_on_error(Err(ConnectError::ServiceNotFound(SERVICE_UUID)), async {
            disconnected.store(true, Ordering::SeqCst);
            Err::<(), _>("link lost")
        })
        .await;

        assert!(disconnected.load(Ordering::SeqCst));
        assert!(matches!(result, Err(ConnectError::ServiceNotFound(_))));
    }

    #[test(tokio::test)]
    async fn successful_check_stays_connected() {
        let disconnected = AtomicBool::new(false);

        let result = disconnect_on_error(Ok(()), async {
            disconnected.store(true, Ordering::SeqCst);
            Ok::<(), String>(())
        })
        .await;

        assert!(result.is_ok());
        assert!(!disconnected.load(Ordering::SeqCst));
    }
}

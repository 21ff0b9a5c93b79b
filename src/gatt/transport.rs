use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;
use uuid::Uuid;

/// Read/write access to the characteristics of one connected peripheral.
#[async_trait]
pub trait Transport: Debug + Send + Sync {
    async fn read_characteristic(&self, address: Uuid) -> Result<Vec<u8>, TransportError>;

    async fn write_characteristic(&self, address: Uuid, payload: &[u8]) -> Result<(), TransportError>;

    async fn disconnect(&self) -> Result<(), TransportError>;
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("bluetooth error: {0}")]
    Ble(#[from] btleplug::Error),
    #[error("characteristic '{0}' not found on the device")]
    CharacteristicNotFound(Uuid),
}

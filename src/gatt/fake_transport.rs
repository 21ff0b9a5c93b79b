use crate::gatt::{Transport, TransportError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory peripheral that serves canned reads and records every write.
#[derive(Debug, Default)]
pub struct FakeTransport {
    values: Mutex<HashMap<Uuid, Vec<u8>>>,
    writes: Mutex<Vec<(Uuid, Vec<u8>)>>,
    failing: Option<Uuid>,
    failing_disconnect: bool,
    disconnected: Mutex<bool>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(self, address: Uuid, payload: &[u8]) -> Self {
        self.values.lock().unwrap().insert(address, payload.to_vec());
        self
    }

    /// Makes every read and write of `address` fail as if it did not exist.
    pub fn failing_on(mut self, address: Uuid) -> Self {
        self.failing = Some(address);
        self
    }

    pub fn failing_disconnect(mut self) -> Self {
        self.failing_disconnect = true;
        self
    }

    pub fn is_disconnected(&self) -> bool {
        *self.disconnected.lock().unwrap()
    }

    pub fn writes(&self) -> Vec<(Uuid, Vec<u8>)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn read_characteristic(&self, address: Uuid) -> Result<Vec<u8>, TransportError> {
        if self.failing == Some(address) {
            return Err(TransportError::CharacteristicNotFound(address));
        }

        self.values
            .lock()
            .unwrap()
            .get(&address)
            .cloned()
            .ok_or(TransportError::CharacteristicNotFound(address))
    }

    async fn write_characteristic(&self, address: Uuid, payload: &[u8]) -> Result<(), TransportError> {
        if self.failing == Some(address) {
            return Err(TransportError::CharacteristicNotFound(address));
        }

        self.writes.lock().unwrap().push((address, payload.to_vec()));
        self.values.lock().unwrap().insert(address, payload.to_vec());
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        if self.failing_disconnect {
            return Err(TransportError::Ble(btleplug::Error::NotConnected));
        }

        *self.disconnected.lock().unwrap() = true;
        Ok(())
    }
}

pub mod codec;
#[cfg(test)]
pub mod fake_transport;
mod transport;
pub mod uuids;

pub use transport::{Transport, TransportError};

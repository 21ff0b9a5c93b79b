mod scanner;
mod selection;
mod session;

pub use scanner::{ScanError, get_adapter, matches_target, scan_devices};
pub use session::connect;

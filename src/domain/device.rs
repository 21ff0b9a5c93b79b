/// A peripheral reported by the scanner, before it is selected and connected.
///
/// `id` is the platform peripheral id. `address` is informational only, some platforms report
/// `00:00:00:00:00:00` for every device.
#[derive(Clone, PartialEq, Debug)]
pub struct DiscoveredDevice {
    pub id: String,
    pub address: String,
    pub name: String,
}

use crate::domain::CartesianCoordinate;
use std::fmt::{Display, Formatter};

/// The state of a light as read right after connecting.
#[derive(Clone, PartialEq, Debug)]
pub struct LightSnapshot {
    pub on: bool,
    pub xy: CartesianCoordinate,
    pub color_hex: String,
    pub brightness: u8,
}

impl Display for LightSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let on_text = if self.on { "on" } else { "off" };
        write!(
            f,
            "light: {}, color: {} (x: {:.4}, y: {:.4}), brightness: {}",
            on_text,
            self.color_hex,
            self.xy.x(),
            self.xy.y(),
            self.brightness
        )
    }
}

use crate::domain::color::{ColorConversionError, FULL_BRIGHTNESS, hex_to_rgb, rgb_to_xy_dim, xy_to_hex};
use crate::domain::{CartesianCoordinate, LightSnapshot};
use crate::gatt::codec::{self, CodecError};
use crate::gatt::uuids::{BRIGHTNESS_UUID, LIGHT_STATE_UUID, XY_COLOR_UUID};
use crate::gatt::{Transport, TransportError};
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Controls one connected light through its GATT characteristics.
///
/// Every operation issues at most one transport call, except [`LightController::set_color_hex`]
/// which writes the color and then the brightness. Callers that control the same light from
/// several tasks have to serialize those calls themselves.
#[derive(Debug)]
pub struct LightController<T: Transport> {
    transport: T,
}

impl<T: Transport> LightController<T> {
    pub fn new(transport: T) -> Self {
        LightController { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[instrument(skip(self))]
    pub async fn turn_on_light(&self) -> Result<(), LightControlError> {
        self.write_light_state(true).await
    }

    #[instrument(skip(self))]
    pub async fn turn_off_light(&self) -> Result<(), LightControlError> {
        self.write_light_state(false).await
    }

    async fn write_light_state(&self, on: bool) -> Result<(), LightControlError> {
        self.transport
            .write_characteristic(LIGHT_STATE_UUID, &codec::encode_light_state(on))
            .await?;

        let on_text = if on { "on" } else { "off" };
        info!("🟢 Turned light {}", on_text);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_light_state(&self) -> Result<bool, LightControlError> {
        let payload = self.transport.read_characteristic(LIGHT_STATE_UUID).await?;
        Ok(codec::decode_light_state(&payload)?)
    }

    #[instrument(skip(self))]
    pub async fn get_color_xy(&self) -> Result<CartesianCoordinate, LightControlError> {
        let payload = self.transport.read_characteristic(XY_COLOR_UUID).await?;
        Ok(codec::decode_xy(&payload)?)
    }

    #[instrument(skip(self))]
    pub async fn get_brightness(&self) -> Result<u8, LightControlError> {
        let payload = self.transport.read_characteristic(BRIGHTNESS_UUID).await?;
        Ok(codec::decode_brightness(&payload)?)
    }

    #[instrument(skip(self))]
    pub async fn set_brightness(&self, brightness: u8) -> Result<(), LightControlError> {
        let payload = codec::encode_brightness(brightness);
        self.transport.write_characteristic(BRIGHTNESS_UUID, &payload).await?;

        info!("🔆 Set brightness to {} (requested {})", payload[0], brightness);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn set_color_xy(&self, x: f64, y: f64) -> Result<(), LightControlError> {
        let payload = codec::encode_xy(&CartesianCoordinate::new(x, y))?;
        self.transport.write_characteristic(XY_COLOR_UUID, &payload).await?;

        info!("🎨 Set color to XY({}, {})", x, y);
        Ok(())
    }

    /// Sets the color picked as `#rrggbb`, writing the chromaticity first and the brightness second.
    ///
    /// The two writes are not atomic: if the brightness write fails the new color stays applied.
    #[instrument(skip(self))]
    pub async fn set_color_hex(&self, hex: &str) -> Result<(), LightControlError> {
        let rgb = hex_to_rgb(hex)?;
        let xy_dim = rgb_to_xy_dim(rgb);
        debug!(?rgb, ?xy_dim, "Converted HEX({})", hex);

        self.set_color_xy(xy_dim.xy.x(), xy_dim.xy.y()).await?;
        self.set_brightness(xy_dim.brightness).await?;

        info!(
            "🎨 Set color to HEX({}) with XY({}, {}) and brightness({})",
            hex,
            xy_dim.xy.x(),
            xy_dim.xy.y(),
            xy_dim.brightness
        );
        Ok(())
    }

    /// Reads light state, color and brightness, in that order.
    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<LightSnapshot, LightControlError> {
        let on = self.get_light_state().await?;
        let xy = self.get_color_xy().await?;
        let color_hex = xy_to_hex(&xy, FULL_BRIGHTNESS)?;
        let brightness = self.get_brightness().await?;

        Ok(LightSnapshot {
            on,
            xy,
            color_hex,
            brightness,
        })
    }
}

#[derive(Error, Debug)]
pub enum LightControlError {
    #[error(transparent)]
    Color(#[from] ColorConversionError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

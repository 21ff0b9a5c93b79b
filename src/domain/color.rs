use crate::domain::CartesianCoordinate;
use thiserror::Error;

/// Relative luminance used when rendering a chromaticity without a known brightness.
pub const FULL_BRIGHTNESS: f64 = 1.0;

/// An sRGB color with every channel normalized to [0.0, 1.0].
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rgb {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Rgb {
    pub fn new(red: f64, green: f64, blue: f64) -> Self {
        Rgb { red, green, blue }
    }

    pub fn to_xy_dim(self) -> XyBrightness {
        rgb_to_xy_dim(self)
    }
}

/// A chromaticity together with the brightness byte the light expects.
#[derive(Clone, PartialEq, Debug)]
pub struct XyBrightness {
    pub xy: CartesianCoordinate,
    pub brightness: u8,
}

#[derive(Error, Debug, PartialEq)]
pub enum ColorConversionError {
    #[error("invalid hexadecimal value '{0}'")]
    InvalidHexFormat(String),
    #[error("cannot derive a color from chromaticity x: {x}, y: {y}")]
    DegenerateChromaticity { x: f64, y: f64 },
}

pub fn hex_to_rgb(hex: &str) -> Result<Rgb, ColorConversionError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorConversionError::InvalidHexFormat(hex.to_string()));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map(|value| value as f64 / 255.0)
            .map_err(|_| ColorConversionError::InvalidHexFormat(hex.to_string()))
    };

    Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Converts a gamma-encoded color into the light's xy chromaticity and a brightness byte.
///
/// The brightness is the largest linearized channel scaled to [0, 255], not the luminance.
/// Black has no chromaticity and maps to `x = y = 0`.
#[allow(non_snake_case)]
pub fn rgb_to_xy_dim(rgb: Rgb) -> XyBrightness {
    let r = gamma_correct(rgb.red);
    let g = gamma_correct(rgb.green);
    let b = gamma_correct(rgb.blue);

    // Device specific wide gamut transform
    let X = r * 0.649926 + g * 0.103455 + b * 0.197109;
    let Y = r * 0.234327 + g * 0.743075 + b * 0.022598;
    let Z = r * 0.0 + g * 0.053077 + b * 1.035763;

    let sum = X + Y + Z;
    let (x, y) = if sum == 0.0 { (0.0, 0.0) } else { (X / sum, Y / sum) };

    let brightness = (r.max(g).max(b) * 255.0).round() as u8;

    XyBrightness {
        xy: CartesianCoordinate::new(x, y),
        brightness,
    }
}

fn gamma_correct(channel: f64) -> f64 {
    if channel > 0.04045 { ((channel + 0.055) / 1.055).powf(2.4) } else { channel / 12.92 }
}

/// Converts xy + Y (relative luminance) back to a gamma-corrected `#rrggbb` string.
///
/// Channels outside the sRGB range are clamped after gamma correction.
#[allow(non_snake_case)]
pub fn xy_to_hex(xy: &CartesianCoordinate, brightness: f64) -> Result<String, ColorConversionError> {
    let x = xy.x();
    let y = xy.y();

    if y == 0.0 || !x.is_finite() || !y.is_finite() {
        return Err(ColorConversionError::DegenerateChromaticity { x, y });
    }

    let X = (x / y) * brightness;
    let Y = brightness;
    let Z = ((1.0 - x - y) / y) * brightness;

    let r_lin = X * 3.2406 + Y * -1.5372 + Z * -0.4986;
    let g_lin = X * -0.9689 + Y * 1.8758 + Z * 0.0415;
    let b_lin = X * 0.0556 + Y * -0.2040 + Z * 1.0572;

    let r = (gamma_correct_rev(r_lin) * 255.0).clamp(0.0, 255.0);
    let g = (gamma_correct_rev(g_lin) * 255.0).clamp(0.0, 255.0);
    let b = (gamma_correct_rev(b_lin) * 255.0).clamp(0.0, 255.0);

    Ok(rgb_to_hex(r, g, b))
}

fn gamma_correct_rev(channel: f64) -> f64 {
    if channel <= 0.0031308 {
        channel * 12.92
    } else {
        1.055 * channel.powf(1.0 / 2.4) - 0.055
    }
}

/// Formats 0–255 channel values as `#rrggbb`. Values must already be within range.
pub fn rgb_to_hex(red: f64, green: f64, blue: f64) -> String {
    format!("#{:02x}{:02x}{:02x}", red.round() as u8, green.round() as u8, blue.round() as u8)
}

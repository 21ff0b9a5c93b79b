use crate::domain::CartesianCoordinate;
use thiserror::Error;

pub const LIGHT_ON: u8 = 0x01;
pub const LIGHT_OFF: u8 = 0x00;

pub const MIN_BRIGHTNESS: u8 = 1;
pub const MAX_BRIGHTNESS: u8 = 254;

const XY_SCALE: f64 = u16::MAX as f64;

#[derive(Error, Debug, PartialEq)]
pub enum CodecError {
    #[error("XY coordinates must be between 0.0 and 1.0, got x: {x}, y: {y}")]
    CoordinateOutOfRange { x: f64, y: f64 },
    #[error("expected a payload of at least {expected} byte(s), got {actual}")]
    PayloadTooShort { expected: usize, actual: usize },
}

pub fn encode_light_state(on: bool) -> [u8; 1] {
    [if on { LIGHT_ON } else { LIGHT_OFF }]
}

/// Only `0x01` means on, any other value is treated as off.
pub fn decode_light_state(payload: &[u8]) -> Result<bool, CodecError> {
    Ok(first_byte(payload)? == LIGHT_ON)
}

/// 0 and 255 are reserved by the light, so the value is clamped to [1, 254].
pub fn encode_brightness(brightness: u8) -> [u8; 1] {
    [clamp_brightness(brightness)]
}

pub fn decode_brightness(payload: &[u8]) -> Result<u8, CodecError> {
    first_byte(payload)
}

pub fn clamp_brightness(brightness: u8) -> u8 {
    brightness.clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS)
}

/// Encodes x and y as two little-endian u16 values scaled by 65535.
pub fn encode_xy(xy: &CartesianCoordinate) -> Result<[u8; 4], CodecError> {
    let (x, y) = (xy.x(), xy.y());
    if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
        return Err(CodecError::CoordinateOutOfRange { x, y });
    }

    let x = ((x * XY_SCALE).round() as u16).to_le_bytes();
    let y = ((y * XY_SCALE).round() as u16).to_le_bytes();

    Ok([x[0], x[1], y[0], y[1]])
}

pub fn decode_xy(payload: &[u8]) -> Result<CartesianCoordinate, CodecError> {
    if payload.len() < 4 {
        return Err(CodecError::PayloadTooShort {
            expected: 4,
            actual: payload.len(),
        });
    }

    let x = u16::from_le_bytes([payload[0], payload[1]]);
    let y = u16::from_le_bytes([payload[2], payload[3]]);

    Ok(CartesianCoordinate::new(x as f64 / XY_SCALE, y as f64 / XY_SCALE))
}

fn first_byte(payload: &[u8]) -> Result<u8, CodecError> {
    payload
        .first()
        .copied()
        .ok_or(CodecError::PayloadTooShort { expected: 1, actual: 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(true, [0x01])]
    #[case(false, [0x00])]
    fn encodes_light_state(#[case] on: bool, #[case] expected: [u8; 1]) {
        assert_eq!(encode_light_state(on), expected);
    }

    #[rstest]
    #[case::on(&[0x01], true)]
    #[case::off(&[0x00], false)]
    #[case::unknown(&[0x02], false)]
    #[case::all_bits(&[0xff], false)]
    #[case::trailing_bytes(&[0x01, 0x00], true)]
    fn decodes_light_state(#[case] payload: &[u8], #[case] expected: bool) {
        assert_eq!(decode_light_state(payload), Ok(expected));
    }

    #[test]
    fn decoding_an_empty_light_state_fails() {
        assert_eq!(decode_light_state(&[]), Err(CodecError::PayloadTooShort { expected: 1, actual: 0 }));
    }

    #[rstest]
    #[case::zero(0, 1)]
    #[case::minimum(1, 1)]
    #[case::middle(128, 128)]
    #[case::maximum(254, 254)]
    #[case::reserved(255, 254)]
    fn clamps_brightness_before_encoding(#[case] brightness: u8, #[case] expected: u8) {
        assert_eq!(encode_brightness(brightness), [expected]);
    }

    #[rstest]
    #[case(&[0x00], 0)]
    #[case(&[0xff], 255)]
    fn decodes_brightness_without_clamping(#[case] payload: &[u8], #[case] expected: u8) {
        assert_eq!(decode_brightness(payload), Ok(expected));
    }

    #[test]
    fn encodes_the_d65_white_point_little_endian() {
        let payload = encode_xy(&CartesianCoordinate::new(0.3127, 0.3290));

        // 20493 = 0x500d, 21561 = 0x5439
        assert_eq!(payload, Ok([0x0d, 0x50, 0x39, 0x54]));
    }

    #[test]
    fn decoding_recovers_the_encoded_coordinate() {
        let payload = encode_xy(&CartesianCoordinate::new(0.3127, 0.3290)).unwrap();
        let xy = decode_xy(&payload).unwrap();

        assert!((xy.x() - 0.3127).abs() <= 1.0 / 65535.0);
        assert!((xy.y() - 0.3290).abs() <= 1.0 / 65535.0);
    }

    #[test]
    fn encodes_the_bounds() {
        assert_eq!(encode_xy(&CartesianCoordinate::new(0.0, 1.0)), Ok([0x00, 0x00, 0xff, 0xff]));
    }

    #[rstest]
    #[case::x_too_large(1.5, 0.5)]
    #[case::x_negative(-0.1, 0.5)]
    #[case::y_too_large(0.5, 1.0001)]
    #[case::not_a_number(f64::NAN, 0.5)]
    fn rejects_coordinates_outside_the_unit_range(#[case] x: f64, #[case] y: f64) {
        let result = encode_xy(&CartesianCoordinate::new(x, y));

        assert!(matches!(result, Err(CodecError::CoordinateOutOfRange { .. })));
    }

    #[test]
    fn decoding_a_truncated_xy_payload_fails() {
        assert_eq!(decode_xy(&[0x0d, 0x50, 0x39]), Err(CodecError::PayloadTooShort { expected: 4, actual: 3 }));
    }
}

use uuid::{Uuid, uuid};

pub const SERVICE_UUID: Uuid = uuid!("932c32bd-0000-47a2-835a-a8d455b859dd");

pub const LIGHT_STATE_UUID: Uuid = uuid!("932c32bd-0002-47a2-835a-a8d455b859dd");
pub const BRIGHTNESS_UUID: Uuid = uuid!("932c32bd-0003-47a2-835a-a8d455b859dd");
pub const XY_COLOR_UUID: Uuid = uuid!("932c32bd-0005-47a2-835a-a8d455b859dd");

// 16-bit 0xfe0f on the Bluetooth base UUID, exposed by the light but not controlled here
#[allow(dead_code)]
pub const HUE_UUID: Uuid = uuid!("0000fe0f-0000-1000-8000-00805f9b34fb");

#[cfg(test)]
mod tests {
    use super::*;
    use btleplug::api::bleuuid::uuid_from_u16;

    #[test]
    fn hue_uuid_is_the_16_bit_fe0f_alias() {
        assert_eq!(HUE_UUID, uuid_from_u16(0xfe0f));
    }

    #[test]
    fn control_points_live_under_the_light_service() {
        let service_prefix = &SERVICE_UUID.as_bytes()[..2];

        for uuid in [LIGHT_STATE_UUID, BRIGHTNESS_UUID, XY_COLOR_UUID] {
            assert_eq!(&uuid.as_bytes()[..2], service_prefix);
        }
    }
}

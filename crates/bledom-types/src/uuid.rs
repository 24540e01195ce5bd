//! Bluetooth identifiers for ELK-BLEDOM controllers.
//!
//! The controllers expose a single vendor service with a write-only control
//! characteristic. Everything the strip can do goes through that one
//! characteristic.

use uuid::{Uuid, uuid};

/// Vendor service carrying the control characteristic.
pub const CONTROL_SERVICE: Uuid = uuid!("0000fff0-0000-1000-8000-00805f9b34fb");

/// Control characteristic that accepts 9-byte command frames.
pub const CONTROL_CHARACTERISTIC: Uuid = uuid!("0000fff3-0000-1000-8000-00805f9b34fb");

/// Advertised local-name prefix of ELK-BLEDOM controllers.
pub const DEVICE_NAME_PREFIX: &str = "ELK";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_service_uuid() {
        assert_eq!(
            CONTROL_SERVICE.to_string(),
            "0000fff0-0000-1000-8000-00805f9b34fb"
        );
    }

    #[test]
    fn test_control_characteristic_uuid() {
        assert_eq!(
            CONTROL_CHARACTERISTIC.to_string(),
            "0000fff3-0000-1000-8000-00805f9b34fb"
        );
    }

    #[test]
    fn test_uuids_share_bluetooth_base() {
        // Both are 16-bit UUIDs expanded on the Bluetooth base UUID.
        let base_suffix = "-0000-1000-8000-00805f9b34fb";
        assert!(CONTROL_SERVICE.to_string().ends_with(base_suffix));
        assert!(CONTROL_CHARACTERISTIC.to_string().ends_with(base_suffix));
        assert_ne!(CONTROL_SERVICE, CONTROL_CHARACTERISTIC);
    }
}

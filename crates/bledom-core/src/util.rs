//! Peripheral identifier helpers.

use btleplug::platform::PeripheralId;

/// Address CoreBluetooth reports for every peripheral.
const PLACEHOLDER_ADDRESS: &str = "00:00:00:00:00:00";

/// Format a peripheral ID as a plain string.
///
/// On macOS, peripheral IDs are UUIDs. On other platforms they wrap the
/// Bluetooth address. Either way the `PeripheralId(...)` wrapper is removed.
pub fn format_peripheral_id(id: &PeripheralId) -> String {
    strip_id_wrapper(&format!("{:?}", id)).to_string()
}

/// Create an identifier string from an address and peripheral ID.
///
/// Uses the Bluetooth address when there is a real one, the peripheral ID
/// otherwise (macOS).
pub fn create_identifier(address: &str, peripheral_id: &PeripheralId) -> String {
    if is_placeholder_address(address) {
        format_peripheral_id(peripheral_id)
    } else {
        address.to_string()
    }
}

fn is_placeholder_address(address: &str) -> bool {
    address == PLACEHOLDER_ADDRESS
}

fn strip_id_wrapper(debug: &str) -> &str {
    debug
        .trim_start_matches("PeripheralId(")
        .trim_end_matches(')')
}

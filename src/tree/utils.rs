//! Shared utility functions for tree walking and display

/// Base-1024 units, smallest first.
const UNITS: [char; 9] = ['b', 'K', 'M', 'G', 'T', 'P', 'E', 'Z', 'Y'];

/// A value is shown in the first unit where it stays below this many units.
const UNIT_LIMIT: u128 = 7000;

/// Format a size in bytes with four fractional digits, e.g. `6.8359K`.
///
/// `None` formats as `-`.
pub fn format_size(bytes: Option<u64>) -> String {
    let Some(bytes) = bytes else {
        return "-".to_string();
    };
    let size = u128::from(bytes);
    let mut scale: u128 = 1;
    let mut unit = UNITS[0];
    for (i, &u) in UNITS.iter().enumerate() {
        scale = 1024u128.pow(i as u32);
        unit = u;
        if size < UNIT_LIMIT * scale {
            break;
        }
    }
    format!("{:4.4}{}", size as f64 / scale as f64, unit)
}

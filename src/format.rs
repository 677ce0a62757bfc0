//! Text helpers for the report
//!
//! Each helper returns a fresh `String`; field widths are part of the output
//! format that scripts parse, so keep them stable.

use crate::types::ModeInfo;

/// `a, b, c` for a list of ids or values, empty for an empty list
pub fn id_list<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Capability value as decimal, at most 9 digits
pub fn capability_value(value: u64) -> String {
    let mut text = value.to_string();
    text.truncate(9);
    text
}

/// `N` or `N: a, b, c`
pub fn counted_list<T: ToString>(values: &[T]) -> String {
    if values.is_empty() {
        "0".to_string()
    } else {
        format!("{}: {}", values.len(), id_list(values))
    }
}

/// Set bit indices of `mask`, ascending, as `00, 01, 03`; `NONE` when zero
pub fn bit_list(mask: u32) -> String {
    if mask == 0 {
        return "NONE".to_string();
    }
    (0..u32::BITS)
        .filter(|bit| mask & (1 << bit) != 0)
        .map(|bit| format!("{:02}", bit))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Bit list followed by the raw mask in decimal, hex and octal
pub fn bitmask(mask: u32) -> String {
    format!("{} ({}, 0x{:08x}, {:016o})", bit_list(mask), mask, mask, mask)
}

/// One display mode on a single line
///
/// Name, resolution, refresh, then `(clock hss hse htot hskew vss vse vtot vscan)`,
/// flags and type.
pub fn mode_line(mode: &ModeInfo) -> String {
    format!(
        "{:<10} {:>4}x{:>4} {:>3}fps ({:>6} {:>4} {:>4} {:>4} {:>2} {:>4} {:>4} {:>4} {:>2}) 0x{:08x} {:>5}",
        mode.name,
        mode.hdisplay,
        mode.vdisplay,
        mode.vrefresh,
        mode.clock,
        mode.hsync_start,
        mode.hsync_end,
        mode.htotal,
        mode.hskew,
        mode.vsync_start,
        mode.vsync_end,
        mode.vtotal,
        mode.vscan,
        mode.flags,
        mode.mode_type as i32,
    )
}

/// First four bytes of a blob as a big-endian word
pub fn blob_word(data: &[u8]) -> Option<u32> {
    let head: [u8; 4] = data.get(..4)?.try_into().ok()?;
    Some(u32::from_be_bytes(head))
}

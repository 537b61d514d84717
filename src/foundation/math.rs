use crate::composite::settings::Rounding;

pub(crate) const CHANNEL_MAX: f32 = 255.0;

pub(crate) fn normalize(c: u8) -> f32 {
    f32::from(c) / CHANNEL_MAX
}

/// Scale a normalized value back to 8 bits. Saturates at both ends; NaN maps to 0.
pub(crate) fn denormalize(v: f32, rounding: Rounding) -> u8 {
    let scaled = v * CHANNEL_MAX;
    if scaled.is_nan() {
        return 0;
    }
    let rounded = match rounding {
        Rounding::Nearest => (scaled + 0.5).floor(),
        Rounding::Truncate => scaled.trunc(),
    };
    rounded.clamp(0.0, CHANNEL_MAX) as u8
}

pub(crate) fn pixel(bytes: &[u8]) -> [u8; 4] {
    [bytes[0], bytes[1], bytes[2], bytes[3]]
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;

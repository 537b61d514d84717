use super::*;

#[test]
fn normalize_spans_unit_interval() {
    assert_eq!(normalize(0), 0.0);
    assert_eq!(normalize(255), 1.0);
    assert!((normalize(51) - 0.2).abs() < 1e-6);
}

#[test]
fn denormalize_inverts_normalize_for_every_byte() {
    for c in 0..=255u8 {
        assert_eq!(denormalize(normalize(c), Rounding::Nearest), c);
    }
}

#[test]
fn half_steps_follow_the_rounding_rule() {
    let half = 127.5 / CHANNEL_MAX;
    assert_eq!(denormalize(half, Rounding::Nearest), 128);
    assert_eq!(denormalize(half, Rounding::Truncate), 127);
}

#[test]
fn out_of_range_values_saturate_instead_of_wrapping() {
    assert_eq!(denormalize(1.5, Rounding::Nearest), 255);
    assert_eq!(denormalize(1.5, Rounding::Truncate), 255);
    assert_eq!(denormalize(-0.25, Rounding::Nearest), 0);
    assert_eq!(denormalize(f32::INFINITY, Rounding::Nearest), 255);
    assert_eq!(denormalize(f32::NAN, Rounding::Truncate), 0);
}

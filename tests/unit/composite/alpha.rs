use image::Rgba;

use super::*;

fn checker(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let a = if (x + y) % 2 == 0 { 0 } else { 204 };
        Rgba([10, 20, 30, a])
    })
}

#[test]
fn new_rejects_wrong_value_count() {
    let err = AlphaGrid::new(2, 2, vec![0.5; 3]).unwrap_err();
    assert!(matches!(err, BlendError::Validation(_)));
    assert!(AlphaGrid::new(2, 2, vec![0.5; 4]).is_ok());
}

#[test]
fn from_fn_is_row_major() {
    let grid = AlphaGrid::from_fn(3, 2, |x, y| (y * 10 + x) as f32);
    assert_eq!(grid.values(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
    assert_eq!(grid.get(2, 1), Some(12.0));
    assert_eq!(grid.get(3, 0), None);
}

#[test]
fn from_alpha_channel_normalizes() {
    let grid = AlphaGrid::from_alpha_channel(&checker(2, 1));
    assert_eq!(grid.dimensions(), (2, 1));
    assert_eq!(grid.values()[0], 0.0);
    assert!((grid.values()[1] - 0.8).abs() < 1e-6);
}

#[test]
fn uniform_and_filled_grid_resolve_to_same_lookups() {
    let uniform = AlphaSource::uniform(0.25);
    let grid = AlphaSource::from(AlphaGrid::filled(3, 2, 0.25));

    let a = uniform.resolve((3, 2), AlphaRangePolicy::Clamp).unwrap();
    let b = grid.resolve((3, 2), AlphaRangePolicy::Clamp).unwrap();
    for idx in 0..6 {
        assert_eq!(a.at(idx), b.at(idx));
    }
}

#[test]
fn grid_shape_must_match_image() {
    let src = AlphaSource::from(AlphaGrid::filled(2, 3, 1.0));
    let err = src.resolve((3, 2), AlphaRangePolicy::Clamp).unwrap_err();
    match err {
        BlendError::AlphaShapeMismatch { expected, got } => {
            assert_eq!(expected, (3, 2));
            assert_eq!(got, (2, 3));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn out_of_range_values_follow_policy() {
    let src = AlphaSource::from(1.5);
    let clamped = src.resolve((1, 1), AlphaRangePolicy::Clamp).unwrap();
    assert_eq!(clamped.at(0), 1.0);
    assert!(matches!(
        src.resolve((1, 1), AlphaRangePolicy::Reject),
        Err(BlendError::InvalidAlpha { .. })
    ));

    let grid = AlphaSource::from(AlphaGrid::new(2, 1, vec![-0.5, 0.5]).unwrap());
    let clamped = grid.resolve((2, 1), AlphaRangePolicy::Clamp).unwrap();
    assert_eq!(clamped.at(0), 0.0);
    assert_eq!(clamped.at(1), 0.5);
    assert!(grid.resolve((2, 1), AlphaRangePolicy::Reject).is_err());
}

#[test]
fn in_range_grid_is_borrowed() {
    let grid = AlphaSource::from(AlphaGrid::filled(2, 2, 0.5));
    let resolved = grid.resolve((2, 2), AlphaRangePolicy::Clamp).unwrap();
    assert!(matches!(resolved, ResolvedAlpha::PerPixel(Cow::Borrowed(_))));
}

#[test]
fn non_finite_alpha_is_always_rejected() {
    for v in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
        assert!(AlphaSource::from(v)
            .resolve((1, 1), AlphaRangePolicy::Clamp)
            .is_err());
    }
}

#[test]
fn mask_flags_exactly_the_zero_alpha_pixels() {
    let mask = TransparencyMask::from_image(&checker(3, 3));
    assert_eq!(mask.dimensions(), (3, 3));
    assert_eq!(mask.count(), 5);
    assert!(mask.is_transparent(0, 0));
    assert!(!mask.is_transparent(1, 0));
    assert!(mask.is_transparent(1, 1));
    assert!(!mask.is_transparent(9, 9));
}

#[test]
fn mask_ignores_nearly_transparent_pixels() {
    let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 1]));
    assert_eq!(TransparencyMask::from_image(&img).count(), 0);
}

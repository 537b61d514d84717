use image::Rgba;

use super::*;
use crate::{AlphaGrid, AlphaRangePolicy, BlendError};

fn solid(width: u32, height: u32, px: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(px))
}

#[test]
fn red_half_over_blue_rounds_half_up() {
    let out = composite_add(
        &solid(2, 2, [255, 0, 0, 255]),
        &solid(2, 2, [0, 0, 255, 255]),
        &AlphaSource::uniform(0.5),
        &AlphaSource::uniform(1.0),
        false,
    )
    .unwrap();
    assert_eq!(out.dimensions(), (2, 2));
    assert!(out.pixels().all(|p| p.0 == [128, 0, 128, 255]));
}

#[test]
fn truncate_reproduces_legacy_bytes() {
    let settings = CompositeSettings {
        rounding: Rounding::Truncate,
        ..CompositeSettings::default()
    };
    let out = composite_add_with(
        &solid(1, 1, [255, 0, 0, 255]),
        &solid(1, 1, [0, 0, 255, 255]),
        &AlphaSource::uniform(0.5),
        &AlphaSource::uniform(1.0),
        false,
        &settings,
    )
    .unwrap();
    assert_eq!(out.get_pixel(0, 0).0, [127, 0, 127, 255]);
}

#[test]
fn full_opacity_foreground_occludes_background() {
    let l1 = solid(3, 1, [10, 200, 30, 255]);
    let l2 = solid(3, 1, [250, 1, 99, 255]);
    for a2 in [0.0, 0.3, 1.0] {
        let out = composite_add(
            &l1,
            &l2,
            &AlphaSource::uniform(1.0),
            &AlphaSource::uniform(a2),
            false,
        )
        .unwrap();
        assert!(out.pixels().all(|p| p.0 == [10, 200, 30, 255]));
    }
}

#[test]
fn zero_opacity_foreground_leaves_background() {
    let l2 = solid(2, 2, [250, 1, 99, 255]);
    let out = composite_add(
        &solid(2, 2, [10, 200, 30, 255]),
        &l2,
        &AlphaSource::uniform(0.0),
        &AlphaSource::uniform(1.0),
        false,
    )
    .unwrap();
    assert_eq!(out, l2);
}

#[test]
fn mask_zeroes_only_transparent_source_pixels() {
    let l1 = RgbaImage::from_fn(2, 1, |x, _| {
        if x == 0 {
            Rgba([90, 90, 90, 0])
        } else {
            Rgba([90, 90, 90, 255])
        }
    });
    let l2 = solid(2, 1, [0, 200, 0, 255]);
    let a1 = AlphaSource::uniform(0.8);
    let a2 = AlphaSource::uniform(1.0);

    let masked = composite_add(&l1, &l2, &a1, &a2, true).unwrap();
    let plain = composite_add(&l1, &l2, &a1, &a2, false).unwrap();

    assert_eq!(masked.get_pixel(0, 0).0, [0, 0, 0, 0]);
    assert_ne!(plain.get_pixel(0, 0).0, [0, 0, 0, 0]);
    assert_eq!(masked.get_pixel(1, 0), plain.get_pixel(1, 0));
}

#[test]
fn per_pixel_alpha_selects_layers_per_pixel() {
    let grid = AlphaGrid::new(2, 1, vec![1.0, 0.0]).unwrap();
    let out = composite_add(
        &solid(2, 1, [255, 0, 0, 255]),
        &solid(2, 1, [0, 0, 255, 255]),
        &AlphaSource::from(grid),
        &AlphaSource::uniform(1.0),
        false,
    )
    .unwrap();
    assert_eq!(out.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(out.get_pixel(1, 0).0, [0, 0, 255, 255]);
}

#[test]
fn uniform_and_filled_grid_are_identical() {
    let l1 = RgbaImage::from_fn(7, 5, |x, y| Rgba([(x * 30) as u8, (y * 40) as u8, 128, (x * y * 9) as u8]));
    let l2 = RgbaImage::from_fn(7, 5, |x, y| Rgba([200, (x * 20) as u8, (y * 50) as u8, 255]));
    for k in [0.0, 0.31, 0.5, 0.97, 1.0] {
        let uniform = composite_add(
            &l1,
            &l2,
            &AlphaSource::uniform(k),
            &AlphaSource::uniform(1.0 - k),
            true,
        )
        .unwrap();
        let grid = composite_add(
            &l1,
            &l2,
            &AlphaSource::from(AlphaGrid::filled(7, 5, k)),
            &AlphaSource::from(AlphaGrid::filled(7, 5, 1.0 - k)),
            true,
        )
        .unwrap();
        assert_eq!(uniform, grid, "k = {k}");
    }
}

#[test]
fn validation_runs_before_any_work() {
    let l = solid(2, 2, [1, 2, 3, 4]);
    let err = composite_add(
        &l,
        &solid(2, 1, [1, 2, 3, 4]),
        &AlphaSource::uniform(0.5),
        &AlphaSource::uniform(0.5),
        false,
    )
    .unwrap_err();
    assert!(matches!(err, BlendError::DimensionMismatch { .. }));

    let err = composite_add(
        &l,
        &l,
        &AlphaSource::from(AlphaGrid::filled(1, 4, 0.5)),
        &AlphaSource::uniform(0.5),
        false,
    )
    .unwrap_err();
    assert!(matches!(err, BlendError::AlphaShapeMismatch { .. }));

    let err = composite_add(
        &l,
        &l,
        &AlphaSource::uniform(0.5),
        &AlphaSource::uniform(f32::NAN),
        false,
    )
    .unwrap_err();
    assert!(matches!(err, BlendError::InvalidAlpha { .. }));
}

#[test]
fn out_of_range_alpha_is_clamped_or_rejected() {
    let l1 = solid(1, 1, [255, 0, 0, 255]);
    let l2 = solid(1, 1, [0, 0, 255, 255]);

    let clamped = composite_add(
        &l1,
        &l2,
        &AlphaSource::uniform(1.5),
        &AlphaSource::uniform(1.0),
        false,
    )
    .unwrap();
    assert_eq!(clamped.get_pixel(0, 0).0, [255, 0, 0, 255]);

    let strict = CompositeSettings {
        alpha_range: AlphaRangePolicy::Reject,
        ..CompositeSettings::default()
    };
    let err = composite_add_with(
        &l1,
        &l2,
        &AlphaSource::uniform(1.5),
        &AlphaSource::uniform(1.0),
        false,
        &strict,
    )
    .unwrap_err();
    assert!(matches!(err, BlendError::InvalidAlpha { value } if value == 1.5));
}

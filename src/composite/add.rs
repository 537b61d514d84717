//! Weighted blend of two layers with explicit opacities.
//!
//! Each layer's straight color is premultiplied by the opacity it is given, then the layers are
//! combined with premultiplied "over":
//!
//! ```text
//! rgb1   = layer1.rgb * alpha1
//! rgb2   = layer2.rgb * alpha2
//! outRGB = rgb1 + rgb2 * (1 - alpha1)
//! outA   = alpha1 + alpha2 * (1 - alpha1)
//! ```
//!
//! The layers' own alpha channels do not enter the formula. With masking enabled, `layer1`'s
//! alpha channel only decides which output pixels are forced to `(0, 0, 0, 0)`.

use image::RgbaImage;

use crate::{
    composite::{
        alpha::{AlphaSource, TransparencyMask},
        ensure_same_dimensions,
        exec::for_each_row,
        into_image, row_bytes,
        settings::{CompositeSettings, Rounding},
    },
    foundation::{
        error::BlendResult,
        math::{denormalize, normalize, pixel},
    },
};

/// Blend `layer1` over `layer2` with opacities `alpha1`/`alpha2`, using default settings.
///
/// When `apply_mask` is set, every pixel whose alpha byte in `layer1` is exactly 0 comes out
/// as `(0, 0, 0, 0)`, whatever the opacities are.
pub fn composite_add(
    layer1: &RgbaImage,
    layer2: &RgbaImage,
    alpha1: &AlphaSource,
    alpha2: &AlphaSource,
    apply_mask: bool,
) -> BlendResult<RgbaImage> {
    composite_add_with(
        layer1,
        layer2,
        alpha1,
        alpha2,
        apply_mask,
        &CompositeSettings::default(),
    )
}

/// [`composite_add`] with explicit settings.
#[tracing::instrument(
    skip(layer1, layer2, alpha1, alpha2, settings),
    fields(width = layer1.width(), height = layer1.height())
)]
pub fn composite_add_with(
    layer1: &RgbaImage,
    layer2: &RgbaImage,
    alpha1: &AlphaSource,
    alpha2: &AlphaSource,
    apply_mask: bool,
    settings: &CompositeSettings,
) -> BlendResult<RgbaImage> {
    settings.validate()?;
    let (width, height) = ensure_same_dimensions(layer1, layer2)?;
    let a1 = alpha1.resolve((width, height), settings.alpha_range)?;
    let a2 = alpha2.resolve((width, height), settings.alpha_range)?;

    let mask = apply_mask.then(|| TransparencyMask::from_image(layer1));
    if let Some(mask) = &mask {
        tracing::debug!(masked = mask.count(), "captured transparency mask");
    }

    let rounding = settings.rounding;
    let row_len = width as usize * 4;
    let mut out = vec![0u8; row_len * height as usize];
    for_each_row(&mut out, row_len, &settings.threading, |y, row| {
        let row_start = y * width as usize;
        let l1_row = row_bytes(layer1, y);
        let l2_row = row_bytes(layer2, y);
        for (x, ((o, p1), p2)) in row
            .chunks_exact_mut(4)
            .zip(l1_row.chunks_exact(4))
            .zip(l2_row.chunks_exact(4))
            .enumerate()
        {
            let idx = row_start + x;
            let blended = add_pixel(pixel(p1), pixel(p2), a1.at(idx), a2.at(idx), rounding);
            if mask.as_ref().is_some_and(|m| m.at(idx)) {
                o.fill(0);
            } else {
                o.copy_from_slice(&blended);
            }
        }
    })?;

    into_image(width, height, out)
}

pub(crate) fn add_pixel(
    p1: [u8; 4],
    p2: [u8; 4],
    alpha1: f32,
    alpha2: f32,
    rounding: Rounding,
) -> [u8; 4] {
    let inv = 1.0 - alpha1;
    let mut out = [0u8; 4];
    for i in 0..3 {
        let rgb1 = normalize(p1[i]) * alpha1;
        let rgb2 = normalize(p2[i]) * alpha2;
        out[i] = denormalize(rgb1 + rgb2 * inv, rounding);
    }
    out[3] = denormalize(alpha1 + alpha2 * inv, rounding);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/composite/add.rs"]
mod tests;

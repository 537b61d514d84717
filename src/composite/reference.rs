//! Pixel-at-a-time reference implementations.
//!
//! These walk the image with explicit `(x, y)` loops and run each stage as a separate pass,
//! mirroring the textbook formulation. They exist to cross-check the row-wise implementations
//! and always run on the calling thread; `settings.threading` is ignored.

use image::{Rgba, RgbaImage};

use crate::{
    composite::{
        add::add_pixel,
        alpha::{AlphaSource, TransparencyMask},
        ensure_same_dimensions,
        over::{coverage, over_rgb, pack},
        settings::CompositeSettings,
    },
    foundation::{
        error::{BlendError, BlendResult},
        math::normalize,
    },
};

/// Unguarded straight-alpha "over".
///
/// Unlike [`crate::composite_over`], this fails with [`BlendError::ZeroCoverage`] at the first
/// pixel (in row-major order) where both layers are fully transparent.
pub fn composite_over_reference(
    src: &RgbaImage,
    dst: &RgbaImage,
    settings: &CompositeSettings,
) -> BlendResult<RgbaImage> {
    settings.validate()?;
    let (width, height) = ensure_same_dimensions(src, dst)?;

    let mut out = RgbaImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let s = src.get_pixel(x, y).0;
            let d = dst.get_pixel(x, y).0;
            let src_a = normalize(s[3]);
            let dst_a = normalize(d[3]);

            let out_a = coverage(src_a, dst_a);
            if out_a == 0.0 {
                return Err(BlendError::ZeroCoverage { x, y });
            }
            let rgb = over_rgb(s, src_a, d, dst_a, out_a);
            out.put_pixel(x, y, Rgba(pack(rgb, out_a, settings.rounding)));
        }
    }
    Ok(out)
}

/// Weighted blend computed pixel by pixel, with the mask applied as a final pass.
pub fn composite_add_reference(
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

    let mut out = RgbaImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let idx = y as usize * width as usize + x as usize;
            let blended = add_pixel(
                layer1.get_pixel(x, y).0,
                layer2.get_pixel(x, y).0,
                a1.at(idx),
                a2.at(idx),
                settings.rounding,
            );
            out.put_pixel(x, y, Rgba(blended));
        }
    }

    if let Some(mask) = mask {
        for y in 0..height {
            for x in 0..width {
                if mask.is_transparent(x, y) {
                    out.put_pixel(x, y, Rgba([0, 0, 0, 0]));
                }
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/composite/reference.rs"]
mod tests;

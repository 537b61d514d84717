//! Straight-alpha Porter-Duff "over".
//!
//! Both operands carry their opacity in their own alpha channel. The blended color is
//! un-premultiplied by dividing by the output coverage, so this path owns the only division in
//! the crate. A pixel where both layers are fully transparent has zero coverage and composites
//! to `(0, 0, 0, 0)`.

use image::RgbaImage;

use crate::{
    composite::{
        ensure_same_dimensions, exec::for_each_row, into_image, row_bytes,
        settings::{CompositeSettings, Rounding},
    },
    foundation::{
        error::BlendResult,
        math::{denormalize, normalize, pixel},
    },
};

/// Composite `src` over `dst` with default [`CompositeSettings`].
///
/// ```text
/// outA   = srcA + dstA * (1 - srcA)
/// outRGB = (srcRGB * srcA + dstRGB * dstA * (1 - srcA)) / outA
/// ```
pub fn composite_over(src: &RgbaImage, dst: &RgbaImage) -> BlendResult<RgbaImage> {
    composite_over_with(src, dst, &CompositeSettings::default())
}

/// [`composite_over`] with explicit settings.
#[tracing::instrument(skip_all, fields(width = src.width(), height = src.height()))]
pub fn composite_over_with(
    src: &RgbaImage,
    dst: &RgbaImage,
    settings: &CompositeSettings,
) -> BlendResult<RgbaImage> {
    settings.validate()?;
    let (width, height) = ensure_same_dimensions(src, dst)?;
    let rounding = settings.rounding;

    let row_len = width as usize * 4;
    let mut out = vec![0u8; row_len * height as usize];
    for_each_row(&mut out, row_len, &settings.threading, |y, row| {
        let s_row = row_bytes(src, y);
        let d_row = row_bytes(dst, y);
        for ((o, s), d) in row
            .chunks_exact_mut(4)
            .zip(s_row.chunks_exact(4))
            .zip(d_row.chunks_exact(4))
        {
            o.copy_from_slice(&over_pixel(pixel(s), pixel(d), rounding));
        }
    })?;

    into_image(width, height, out)
}

/// Composite `src` over a background that is treated as fully opaque.
///
/// `dst`'s alpha channel is ignored: `outA = 1` and
/// `outRGB = srcRGB * srcA + dstRGB * (1 - srcA)`. For an opaque `dst` this agrees with
/// [`composite_over`] up to rounding, without the division.
pub fn composite_over_opaque(src: &RgbaImage, dst: &RgbaImage) -> BlendResult<RgbaImage> {
    composite_over_opaque_with(src, dst, &CompositeSettings::default())
}

/// [`composite_over_opaque`] with explicit settings.
#[tracing::instrument(skip_all, fields(width = src.width(), height = src.height()))]
pub fn composite_over_opaque_with(
    src: &RgbaImage,
    dst: &RgbaImage,
    settings: &CompositeSettings,
) -> BlendResult<RgbaImage> {
    settings.validate()?;
    let (width, height) = ensure_same_dimensions(src, dst)?;
    let rounding = settings.rounding;

    let row_len = width as usize * 4;
    let mut out = vec![0u8; row_len * height as usize];
    for_each_row(&mut out, row_len, &settings.threading, |y, row| {
        let s_row = row_bytes(src, y);
        let d_row = row_bytes(dst, y);
        for ((o, s), d) in row
            .chunks_exact_mut(4)
            .zip(s_row.chunks_exact(4))
            .zip(d_row.chunks_exact(4))
        {
            let sa = normalize(s[3]);
            for i in 0..3 {
                o[i] = denormalize(normalize(s[i]) * sa + normalize(d[i]) * (1.0 - sa), rounding);
            }
            o[3] = u8::MAX;
        }
    })?;

    into_image(width, height, out)
}

pub(crate) fn coverage(src_a: f32, dst_a: f32) -> f32 {
    src_a + dst_a * (1.0 - src_a)
}

/// Un-premultiplied color of "over". Caller guarantees `out_a > 0`.
pub(crate) fn over_rgb(src: [u8; 4], src_a: f32, dst: [u8; 4], dst_a: f32, out_a: f32) -> [f32; 3] {
    std::array::from_fn(|i| {
        (normalize(src[i]) * src_a + normalize(dst[i]) * dst_a * (1.0 - src_a)) / out_a
    })
}

pub(crate) fn pack(rgb: [f32; 3], a: f32, rounding: Rounding) -> [u8; 4] {
    [
        denormalize(rgb[0], rounding),
        denormalize(rgb[1], rounding),
        denormalize(rgb[2], rounding),
        denormalize(a, rounding),
    ]
}

fn over_pixel(src: [u8; 4], dst: [u8; 4], rounding: Rounding) -> [u8; 4] {
    let src_a = normalize(src[3]);
    let dst_a = normalize(dst[3]);
    let out_a = coverage(src_a, dst_a);
    if out_a == 0.0 {
        return [0; 4];
    }
    pack(over_rgb(src, src_a, dst, dst_a, out_a), out_a, rounding)
}

#[cfg(test)]
#[path = "../../tests/unit/composite/over.rs"]
mod tests;

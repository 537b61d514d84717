pub(crate) mod add;
pub(crate) mod alpha;
pub(crate) mod exec;
pub(crate) mod over;
pub(crate) mod reference;
pub(crate) mod settings;

use image::RgbaImage;

use crate::foundation::error::{BlendError, BlendResult};

pub(crate) fn ensure_same_dimensions(a: &RgbaImage, b: &RgbaImage) -> BlendResult<(u32, u32)> {
    if a.dimensions() != b.dimensions() {
        return Err(BlendError::DimensionMismatch {
            left: a.dimensions(),
            right: b.dimensions(),
        });
    }
    Ok(a.dimensions())
}

/// Byte range of row `y` in a tightly packed RGBA8 buffer.
pub(crate) fn row_bytes(image: &RgbaImage, y: usize) -> &[u8] {
    let row_len = image.width() as usize * 4;
    let start = y * row_len;
    &image.as_raw()[start..start + row_len]
}

pub(crate) fn into_image(width: u32, height: u32, data: Vec<u8>) -> BlendResult<RgbaImage> {
    RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| BlendError::evaluation("output buffer does not match image dimensions"))
}

//! Opacity inputs for the weighted blend and the transparency mask.
//!
//! A layer's opacity is either one scalar for the whole image or one value per pixel. Both
//! forms go through the same validation and broadcast identically across the color
//! channels, so a grid filled with `k` behaves exactly like `AlphaSource::Uniform(k)`.

use std::borrow::Cow;

use image::RgbaImage;

use crate::{
    composite::settings::AlphaRangePolicy,
    foundation::{
        error::{BlendError, BlendResult},
        math::normalize,
    },
};

/// Per-pixel opacity values, row-major, one `f32` per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct AlphaGrid {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl AlphaGrid {
    /// Wrap `values` as a `width x height` grid.
    ///
    /// Fails when `values.len() != width * height`. The values themselves are checked later,
    /// against the settings of the operation that consumes the grid.
    pub fn new(width: u32, height: u32, values: Vec<f32>) -> BlendResult<Self> {
        let expected = pixel_count(width, height);
        if values.len() != expected {
            return Err(BlendError::validation(format!(
                "alpha grid {width}x{height} needs {expected} values, got {}",
                values.len()
            )));
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// A grid with every pixel set to `value`.
    pub fn filled(width: u32, height: u32, value: f32) -> Self {
        Self {
            width,
            height,
            values: vec![value; pixel_count(width, height)],
        }
    }

    /// Build a grid by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> f32) -> Self {
        let mut values = Vec::with_capacity(pixel_count(width, height));
        for y in 0..height {
            for x in 0..width {
                values.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            values,
        }
    }

    /// Use an image's own alpha channel, normalized to `[0, 1]`, as an opacity grid.
    pub fn from_alpha_channel(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            values: image.pixels().map(|p| normalize(p.0[3])).collect(),
        }
    }

    /// Grid width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw row-major values.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Value at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.values
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

/// Opacity of one layer in [`crate::composite_add`].
#[derive(Clone, Debug, PartialEq)]
pub enum AlphaSource {
    /// Same opacity for every pixel.
    Uniform(f32),
    /// One opacity per pixel; must be shaped like the layer.
    PerPixel(AlphaGrid),
}

impl AlphaSource {
    /// Shorthand for [`AlphaSource::Uniform`].
    pub fn uniform(value: f32) -> Self {
        Self::Uniform(value)
    }

    /// Check shape and values against an image of size `dims`, applying `policy` to
    /// out-of-range values.
    pub(crate) fn resolve(
        &self,
        dims: (u32, u32),
        policy: AlphaRangePolicy,
    ) -> BlendResult<ResolvedAlpha<'_>> {
        match self {
            Self::Uniform(v) => Ok(ResolvedAlpha::Uniform(check_value(*v, policy)?)),
            Self::PerPixel(grid) => {
                if grid.dimensions() != dims {
                    return Err(BlendError::AlphaShapeMismatch {
                        expected: dims,
                        got: grid.dimensions(),
                    });
                }

                let mut needs_clamp = false;
                for &v in &grid.values {
                    let checked = check_value(v, policy)?;
                    needs_clamp |= checked != v;
                }

                let values = if needs_clamp {
                    Cow::Owned(grid.values.iter().map(|v| v.clamp(0.0, 1.0)).collect())
                } else {
                    Cow::Borrowed(grid.values.as_slice())
                };
                Ok(ResolvedAlpha::PerPixel(values))
            }
        }
    }
}

impl From<f32> for AlphaSource {
    fn from(value: f32) -> Self {
        Self::Uniform(value)
    }
}

impl From<AlphaGrid> for AlphaSource {
    fn from(grid: AlphaGrid) -> Self {
        Self::PerPixel(grid)
    }
}

/// Validated opacity, ready for per-pixel lookup.
#[derive(Clone, Debug)]
pub(crate) enum ResolvedAlpha<'a> {
    Uniform(f32),
    PerPixel(Cow<'a, [f32]>),
}

impl ResolvedAlpha<'_> {
    /// Opacity of the pixel at row-major index `idx`.
    pub(crate) fn at(&self, idx: usize) -> f32 {
        match self {
            Self::Uniform(v) => *v,
            Self::PerPixel(values) => values[idx],
        }
    }
}

fn check_value(v: f32, policy: AlphaRangePolicy) -> BlendResult<f32> {
    if !v.is_finite() {
        return Err(BlendError::InvalidAlpha { value: v });
    }
    if (0.0..=1.0).contains(&v) {
        return Ok(v);
    }
    match policy {
        AlphaRangePolicy::Clamp => Ok(v.clamp(0.0, 1.0)),
        AlphaRangePolicy::Reject => Err(BlendError::InvalidAlpha { value: v }),
    }
}

/// Pixels whose native alpha byte is exactly 0.
///
/// Captured from the unmodified layer before any blending math, independent of the opacity
/// the layer is blended with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransparencyMask {
    width: u32,
    height: u32,
    transparent: Vec<bool>,
}

impl TransparencyMask {
    /// Capture the mask from `image`'s alpha channel.
    pub fn from_image(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            transparent: image.pixels().map(|p| p.0[3] == 0).collect(),
        }
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether `(x, y)` is flagged. Out-of-bounds coordinates are never flagged.
    pub fn is_transparent(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.at(y as usize * self.width as usize + x as usize)
    }

    /// Number of flagged pixels.
    pub fn count(&self) -> usize {
        self.transparent.iter().filter(|t| **t).count()
    }

    pub(crate) fn at(&self, idx: usize) -> bool {
        self.transparent[idx]
    }
}

fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

#[cfg(test)]
#[path = "../../tests/unit/composite/alpha.rs"]
mod tests;

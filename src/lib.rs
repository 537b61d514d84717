//! alphablend is a CPU compositing kernel for RGBA8 images.
//!
//! It combines two equally sized [`image::RgbaImage`]s into a freshly allocated third one,
//! using one of two blend laws:
//!
//! - [`composite_over`]: straight-alpha Porter-Duff "over". Opacity comes from each image's own
//!   alpha channel and the result is un-premultiplied by the output coverage.
//! - [`composite_add`]: premultiplied "over" with explicit per-layer opacities, each either a
//!   scalar or a per-pixel [`AlphaGrid`], plus an optional mask that zeroes every pixel whose
//!   alpha is 0 in the first layer.
//!
//! All arithmetic runs on channels normalized to `[0, 1]`. Results are scaled back to 8 bits
//! with the configured [`Rounding`] and saturate at 255 instead of wrapping.
//!
//! Every call is a pure function of its inputs. Preconditions (matching dimensions, alpha grid
//! shape, finite opacities) are checked up front and reported as a [`BlendError`].
//!
//! [`composite_over_reference`] and [`composite_add_reference`] compute the same results one
//! pixel at a time and are meant for cross-validation.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod composite;
mod foundation;

pub use composite::add::{composite_add, composite_add_with};
pub use composite::alpha::{AlphaGrid, AlphaSource, TransparencyMask};
pub use composite::over::{
    composite_over, composite_over_opaque, composite_over_opaque_with, composite_over_with,
};
pub use composite::reference::{composite_add_reference, composite_over_reference};
pub use composite::settings::{AlphaRangePolicy, CompositeSettings, CompositeThreading, Rounding};
pub use foundation::error::{BlendError, BlendResult};

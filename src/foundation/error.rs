/// Convenience result alias used across the crate.
pub type BlendResult<T> = Result<T, BlendError>;

/// Errors surfaced by compositing operations.
///
/// Every precondition is checked before any pixel is computed, so an `Err` never comes with
/// a partially written output.
#[derive(thiserror::Error, Debug)]
pub enum BlendError {
    /// Generic precondition failure.
    #[error("validation error: {0}")]
    Validation(String),

    /// The two operand images do not share the same width and height.
    #[error("dimension mismatch: {}x{} vs {}x{}", .left.0, .left.1, .right.0, .right.1)]
    DimensionMismatch {
        /// `(width, height)` of the first operand.
        left: (u32, u32),
        /// `(width, height)` of the second operand.
        right: (u32, u32),
    },

    /// A per-pixel alpha grid is not shaped like the image it applies to.
    #[error(
        "alpha grid shape mismatch: expected {}x{}, got {}x{}",
        .expected.0, .expected.1, .got.0, .got.1
    )]
    AlphaShapeMismatch {
        /// `(width, height)` of the image.
        expected: (u32, u32),
        /// `(width, height)` of the alpha grid.
        got: (u32, u32),
    },

    /// An alpha value is not finite, or lies outside `[0, 1]` under a rejecting policy.
    #[error("invalid alpha value {value}: expected a finite value in [0, 1]")]
    InvalidAlpha {
        /// Offending value.
        value: f32,
    },

    /// Unguarded "over" hit a pixel where both layers are fully transparent.
    #[error("zero coverage at pixel ({x}, {y}): output alpha is 0, division is undefined")]
    ZeroCoverage {
        /// Column of the pixel.
        x: u32,
        /// Row of the pixel.
        y: u32,
    },

    /// Runtime failure while executing an otherwise valid request.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Settings could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BlendError {
    /// Build a [`BlendError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BlendError::Evaluation`].
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`BlendError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

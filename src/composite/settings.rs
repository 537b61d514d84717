use crate::foundation::error::{BlendError, BlendResult};

/// How normalized results are mapped back onto the 8-bit grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Round half up: `127.5 -> 128`.
    #[default]
    Nearest,
    /// Drop the fractional part: `127.5 -> 127`.
    Truncate,
}

/// What to do with a finite alpha value outside `[0, 1]`.
///
/// Non-finite values are rejected under either policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaRangePolicy {
    /// Clamp into `[0, 1]` before blending.
    #[default]
    Clamp,
    /// Fail with [`BlendError::InvalidAlpha`].
    Reject,
}

/// Row-level parallelism for the grid-wide operations.
///
/// Output is byte-identical regardless of these settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompositeThreading {
    /// Split the output into rows and process them on rayon workers.
    #[serde(default)]
    pub parallel: bool,
    /// Run on a dedicated pool of this many threads. `None` uses the global rayon pool.
    #[serde(default)]
    pub threads: Option<usize>,
}

/// Knobs shared by every compositing entry point.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompositeSettings {
    /// Rounding applied when de-normalizing every output channel.
    #[serde(default)]
    pub rounding: Rounding,
    /// Handling of out-of-range alpha inputs.
    #[serde(default)]
    pub alpha_range: AlphaRangePolicy,
    /// Execution strategy.
    #[serde(default)]
    pub threading: CompositeThreading,
}

impl CompositeSettings {
    /// Parse settings from JSON. Missing fields take their defaults; unknown fields are an error.
    pub fn from_json(s: &str) -> BlendResult<Self> {
        let settings: Self =
            serde_json::from_str(s).map_err(|e| BlendError::serde(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings to pretty-printed JSON.
    pub fn to_json(&self) -> BlendResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| BlendError::serde(e.to_string()))
    }

    /// Check invariants that the type system does not encode.
    pub fn validate(&self) -> BlendResult<()> {
        if let Some(n) = self.threading.threads
            && n == 0
        {
            return Err(BlendError::validation(
                "composite threading 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/settings.rs"]
mod tests;

//! Terrain generation error types.

/// Errors raised when generator input is rejected before any grid work starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    /// A configuration value is outside the range the generators accept.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Human-readable explanation.
        reason: String,
    },

    /// A replacement grid does not match the fixed heightfield resolution.
    #[error("grid has {actual} cells, expected {expected}")]
    ResolutionMismatch {
        /// Cell count required by the heightfield (`R * R`).
        expected: usize,
        /// Cell count that was supplied.
        actual: usize,
    },

    /// A layer list was constructed with no entries.
    #[error("layer list must contain at least one entry")]
    EmptyLayerList,
}

impl TerrainError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Fail with [`TerrainError::InvalidParameter`] unless `lo <= hi` and both are finite.
pub(crate) fn ensure_range(name: &'static str, lo: f32, hi: f32) -> Result<(), TerrainError> {
    if !lo.is_finite() || !hi.is_finite() {
        return Err(TerrainError::invalid(name, format!("[{lo}, {hi}] is not finite")));
    }
    if lo > hi {
        return Err(TerrainError::invalid(name, format!("min {lo} exceeds max {hi}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let err = TerrainError::invalid("octaves", "must be at least 1");
        assert_eq!(err.to_string(), "invalid parameter `octaves`: must be at least 1");
    }

    #[test]
    fn test_ensure_range() {
        assert!(ensure_range("r", 0.0, 0.0).is_ok());
        assert!(ensure_range("r", -1.0, 1.0).is_ok());
        assert!(ensure_range("r", 1.0, 0.0).is_err());
        assert!(ensure_range("r", f32::NAN, 0.0).is_err());
    }
}

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TargetError>;

#[derive(Debug, Error)]
pub enum TargetError {
    /// A numeric input is outside the range the grid can be built from.
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("invalid color for {name}: {value:?}")]
    InvalidColor { name: &'static str, value: String },

    /// The canvas could not write its document.
    #[error("failed to persist {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rasterization failed: {0}")]
    Raster(String),
}

impl TargetError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }

    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }
}

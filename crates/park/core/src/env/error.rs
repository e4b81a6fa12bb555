//! Errors raised while building or querying oracle data.

use crate::error::{ErrorSeverity, ParkError};
use crate::state::TileCoord;

/// Lowest and highest base heights a walkway may have, in height steps.
pub const MIN_PATH_HEIGHT: i32 = 0;
pub const MAX_PATH_HEIGHT: i32 = 255;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// Two walkway segments share a tile and base height.
    #[error("duplicate walkway at tile {tile} height {height}")]
    DuplicateTile { tile: TileCoord, height: i32 },

    /// A walkway base height outside the supported range.
    #[error("walkway at tile {tile} has height {height} outside 0..=255")]
    HeightOutOfRange { tile: TileCoord, height: i32 },

    /// An exit that is not standing on any walkway.
    #[error("exit at tile {0} is not on a walkway")]
    ExitOffPath(TileCoord),
}

impl ParkError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            OracleError::DuplicateTile { .. } => "ORACLE_DUPLICATE_TILE",
            OracleError::HeightOutOfRange { .. } => "ORACLE_HEIGHT_OUT_OF_RANGE",
            OracleError::ExitOffPath(_) => "ORACLE_EXIT_OFF_PATH",
        }
    }
}

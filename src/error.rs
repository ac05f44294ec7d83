//! Error types.
//!
//! Almost nothing inside the pipeline can fail: a frame without a usable hand is reported as
//! [`GestureType::None`], a hand without defects as a degenerate [`Palm`]. The types here cover
//! the two places where a caller needs to react: malformed input at the boundary, and a failed
//! calibration.
//!
//! [`GestureType::None`]: crate::hand::gesture::GestureType::None
//! [`Palm`]: crate::hand::palm::Palm

use crate::resolution::Resolution;

/// Errors returned by [`GestureTracker`][crate::hand::tracking::GestureTracker].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The mask passed in does not have the resolution the tracker was set up for.
    #[error("mask has resolution {actual}, expected {expected}")]
    MaskSize {
        expected: Resolution,
        actual: Resolution,
    },

    #[error("calibration failed: {0}")]
    Calibration(#[from] CalibrationError),
}

/// Reasons why a spread-hand sample could not be used as a calibration reference.
///
/// A failed calibration never modifies a previously stored profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CalibrationError {
    #[error("no hand found in calibration sample")]
    NoHand,

    /// The hand had no convexity defects, so no palm (and no fingers) could be estimated.
    #[error("calibration sample has no palm (no convexity defects)")]
    DegenerateGeometry,

    #[error("calibration sample has {0} fingers, expected 5")]
    FingerCount(usize),
}

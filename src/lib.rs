//! Hand gesture classification from binary skin silhouettes.
//!
//! The input to this library is a single-channel mask per video frame in which nonzero pixels are
//! skin, as produced by any color-threshold segmentation stage, plus the rectangles of any faces
//! found in the frame. The output is a [`GestureType`] together with the geometry that was used to
//! derive it (contour, convex hull, defects, palm circle and fingers), so that a display layer can
//! draw an overlay without recomputing anything.
//!
//! # Pipeline
//!
//! Each frame passes through these stages, each living in its own module under [`hand`]:
//!
//! 1. [`hand::detection`]: picks the largest external contour that doesn't touch a face.
//! 2. [`hand::shape`]: convex hull, convexity defects, bounding boxes and moments.
//! 3. [`hand::palm`]: palm circle from the defect valley points, smoothed over the last frames.
//! 4. [`hand::finger`]: cuts the palm out of the silhouette and finds the remaining fingers.
//! 5. [`hand::calibration`]: labels the fingers of a fully spread hand (once per user).
//! 6. [`hand::gesture`]: turns all of the above into a [`GestureType`].
//!
//! [`hand::tracking::GestureTracker`] ties the stages together and owns the state that persists
//! between frames.
//!
//! # Coordinates
//!
//! All coordinates are pixel coordinates of the input mask: X points to the right, Y points
//! *down*. Angles are measured with `atan2(dy, dx)` in that coordinate system, so a finger
//! pointing straight up has an angle of `-π/2`.
//!
//! # Environment Variables
//!
//! * `RUST_LOG`: overrides the log filter set up by [`init_logger!`].
//!
//! [`GestureType`]: hand::gesture::GestureType

use log::LevelFilter;

pub mod contour;
pub mod error;
pub mod filter;
pub mod geom;
pub mod hand;
pub mod image;
pub mod num;
pub mod resolution;


pub use error::Error;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_CRATE_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// If `cfg!(debug_assertions)` is enabled, the calling crate and this library will log at *trace*
/// level. Otherwise, they will log at *debug* level. `RUST_LOG` is parsed afterwards and can
/// override either.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}

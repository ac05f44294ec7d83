//! Hand analysis and gesture classification.
//!
//! The submodules implement the individual stages of the pipeline, in the order they run in.
//! [`tracking::GestureTracker`] runs all of them on each frame and produces a [`Hand`].

use std::fmt;

use crate::image::Rect;

pub mod calibration;
pub mod detection;
pub mod finger;
pub mod gesture;
pub mod palm;
pub mod shape;
pub mod tracking;

use self::{
    calibration::Handedness, finger::Finger, gesture::GestureType, palm::Palm, shape::HandShape,
};

/// Everything known about the hand in one frame.
///
/// All geometry is in mask coordinates, so that it can be drawn on top of the frame directly.
#[derive(Debug, Clone)]
pub struct Hand {
    shape: HandShape,
    raw_palm: Palm,
    palm: Palm,
    fingers: Vec<Finger>,
    handedness: Handedness,
    gesture: GestureType,
}

impl Hand {
    pub(crate) fn new(
        shape: HandShape,
        raw_palm: Palm,
        palm: Palm,
        fingers: Vec<Finger>,
        handedness: Handedness,
        gesture: GestureType,
    ) -> Self {
        Self {
            shape,
            raw_palm,
            palm,
            fingers,
            handedness,
            gesture,
        }
    }

    /// Returns the silhouette geometry: contour, hull, defects, boxes and moments.
    #[inline]
    pub fn shape(&self) -> &HandShape {
        &self.shape
    }

    /// Returns the palm estimated from this frame alone.
    #[inline]
    pub fn raw_palm(&self) -> Palm {
        self.raw_palm
    }

    /// Returns the palm smoothed over the last frames, which fingers and gesture are based on.
    #[inline]
    pub fn palm(&self) -> Palm {
        self.palm
    }

    #[inline]
    pub fn fingers(&self) -> &[Finger] {
        &self.fingers
    }

    #[inline]
    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    #[inline]
    pub fn gesture(&self) -> GestureType {
        self.gesture
    }

    /// Returns the ratio of the (smoothed) palm's area to the hand's area.
    pub fn ph_ratio(&self) -> f32 {
        self.palm.hand_ratio(self.shape.mass())
    }

    /// Returns the bounding rectangle of the hand without the wrist and forearm.
    pub fn hand_only_rect(&self) -> Rect {
        self.shape.hand_only_rect(&self.palm)
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bounds = self.shape.bounding_rect();
        let rotated = self.shape.rotated_rect().size();
        writeln!(f, "type:          {}", self.gesture)?;
        writeln!(f, "bounding box:  {}x{}", bounds.width(), bounds.height())?;
        writeln!(f, "rotated box:   {:.1}x{:.1}", rotated.x, rotated.y)?;
        writeln!(f, "defects:       {}", self.shape.defects().len())?;
        writeln!(f, "hand mass:     {:.1}", self.shape.mass())?;
        writeln!(f, "palm area:     {:.1}", self.palm.area())?;
        writeln!(f, "phRatio:       {:.3}", self.ph_ratio())?;
        write!(f, "defect depths:")?;
        for defect in self.shape.defects() {
            write!(f, " {:.1}", defect.depth)?;
        }
        Ok(())
    }
}

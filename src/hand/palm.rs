//! Palm circle estimation and smoothing.

use std::f32::consts::PI;

use nalgebra::{Point2, Vector2};

use crate::{
    filter::{Filter, LinearWeightedAvg},
    geom::min_enclosing_circle,
};

use super::shape::HandShape;

/// Circle approximating the palm of a hand.
///
/// A palm with a radius of 0 is *degenerate*: it is produced when the hand has no convexity
/// defects, and it means that the palm is undefined for this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palm {
    center: Point2<f32>,
    radius: f32,
}

impl Palm {
    pub fn new(center: Point2<f32>, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Returns the degenerate palm: center `(0, 0)`, radius 0.
    pub fn degenerate() -> Self {
        Self::new(Point2::origin(), 0.0)
    }

    /// Estimates the palm of `shape` as the smallest circle enclosing all defect valley points.
    ///
    /// With a single valley point, the palm is a circle of radius 0 around it, which is degenerate.
    /// Without any defects, the result is [`Palm::degenerate`].
    pub fn from_shape(shape: &HandShape) -> Self {
        let valleys = shape
            .valley_points()
            .map(|p| p.cast::<f32>())
            .collect::<Vec<_>>();
        match min_enclosing_circle(&valleys) {
            Some(circle) => Self::new(circle.center, circle.radius),
            None => Self::degenerate(),
        }
    }

    #[inline]
    pub fn center(&self) -> Point2<f32> {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Returns the area of the palm circle, `π·r²`.
    #[inline]
    pub fn area(&self) -> f32 {
        PI * self.radius * self.radius
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.radius > 0.0)
    }

    /// Returns a palm with the same center and a radius scaled by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f32) -> Palm {
        Palm::new(self.center, self.radius * factor)
    }

    /// Computes the ratio of the palm's area to the hand's mass (the "phRatio").
    ///
    /// A degenerate palm has an area of 0, so its ratio is 0. A non-positive `hand_mass` also
    /// results in a ratio of 0.
    pub fn hand_ratio(&self, hand_mass: f32) -> f32 {
        if self.is_degenerate() || !(hand_mass > 0.0) {
            return 0.0;
        }
        self.area() / hand_mass
    }
}

/// Smoothes the palm circle over the last few frames with a linearly weighted average.
///
/// Radius and center are smoothed independently (the center component-wise).
#[derive(Debug, Clone)]
pub struct PalmSmoother {
    radius: LinearWeightedAvg<f32>,
    center: LinearWeightedAvg<Vector2<f32>>,
}

impl PalmSmoother {
    /// Default number of frames to average over.
    pub const DEFAULT_HISTORY: usize = 3;

    pub fn new() -> Self {
        Self::with_history(Self::DEFAULT_HISTORY)
    }

    /// Creates a smoother that averages over the last `history` frames.
    ///
    /// # Panics
    ///
    /// Panics if `history` is zero.
    pub fn with_history(history: usize) -> Self {
        Self {
            radius: LinearWeightedAvg::new(history),
            center: LinearWeightedAvg::new(history),
        }
    }

    /// Adds `palm` to the history and returns the smoothed palm.
    ///
    /// Degenerate palms carry no information about the palm's position, so they are passed through
    /// unchanged and not recorded.
    pub fn smooth(&mut self, palm: Palm) -> Palm {
        if palm.is_degenerate() {
            return palm;
        }
        let radius = self.radius.push(palm.radius);
        let center = self.center.push(palm.center.coords);
        Palm::new(Point2::from(center), radius)
    }

    /// Returns the number of frames currently in the history.
    pub fn len(&self) -> usize {
        self.radius.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radius.is_empty()
    }

    /// Forgets all previous frames.
    pub fn reset(&mut self) {
        self.radius.reset();
        self.center.reset();
    }
}

impl Default for PalmSmoother {
    fn default() -> Self {
        Self::new()
    }
}

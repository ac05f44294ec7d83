//! Gesture classification.
//!
//! Classification is a pure function of the current frame's features: the hand shape, its
//! (smoothed) palm, the fingers found in it, and the calibrated [`Profile`], if any.
//!
//! The top-level split is between [`GestureType::Fist`] and [`GestureType::Palm`]. Fists are
//! refined by the slope of the silhouette's top edge on either side, palms by the number and
//! spread of the visible fingers.

use std::fmt;

use crate::{contour::Contour, num::wrap_angle};

use super::{
    calibration::{angle_between, Handedness, Profile},
    finger::{Finger, FingerType},
    palm::Palm,
    shape::HandShape,
};

/// The recognized hand gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureType {
    /// A hand was found, but its shape is not recognized.
    Unknown,
    /// No hand was found in the frame.
    None,
    /// Closed fist.
    Fist,
    /// Open hand, without a more specific classification.
    Palm,
    /// Fist with the thumb resting against the side.
    A,
    /// Fist with the thumb tucked in on top.
    T,
    /// A single extended finger.
    I,
    /// Thumb and index finger extended.
    L,
    /// Index and middle finger extended.
    V,
    /// Thumb and pinky extended.
    Y,
    /// Three fingers extended.
    W,
}

impl GestureType {
    /// Returns whether this is one of the fist gestures.
    pub fn is_fist(self) -> bool {
        matches!(self, GestureType::Fist | GestureType::A | GestureType::T)
    }
}

impl fmt::Display for GestureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GestureType::Unknown => "UNKNOWN",
            GestureType::None => "NONE",
            GestureType::Fist => "FIST",
            GestureType::Palm => "PALM",
            GestureType::A => "A",
            GestureType::T => "T",
            GestureType::I => "I",
            GestureType::L => "L",
            GestureType::V => "V",
            GestureType::Y => "Y",
            GestureType::W => "W",
        };
        f.write_str(name)
    }
}

/// How to decide between [`GestureType::Fist`] and [`GestureType::Palm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitPolicy {
    /// A fist is a hand whose palm circle covers most of its area (the palm/hand area ratio
    /// exceeds the fist ratio).
    #[default]
    PalmArea,
    /// A fist is a hand without any visible fingers.
    ///
    /// This is an alternative to [`SplitPolicy::PalmArea`] that is more sensitive to finger
    /// extraction failures.
    FingerCount,
}

/// Two-finger gestures, with the finger pair whose calibrated gap identifies them.
const TWO_FINGER_GESTURES: [(GestureType, FingerType, FingerType); 3] = [
    (GestureType::V, FingerType::Index, FingerType::Middle),
    (GestureType::Y, FingerType::Thumb, FingerType::Pinky),
    (GestureType::L, FingerType::Thumb, FingerType::Index),
];

/// Turns the features of a hand into a [`GestureType`].
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    policy: SplitPolicy,
    fist_ratio: f32,
    slope_thresh: f32,
    walk_step: usize,
}

impl GestureClassifier {
    /// Default palm/hand area ratio above which a hand is a fist.
    pub const DEFAULT_FIST_RATIO: f32 = 0.70;

    /// Default slope at which a side of the fist counts as dropping off.
    pub const DEFAULT_SLOPE_THRESH: f32 = 0.5;

    /// Default number of contour points to advance per step when walking a fist's outline.
    pub const DEFAULT_WALK_STEP: usize = 5;

    pub fn new() -> Self {
        Self {
            policy: SplitPolicy::default(),
            fist_ratio: Self::DEFAULT_FIST_RATIO,
            slope_thresh: Self::DEFAULT_SLOPE_THRESH,
            walk_step: Self::DEFAULT_WALK_STEP,
        }
    }

    pub fn set_split_policy(&mut self, policy: SplitPolicy) {
        self.policy = policy;
    }

    /// Sets the palm/hand area ratio above which [`SplitPolicy::PalmArea`] reports a fist.
    pub fn set_fist_ratio(&mut self, ratio: f32) {
        self.fist_ratio = ratio;
    }

    pub fn set_slope_thresh(&mut self, thresh: f32) {
        self.slope_thresh = thresh;
    }

    /// Sets the step size of the fist outline walk.
    ///
    /// # Panics
    ///
    /// Panics if `step` is zero.
    pub fn set_walk_step(&mut self, step: usize) {
        assert!(step > 0, "walk step must be at least 1");
        self.walk_step = step;
    }

    /// Classifies a hand.
    ///
    /// `palm` should be the smoothed palm, the same one the fingers were extracted with.
    pub fn classify(
        &self,
        shape: &HandShape,
        palm: &Palm,
        fingers: &[Finger],
        handedness: Handedness,
        profile: Option<&Profile>,
    ) -> GestureType {
        match self.split(shape, palm, fingers) {
            GestureType::Fist => self.classify_fist(shape.contour(), handedness),
            _ => self.classify_palm(fingers, profile),
        }
    }

    /// Performs the top-level split, returning either [`GestureType::Fist`] or
    /// [`GestureType::Palm`].
    pub fn split(&self, shape: &HandShape, palm: &Palm, fingers: &[Finger]) -> GestureType {
        let fist = match self.policy {
            SplitPolicy::PalmArea => palm.hand_ratio(shape.mass()) > self.fist_ratio,
            SplitPolicy::FingerCount => fingers.is_empty(),
        };
        if fist {
            GestureType::Fist
        } else {
            GestureType::Palm
        }
    }

    /// Refines a fist by walking its outline from both ends.
    ///
    /// The anchor is the first contour point, which is the topmost (then leftmost) point of the
    /// silhouette. Two walkers start `walk_step` points away from it in either direction and
    /// advance in lockstep; for each, the slope `|dy / dx|` of the line to the anchor is checked.
    /// If the walker on the thumb side is the first to exceed the threshold, the thumb lies along
    /// the side of the fist ([`GestureType::A`]); if the other one is, it is tucked in on top
    /// ([`GestureType::T`]). When the walkers meet without a decision, the result stays
    /// [`GestureType::Fist`].
    pub fn classify_fist(&self, contour: &Contour, handedness: Handedness) -> GestureType {
        let points = contour.points();
        let Some(&anchor) = points.first() else {
            return GestureType::Fist;
        };
        let slope = |i: usize| {
            let d = points[i] - anchor;
            if d.x == 0 {
                f32::INFINITY
            } else {
                (d.y as f32 / d.x as f32).abs()
            }
        };

        let step = self.walk_step;
        let mut b = step;
        let mut e = match points.len().checked_sub(1 + step) {
            Some(e) => e,
            None => return GestureType::Fist,
        };
        while b < e {
            let (left, right) = if points[b].x <= points[e].x {
                (b, e)
            } else {
                (e, b)
            };
            let (thumb_side, other_side) = if handedness.thumb_on_left() {
                (left, right)
            } else {
                (right, left)
            };

            if slope(thumb_side) > self.slope_thresh {
                return GestureType::A;
            }
            if slope(other_side) > self.slope_thresh {
                return GestureType::T;
            }

            b += step;
            e = match e.checked_sub(step) {
                Some(e) => e,
                None => break,
            };
        }
        GestureType::Fist
    }

    /// Refines an open hand by its visible fingers.
    ///
    /// Two fingers are told apart by comparing their angular gap with the calibrated gaps of the
    /// candidate finger pairs; without a profile, they are [`GestureType::Unknown`].
    pub fn classify_palm(&self, fingers: &[Finger], profile: Option<&Profile>) -> GestureType {
        match fingers {
            [_] => GestureType::I,
            [a, b] => {
                let Some(profile) = profile else {
                    return GestureType::Unknown;
                };
                let gap = angle_between(a.angle(), b.angle());
                TWO_FINGER_GESTURES
                    .iter()
                    .filter_map(|&(gesture, x, y)| {
                        let reference = profile.gap(x, y)?;
                        Some((gesture, wrap_angle(gap - reference).abs()))
                    })
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .map_or(GestureType::Unknown, |(gesture, _)| gesture)
            }
            [_, _, _] => GestureType::W,
            _ => GestureType::Palm,
        }
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new()
    }
}

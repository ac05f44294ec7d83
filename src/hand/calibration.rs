//! Per-user calibration: handedness and reference finger directions.
//!
//! Calibration works on a single sample of the user's fully spread hand. Its fingers are labeled
//! thumb to pinky based on their angular order, and the resulting directions are kept in a
//! [`Profile`], against which live frames are compared.

use std::f32::consts::FRAC_PI_2;

use crate::{error::CalibrationError, num::wrap_angle};

use super::{
    finger::{Finger, FingerType},
    shape::HandShape,
};

/// Which hand is being tracked, with the palm facing the camera.
///
/// Masks are assumed to be mirrored horizontally, like a selfie preview, so that they look like
/// the user's reflection. In such a mask, a right hand has its thumb on the left side of the
/// image. For unmirrored camera frames, the reported handedness is swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Handedness {
    Left,
    #[default]
    Right,
}

impl Handedness {
    /// Guesses the handedness from the asymmetry of the hand's convexity defects.
    ///
    /// The gap between thumb and index finger is the deepest one on the outside of the hand, so
    /// the side whose outermost defect (by valley X coordinate) is deeper is the thumb side. With
    /// fewer than two defects, or equal depths, this returns [`Handedness::Right`].
    pub fn from_shape(shape: &HandShape) -> Self {
        let points = shape.contour().points();
        let defects = shape.defects();
        if defects.len() < 2 {
            return Self::default();
        }

        let leftmost = defects.iter().min_by_key(|d| points[d.far].x);
        let rightmost = defects.iter().max_by_key(|d| points[d.far].x);
        match (leftmost, rightmost) {
            (Some(left), Some(right)) if right.depth > left.depth => Handedness::Left,
            _ => Handedness::Right,
        }
    }

    /// Returns whether the thumb of this hand is on the left side of the image.
    pub fn thumb_on_left(self) -> bool {
        self == Handedness::Right
    }
}

/// Direction of a finger relative to "straight up", growing clockwise on screen.
///
/// Fingers spread on the left side of an upright hand have negative values.
fn relative_angle(angle: f32) -> f32 {
    wrap_angle(angle + FRAC_PI_2)
}

/// Assigns a [`FingerType`] to each of the fingers of a fully spread hand.
///
/// The fingers are ordered by direction from the thumb side to the other side, and labeled thumb,
/// index, middle, ring and pinky in that order. Exactly 5 fingers are required; on failure, the
/// fingers are left untouched.
pub fn identify(fingers: &mut [Finger], handedness: Handedness) -> Result<(), CalibrationError> {
    if fingers.len() != FingerType::ALL.len() {
        return Err(CalibrationError::FingerCount(fingers.len()));
    }

    let mut order = (0..fingers.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| {
        relative_angle(fingers[a].angle()).total_cmp(&relative_angle(fingers[b].angle()))
    });
    if !handedness.thumb_on_left() {
        order.reverse();
    }

    for (&i, ty) in order.iter().zip(FingerType::ALL) {
        fingers[i].set_identity(ty);
    }
    Ok(())
}

/// Calibrated reference data of a user's hand.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    handedness: Handedness,
    /// Finger angles in radians, indexed by [`FingerType::index`].
    angles: [f32; 5],
}

impl Profile {
    /// Creates a profile from reference finger angles, given in thumb to pinky order.
    pub fn new(handedness: Handedness, angles: [f32; 5]) -> Self {
        Self { handedness, angles }
    }

    /// Creates a profile from the fingers of a fully spread hand, identifying them first.
    pub fn calibrate(
        fingers: &mut [Finger],
        handedness: Handedness,
    ) -> Result<Self, CalibrationError> {
        identify(fingers, handedness)?;

        let mut angles = [0.0; 5];
        for finger in fingers.iter() {
            if let Some(i) = finger.identity().index() {
                angles[i] = finger.angle();
            }
        }
        Ok(Self::new(handedness, angles))
    }

    #[inline]
    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    /// Returns the reference angle of a finger, or [`None`] for [`FingerType::Unknown`].
    pub fn angle(&self, finger: FingerType) -> Option<f32> {
        finger.index().map(|i| self.angles[i])
    }

    /// Returns the reference angles in thumb to pinky order.
    pub fn angles(&self) -> &[f32; 5] {
        &self.angles
    }

    /// Returns the absolute angle between the reference directions of two fingers.
    pub fn gap(&self, a: FingerType, b: FingerType) -> Option<f32> {
        Some(angle_between(self.angle(a)?, self.angle(b)?))
    }

    /// Labels live fingers with the identity of the closest reference direction.
    ///
    /// Each identity is handed out at most once; pairs are assigned greedily, closest first.
    pub fn label(&self, fingers: &mut [Finger]) {
        let mut pairs = Vec::with_capacity(fingers.len() * self.angles.len());
        for (i, finger) in fingers.iter().enumerate() {
            for ty in FingerType::ALL {
                if let Some(reference) = self.angle(ty) {
                    pairs.push((angle_between(finger.angle(), reference), i, ty));
                }
            }
        }
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut taken = Vec::with_capacity(FingerType::ALL.len());
        let mut labeled = vec![false; fingers.len()];
        for (_, i, ty) in pairs {
            if labeled[i] || taken.contains(&ty) {
                continue;
            }
            fingers[i].set_identity(ty);
            labeled[i] = true;
            taken.push(ty);
        }
    }
}

/// Absolute difference between two angles, in `0..=π`.
pub(crate) fn angle_between(a: f32, b: f32) -> f32 {
    wrap_angle(a - b).abs()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::{point, Point2};

    use super::*;
    use crate::{contour::Contour, test};

    /// A finger with its tip at `degrees` from the origin.
    fn finger_at(degrees: f32) -> Finger {
        let a = degrees.to_radians();
        let tip = point![(a.cos() * 100.0).round() as i32, (a.sin() * 100.0).round() as i32];
        Finger::new(Contour::new(vec![tip]), Point2::origin()).unwrap()
    }

    fn identities(fingers: &[Finger]) -> Vec<FingerType> {
        fingers.iter().map(|f| f.identity()).collect()
    }

    #[test]
    fn identify_right_hand() {
        // Shuffled discovery order.
        let mut fingers = [-90.0, -165.0, -40.0, -115.0, -65.0].map(finger_at);
        identify(&mut fingers, Handedness::Right).unwrap();
        assert_eq!(
            identities(&fingers),
            [
                FingerType::Middle,
                FingerType::Thumb,
                FingerType::Pinky,
                FingerType::Index,
                FingerType::Ring,
            ]
        );
    }

    #[test]
    fn identify_left_hand() {
        let mut fingers = [-15.0, -65.0, -90.0, -115.0, -140.0].map(finger_at);
        identify(&mut fingers, Handedness::Left).unwrap();
        assert_eq!(identities(&fingers), FingerType::ALL);
    }

    #[test]
    fn identify_handles_angle_wraparound() {
        // Thumb pointing slightly below the horizontal on the left: its angle is close to +π.
        let mut fingers = [175.0, -120.0, -90.0, -60.0, -30.0].map(finger_at);
        identify(&mut fingers, Handedness::Right).unwrap();
        assert_eq!(identities(&fingers), FingerType::ALL);
    }

    #[test]
    fn identify_requires_five_fingers() {
        let mut fingers = [-90.0, -60.0].map(finger_at);
        assert_eq!(
            identify(&mut fingers, Handedness::Right),
            Err(CalibrationError::FingerCount(2))
        );
        assert_eq!(
            identities(&fingers),
            [FingerType::Unknown, FingerType::Unknown]
        );
    }

    #[test]
    fn profile_gaps_and_labels() {
        let mut fingers = [-165.0, -115.0, -90.0, -65.0, -40.0].map(finger_at);
        let profile = Profile::calibrate(&mut fingers, Handedness::Right).unwrap();
        assert_eq!(profile.handedness(), Handedness::Right);
        assert_relative_eq!(
            profile.gap(FingerType::Thumb, FingerType::Pinky).unwrap(),
            125f32.to_radians(),
            epsilon = 0.02
        );
        assert_relative_eq!(
            profile.gap(FingerType::Index, FingerType::Middle).unwrap(),
            25f32.to_radians(),
            epsilon = 0.02
        );
        assert_eq!(profile.gap(FingerType::Unknown, FingerType::Thumb), None);

        let mut live = [-88.0, -118.0].map(finger_at);
        profile.label(&mut live);
        assert_eq!(identities(&live), [FingerType::Middle, FingerType::Index]);
    }

    #[test]
    fn handedness_from_shape() {
        let left = HandShape::new(test::hand_mask(&test::SPREAD).external_contours().remove(0))
            .unwrap();
        assert_eq!(Handedness::from_shape(&left), Handedness::Right);

        let mirrored = test::mirror(&test::hand_mask(&test::SPREAD));
        let right = HandShape::new(mirrored.external_contours().remove(0)).unwrap();
        assert_eq!(Handedness::from_shape(&right), Handedness::Left);

        let disk = HandShape::new(test::disk_mask().external_contours().remove(0)).unwrap();
        assert_eq!(Handedness::from_shape(&disk), Handedness::Right);
    }
}

//! Finger isolation.
//!
//! Fingers are found by cutting the palm circle and everything below it out of the hand's
//! silhouette: what remains are the finger stalks, which are then filtered by size.

use std::fmt;

use nalgebra::{Point2, Vector2};

use crate::{
    contour::Contour,
    image::{Mask, Rect, RotatedRect},
};

use super::{palm::Palm, shape::HandShape};

/// Identity of a finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FingerType {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
    /// Not (yet) identified.
    Unknown,
}

impl FingerType {
    /// All identified finger types, starting at the thumb.
    pub const ALL: [FingerType; 5] = [
        FingerType::Thumb,
        FingerType::Index,
        FingerType::Middle,
        FingerType::Ring,
        FingerType::Pinky,
    ];

    /// Returns the position of this finger, counted from the thumb, or [`None`] for
    /// [`FingerType::Unknown`].
    pub fn index(self) -> Option<usize> {
        Self::ALL.iter().position(|&ty| ty == self)
    }
}

impl fmt::Display for FingerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FingerType::Thumb => "thumb",
            FingerType::Index => "index",
            FingerType::Middle => "middle",
            FingerType::Ring => "ring",
            FingerType::Pinky => "pinky",
            FingerType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A finger found in the current frame.
#[derive(Debug, Clone)]
pub struct Finger {
    contour: Contour,
    tip: Point2<i32>,
    angle: f32,
    ellipse: Option<RotatedRect>,
    identity: FingerType,
}

impl Finger {
    /// Creates a finger from its contour, given the palm center it belongs to.
    ///
    /// The tip is the contour point farthest from `palm_center`. Returns [`None`] if `contour` is
    /// empty.
    pub fn new(contour: Contour, palm_center: Point2<f32>) -> Option<Self> {
        let tip = contour.farthest_from(palm_center)?;
        let dir = tip.cast::<f32>() - palm_center;
        let ellipse = contour.moments().ellipse();
        Some(Self {
            contour,
            tip,
            angle: dir.y.atan2(dir.x),
            ellipse,
            identity: FingerType::Unknown,
        })
    }

    /// Returns the finger's contour, in mask coordinates.
    #[inline]
    pub fn contour(&self) -> &Contour {
        &self.contour
    }

    #[inline]
    pub fn tip(&self) -> Point2<i32> {
        self.tip
    }

    /// Returns the direction from the palm center to the tip, in radians (`-π..=π`).
    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Returns the ellipse with the same second-order moments as the finger's contour.
    ///
    /// This is [`None`] for contours without area.
    #[inline]
    pub fn ellipse(&self) -> Option<RotatedRect> {
        self.ellipse
    }

    #[inline]
    pub fn identity(&self) -> FingerType {
        self.identity
    }

    pub fn set_identity(&mut self, identity: FingerType) {
        self.identity = identity;
    }
}

/// Cuts the palm out of a hand silhouette and collects the finger-shaped remains.
#[derive(Debug, Clone)]
pub struct FingerExtractor {
    min_finger_ratio: f32,
    max_finger_ratio: f32,
    retry_below: usize,
    retry_growth: f32,
}

impl FingerExtractor {
    /// Default lower bound for a finger's area divided by the palm radius.
    pub const DEFAULT_MIN_FINGER_RATIO: f32 = 10.0;

    /// Default upper bound for a finger's area divided by the palm radius.
    pub const DEFAULT_MAX_FINGER_RATIO: f32 = 50.0;

    /// When fewer fingers than this are found, extraction is retried with a larger palm.
    pub const DEFAULT_RETRY_BELOW: usize = 4;

    /// Factor by which the palm radius is enlarged for the retry.
    pub const DEFAULT_RETRY_GROWTH: f32 = 1.1;

    pub fn new() -> Self {
        Self {
            min_finger_ratio: Self::DEFAULT_MIN_FINGER_RATIO,
            max_finger_ratio: Self::DEFAULT_MAX_FINGER_RATIO,
            retry_below: Self::DEFAULT_RETRY_BELOW,
            retry_growth: Self::DEFAULT_RETRY_GROWTH,
        }
    }

    /// Sets the range of `area / palm_radius` that a leftover blob must lie in (exclusive) to be
    /// considered a finger.
    ///
    /// Normalizing by the palm radius makes the filter independent of the hand's distance to the
    /// camera.
    pub fn set_finger_ratio(&mut self, min: f32, max: f32) {
        self.min_finger_ratio = min;
        self.max_finger_ratio = max;
    }

    /// Sets the finger count below which a second attempt with a larger palm circle is made, and
    /// the factor by which the palm radius is scaled for it.
    ///
    /// Setting `below` to 0 disables the retry.
    pub fn set_retry(&mut self, below: usize, growth: f32) {
        self.retry_below = below;
        self.retry_growth = growth;
    }

    /// Finds the fingers of the hand `shape` in `mask`, using the (smoothed) `palm`.
    ///
    /// Returns no fingers if the palm is degenerate. If fewer fingers than the retry threshold
    /// are found, the search is repeated once with an enlarged palm and the attempt with more
    /// fingers is kept (on a tie, the first one).
    ///
    /// Fingers are returned in the order they were found in.
    pub fn extract(&self, mask: &Mask, shape: &HandShape, palm: &Palm) -> Vec<Finger> {
        let fingers = self.extract_once(mask, shape, palm);
        if fingers.len() >= self.retry_below {
            return fingers;
        }

        let retry = self.extract_once(mask, shape, &palm.scaled(self.retry_growth));
        log::debug!(
            "found {} fingers, {} after enlarging palm by {}",
            fingers.len(),
            retry.len(),
            self.retry_growth,
        );
        if retry.len() > fingers.len() {
            retry
        } else {
            fingers
        }
    }

    fn extract_once(&self, mask: &Mask, shape: &HandShape, palm: &Palm) -> Vec<Finger> {
        let bounds = shape.bounding_rect();
        if palm.is_degenerate() || bounds.is_empty() {
            return Vec::new();
        }

        let mut roi = mask.crop(bounds);
        let offset = Vector2::new(bounds.x(), bounds.y());
        let center = palm.center() - offset.cast::<f32>();
        let radius = palm.radius();
        let bottom = roi.height() as i32;

        roi.erase_circle(center, radius);

        // Wrist below the palm center.
        let (x0, x1) = (
            (center.x - radius).round() as i32,
            (center.x + radius).round() as i32,
        );
        let y0 = center.y.round() as i32;
        if y0 <= bottom {
            roi.erase_rect(Rect::from_corners((x0, y0), (x1, bottom)));
        }
        // Forearm remnants to the sides.
        let band = (center.y + radius / 2.0).round() as i32;
        if band <= bottom {
            roi.erase_rect(Rect::from_corners((0, band), (roi.width() as i32, bottom)));
        }

        roi.external_contours()
            .into_iter()
            .filter(|contour| {
                let ratio = contour.area() / radius;
                log::trace!(
                    "finger candidate with {} points: area/radius = {ratio}",
                    contour.len()
                );
                self.min_finger_ratio < ratio && ratio < self.max_finger_ratio
            })
            .filter_map(|contour| Finger::new(contour.translate(offset.x, offset.y), palm.center()))
            .collect()
    }
}

impl Default for FingerExtractor {
    fn default() -> Self {
        Self::new()
    }
}

//! Finds the hand silhouette in a skin mask.

use crate::{contour::Contour, image::Mask, image::Rect, num::TotalF32};

/// Selects the hand among the foreground regions of a skin mask.
///
/// The hand is the largest external contour that does not touch any face rectangle, as long as
/// its area exceeds the configured minimum.
#[derive(Debug, Clone)]
pub struct HandDetector {
    min_hand_area: f32,
}

impl HandDetector {
    /// Default area (in pixels²) a contour has to exceed to be considered a hand.
    pub const DEFAULT_MIN_HAND_AREA: f32 = 2000.0;

    pub fn new() -> Self {
        Self {
            min_hand_area: Self::DEFAULT_MIN_HAND_AREA,
        }
    }

    /// Sets the area (in pixels²) a contour has to exceed to be considered a hand.
    pub fn set_min_hand_area(&mut self, area: f32) {
        self.min_hand_area = area;
    }

    /// Returns the contour of the hand in `mask`, or [`None`] if there is no suitable region.
    ///
    /// Any contour with at least one point inside of one of the `faces` is skipped, since skin
    /// segmentation picks up faces just as well as hands. Of several contours with the same area,
    /// the first one (in raster order of their topmost point) wins.
    pub fn detect(&self, mask: &Mask, faces: &[Rect]) -> Option<Contour> {
        let contours = mask.external_contours();
        let total = contours.len();

        let mut best: Option<(Contour, f32)> = None;
        for contour in contours {
            if faces.iter().any(|face| contour.touches(face)) {
                continue;
            }
            let area = contour.area();
            if !(area > self.min_hand_area) {
                continue;
            }
            if best
                .as_ref()
                .map_or(true, |(_, best_area)| TotalF32(area) > TotalF32(*best_area))
            {
                best = Some((contour, area));
            }
        }

        log::trace!(
            "{total} contours, {} faces, hand area: {:?}",
            faces.len(),
            best.as_ref().map(|(_, area)| area)
        );
        best.map(|(contour, _)| contour)
    }
}

impl Default for HandDetector {
    fn default() -> Self {
        Self::new()
    }
}

//! Geometric description of a hand silhouette: hull, convexity defects, bounding boxes and moments.

use itertools::Itertools;
use nalgebra::Point2;

use crate::{
    contour::{Contour, Moments},
    geom::{convex_hull_indices, line_distance},
    image::{Rect, RotatedRect},
};

use super::palm::Palm;

/// A region where the contour dips inward from its convex hull.
///
/// All fields except `depth` are indices into the owning [`HandShape`]'s contour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Defect {
    /// Contour index of the hull vertex where the defect starts.
    pub start: usize,
    /// Contour index of the hull vertex where the defect ends.
    pub end: usize,
    /// Contour index of the point farthest from the hull edge (the "valley").
    pub far: usize,
    /// Distance of the valley point from the hull edge, in pixels.
    pub depth: f32,
}

/// A hand candidate contour together with everything derived from its geometry.
///
/// Building a [`HandShape`] never fails for a non-empty contour: a contour without convexity
/// defects still has valid bounding boxes and moments.
#[derive(Debug, Clone)]
pub struct HandShape {
    contour: Contour,
    /// Contour indices of the hull vertices, in contour order.
    hull: Vec<usize>,
    defects: Vec<Defect>,
    bounding_rect: Rect,
    rotated_rect: RotatedRect,
    moments: Moments,
}

impl HandShape {
    /// Default minimum depth for a convexity defect to count, in pixels.
    pub const DEFAULT_MIN_DEFECT_DEPTH: f32 = 10.0;

    /// Analyzes `contour`, using [`HandShape::DEFAULT_MIN_DEFECT_DEPTH`].
    ///
    /// Returns [`None`] if `contour` is empty.
    pub fn new(contour: Contour) -> Option<Self> {
        Self::with_min_defect_depth(contour, Self::DEFAULT_MIN_DEFECT_DEPTH)
    }

    /// Analyzes `contour`, discarding convexity defects shallower than `min_defect_depth` pixels.
    ///
    /// Returns [`None`] if `contour` is empty.
    pub fn with_min_defect_depth(contour: Contour, min_defect_depth: f32) -> Option<Self> {
        let bounding_rect = contour.bounding_rect()?;
        let rotated_rect = contour.min_area_rect()?;
        let moments = contour.moments();

        let points = contour.points_f32();
        let mut hull = convex_hull_indices(&points);
        // The hull is computed in angular order, but defects are defined by contour arcs between
        // consecutive hull vertices, so walk it in contour order instead.
        hull.sort_unstable();

        let defects = convexity_defects(&points, &hull)
            .filter(|d| d.depth >= min_defect_depth)
            .collect::<Vec<_>>();

        log::trace!(
            "hand shape: {} contour points, {} hull vertices, defect depths {:?}",
            points.len(),
            hull.len(),
            defects.iter().map(|d| d.depth).collect::<Vec<_>>(),
        );

        Some(Self {
            contour,
            hull,
            defects,
            bounding_rect,
            rotated_rect,
            moments,
        })
    }

    #[inline]
    pub fn contour(&self) -> &Contour {
        &self.contour
    }

    /// Returns the contour indices of the convex hull's vertices, in contour order.
    #[inline]
    pub fn hull(&self) -> &[usize] {
        &self.hull
    }

    /// Returns the convex hull's vertices, in contour order.
    pub fn hull_points(&self) -> impl Iterator<Item = Point2<i32>> + '_ {
        self.hull.iter().map(|&i| self.contour.points()[i])
    }

    /// Returns the convexity defects that are at least as deep as the configured threshold.
    #[inline]
    pub fn defects(&self) -> &[Defect] {
        &self.defects
    }

    /// Returns the valley point of every defect.
    pub fn valley_points(&self) -> impl Iterator<Item = Point2<i32>> + '_ {
        self.defects.iter().map(|d| self.contour.points()[d.far])
    }

    #[inline]
    pub fn bounding_rect(&self) -> Rect {
        self.bounding_rect
    }

    #[inline]
    pub fn rotated_rect(&self) -> RotatedRect {
        self.rotated_rect
    }

    #[inline]
    pub fn moments(&self) -> &Moments {
        &self.moments
    }

    /// Returns the area enclosed by the contour (the "hand mass", moment `m00`).
    #[inline]
    pub fn mass(&self) -> f32 {
        self.moments.m00 as f32
    }

    /// Returns the part of the bounding rectangle that lies above the wrist.
    ///
    /// The wrist is assumed to start one palm radius below the palm center. For a degenerate palm,
    /// this is the whole bounding rectangle.
    pub fn hand_only_rect(&self, palm: &Palm) -> Rect {
        let rect = self.bounding_rect;
        if palm.is_degenerate() {
            return rect;
        }
        let height = palm.center().y - rect.y() as f32 + palm.radius();
        let height = height.clamp(0.0, rect.height() as f32) as u32;
        rect.with_height(height)
    }
}

/// Finds, for each hull edge, the contour point between its endpoints that is farthest from it.
///
/// `hull` must be sorted by contour index. Edges whose contour arc contains no points, or only
/// points on the edge itself, produce no defect.
fn convexity_defects<'a>(
    points: &'a [Point2<f32>],
    hull: &'a [usize],
) -> impl Iterator<Item = Defect> + 'a {
    let n = points.len();
    let edges = if hull.len() < 3 {
        // A hull of a point or a segment has no area and no defects.
        &[][..]
    } else {
        hull
    };

    edges
        .iter()
        .copied()
        .circular_tuple_windows()
        .filter_map(move |(start, end)| {
            let (a, b) = (points[start], points[end]);
            // Number of contour points strictly between `start` and `end`, walking forward.
            let between = (end + n - start - 1) % n;
            (1..=between)
                .map(|k| (start + k) % n)
                .map(|i| (i, line_distance(points[i], a, b)))
                .fold(None, |best: Option<(usize, f32)>, (i, dist)| match best {
                    Some((_, d)) if d >= dist => best,
                    _ => Some((i, dist)),
                })
                .filter(|&(_, depth)| depth > 0.0)
                .map(|(far, depth)| Defect {
                    start,
                    end,
                    far,
                    depth,
                })
        })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::point;

    use super::*;
    use crate::test;

    #[test]
    fn convex_shape_has_no_defects() {
        let contour = Contour::new(vec![
            point![0, 0],
            point![10, 0],
            point![20, 0],
            point![20, 20],
            point![0, 20],
        ]);
        let shape = HandShape::with_min_defect_depth(contour, 0.0).unwrap();
        assert!(shape.defects().is_empty());
        assert_eq!(shape.hull(), [0, 2, 3, 4]);
        assert_relative_eq!(shape.mass(), 400.0);
        assert_eq!(shape.bounding_rect(), Rect::from_corners((0, 0), (20, 20)));
        assert_relative_eq!(shape.rotated_rect().area(), 400.0, epsilon = 1e-2);
    }

    #[test]
    fn notch_is_a_defect() {
        // A square with a V-shaped notch cut into the top edge.
        let contour = Contour::new(vec![
            point![0, 0],
            point![40, 0],
            point![50, 30],
            point![60, 0],
            point![100, 0],
            point![100, 100],
            point![0, 100],
        ]);
        let shape = HandShape::new(contour.clone()).unwrap();
        assert_eq!(shape.defects().len(), 1);
        let defect = shape.defects()[0];
        // Collinear points on the top edge are not hull vertices.
        assert_eq!((defect.start, defect.far, defect.end), (0, 2, 4));
        assert_relative_eq!(defect.depth, 30.0);
        assert_eq!(shape.valley_points().collect::<Vec<_>>(), [point![50, 30]]);
        assert_eq!(shape.hull_points().count(), 4);

        // Shallower than the threshold: dropped.
        let shape = HandShape::with_min_defect_depth(contour, 30.5).unwrap();
        assert!(shape.defects().is_empty());
    }

    #[test]
    fn defect_across_contour_start() {
        // Same notch, but the contour starts inside of it.
        let contour = Contour::new(vec![
            point![50, 30],
            point![60, 0],
            point![100, 0],
            point![100, 100],
            point![0, 100],
            point![0, 0],
            point![40, 0],
        ]);
        let shape = HandShape::new(contour).unwrap();
        assert_eq!(shape.defects().len(), 1);
        let defect = shape.defects()[0];
        assert_eq!((defect.start, defect.far, defect.end), (5, 0, 2));
        assert_relative_eq!(defect.depth, 30.0);
    }

    #[test]
    fn degenerate_contours() {
        assert!(HandShape::new(Contour::new(Vec::new())).is_none());

        let dot = HandShape::new(Contour::new(vec![point![3, 3]])).unwrap();
        assert!(dot.defects().is_empty());
        assert_eq!(dot.mass(), 0.0);
        assert_eq!(dot.bounding_rect(), Rect::from_top_left(3, 3, 1, 1));

        let line = HandShape::new(Contour::new(vec![point![0, 0], point![9, 0]])).unwrap();
        assert!(line.defects().is_empty());
        assert_eq!(line.hull().len(), 2);
    }

    #[test]
    fn star_has_finger_valleys() {
        let mask = test::star_mask();
        let contour = mask.external_contours().remove(0);
        let shape = HandShape::new(contour).unwrap();
        // One valley between each pair of neighboring fingers, plus one on each outer side.
        assert_eq!(shape.defects().len(), 6);
        for valley in shape.valley_points() {
            // All valleys lie on the palm disk, above the wrist.
            let dist = (valley.cast::<f32>() - test::STAR_CENTER).norm();
            assert!(dist < test::STAR_PALM_RADIUS + 3.0, "{valley} at {dist}");
            assert!((valley.y as f32) < test::STAR_CENTER.y);
        }
    }

    #[test]
    fn hand_only_rect_cuts_at_wrist() {
        let shape = HandShape::new(Contour::new(vec![
            point![10, 10],
            point![60, 10],
            point![60, 210],
            point![10, 210],
        ]))
        .unwrap();
        let palm = Palm::new(point![35.0, 60.0], 20.0);
        assert_eq!(
            shape.hand_only_rect(&palm),
            Rect::from_top_left(10, 10, 51, 70)
        );
        assert_eq!(
            shape.hand_only_rect(&Palm::new(point![35.0, 300.0], 20.0)),
            shape.bounding_rect()
        );
        assert_eq!(
            shape.hand_only_rect(&Palm::degenerate()),
            shape.bounding_rect()
        );
    }
}

//! Closed pixel contours and their moments.

use nalgebra::{Point2, Vector2};

use crate::{
    image::{Rect, RotatedRect},
    num::TotalF32,
};

/// A closed polygon in pixel coordinates, as traced around the border of a foreground region.
///
/// The order of the points is the traversal order around the border and is preserved by every
/// operation; the last point connects back to the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    points: Vec<Point2<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point2<i32>>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn points(&self) -> &[Point2<i32>] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the contour's points converted to `f32`.
    pub fn points_f32(&self) -> Vec<Point2<f32>> {
        self.points.iter().map(|p| p.cast::<f32>()).collect()
    }

    /// Returns a copy of this contour, moved by `(dx, dy)`.
    #[must_use]
    pub fn translate(&self, dx: i32, dy: i32) -> Contour {
        let offset = Vector2::new(dx, dy);
        Contour::new(self.points.iter().map(|&p| p + offset).collect())
    }

    /// Computes the axis-aligned bounding rectangle of the contour's points.
    ///
    /// Returns [`None`] if the contour is empty.
    pub fn bounding_rect(&self) -> Option<Rect> {
        Rect::bounding(self.points.iter().map(|p| (p.x, p.y)))
    }

    /// Computes the minimum-area rotated rectangle enclosing the contour.
    pub fn min_area_rect(&self) -> Option<RotatedRect> {
        RotatedRect::min_area(&self.points_f32())
    }

    /// Returns whether any point of the contour lies inside of `rect`.
    pub fn touches(&self, rect: &Rect) -> bool {
        self.points.iter().any(|p| rect.contains_point(p.x, p.y))
    }

    /// Returns the contour point farthest from `from`.
    ///
    /// Of several equally distant points, the first one is returned.
    pub fn farthest_from(&self, from: Point2<f32>) -> Option<Point2<i32>> {
        let mut best: Option<(Point2<i32>, f32)> = None;
        for &p in &self.points {
            let dist = (p.cast::<f32>() - from).norm_squared();
            if best.map_or(true, |(_, d)| dist > d) {
                best = Some((p, dist));
            }
        }
        best.map(|(p, _)| p)
    }

    /// Returns the contour point nearest to `to`.
    pub fn nearest_to(&self, to: Point2<f32>) -> Option<Point2<i32>> {
        self.points
            .iter()
            .copied()
            .min_by_key(|p| TotalF32((p.cast::<f32>() - to).norm_squared()))
    }

    /// Enclosed area of the polygon (shoelace formula), independent of winding direction.
    pub fn area(&self) -> f32 {
        self.moments().m00 as f32
    }

    /// Computes the spatial moments up to second order of the polygon's interior.
    ///
    /// The moments are computed over the area enclosed by the polygon through the contour points
    /// (pixel centers), so a contour of less than 3 distinct points has zero moments. The result
    /// does not depend on the winding direction.
    pub fn moments(&self) -> Moments {
        let mut m = Moments::default();
        let n = self.points.len();
        if n < 3 {
            return m;
        }

        for i in 0..n {
            let p = self.points[i].cast::<f64>();
            let q = self.points[(i + 1) % n].cast::<f64>();
            let a = p.x * q.y - q.x * p.y;
            m.m00 += a;
            m.m10 += a * (p.x + q.x);
            m.m01 += a * (p.y + q.y);
            m.m20 += a * (p.x * p.x + p.x * q.x + q.x * q.x);
            m.m11 += a * (2.0 * p.x * p.y + p.x * q.y + q.x * p.y + 2.0 * q.x * q.y);
            m.m02 += a * (p.y * p.y + p.y * q.y + q.y * q.y);
        }
        m.m00 /= 2.0;
        m.m10 /= 6.0;
        m.m01 /= 6.0;
        m.m20 /= 12.0;
        m.m11 /= 24.0;
        m.m02 /= 12.0;

        if m.m00 < 0.0 {
            m = Moments {
                m00: -m.m00,
                m10: -m.m10,
                m01: -m.m01,
                m20: -m.m20,
                m11: -m.m11,
                m02: -m.m02,
            };
        }
        m
    }
}

/// Raw spatial moments of a polygon, up to second order.
///
/// `m00` is the enclosed area.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub m20: f64,
    pub m11: f64,
    pub m02: f64,
}

impl Moments {
    /// Returns the center of mass, or [`None`] if the area is zero.
    pub fn centroid(&self) -> Option<Point2<f32>> {
        if self.m00 <= f64::EPSILON {
            return None;
        }
        Some(Point2::new(
            (self.m10 / self.m00) as f32,
            (self.m01 / self.m00) as f32,
        ))
    }

    /// Computes the ellipse with the same second-order central moments as the shape.
    ///
    /// The ellipse is returned as its bounding [`RotatedRect`], with the size being the full
    /// major and minor axis lengths (in that order). Returns [`None`] if the area is zero.
    pub fn ellipse(&self) -> Option<RotatedRect> {
        let center = self.centroid()?;
        let (cx, cy) = (f64::from(center.x), f64::from(center.y));
        let mu20 = self.m20 / self.m00 - cx * cx;
        let mu02 = self.m02 / self.m00 - cy * cy;
        let mu11 = self.m11 / self.m00 - cx * cy;

        let mean = (mu20 + mu02) / 2.0;
        let spread = (((mu20 - mu02) / 2.0).powi(2) + mu11 * mu11).sqrt();
        let major = 4.0 * (mean + spread).max(0.0).sqrt();
        let minor = 4.0 * (mean - spread).max(0.0).sqrt();
        let radians = 0.5 * (2.0 * mu11).atan2(mu20 - mu02);

        Some(RotatedRect::new(
            center,
            Vector2::new(major as f32, minor as f32),
            radians as f32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

    use approx::assert_relative_eq;
    use nalgebra::point;

    use super::*;

    /// Regular `n`-gon with integer vertices, traversed in the given direction.
    fn regular_polygon(center: (i32, i32), radius: f32, n: usize, clockwise: bool) -> Contour {
        let points = (0..n)
            .map(|i| {
                let mut a = i as f32 / n as f32 * TAU;
                if clockwise {
                    a = -a;
                }
                Point2::new(
                    center.0 + (a.cos() * radius).round() as i32,
                    center.1 + (a.sin() * radius).round() as i32,
                )
            })
            .collect();
        Contour::new(points)
    }

    #[test]
    fn rectangle_moments() {
        // 10x4 rectangle with its top left corner at (2, 3).
        let rect = Contour::new(vec![
            point![2, 3],
            point![12, 3],
            point![12, 7],
            point![2, 7],
        ]);
        let m = rect.moments();
        assert_relative_eq!(m.m00, 40.0);
        assert_relative_eq!(m.centroid().unwrap(), point![7.0, 5.0]);
        assert_relative_eq!(rect.area(), 40.0);

        let reversed = Contour::new(rect.points().iter().rev().copied().collect());
        assert_relative_eq!(reversed.moments().m00, m.m00);
        assert_relative_eq!(reversed.moments().m11, m.m11);

        let ellipse = m.ellipse().unwrap();
        // Central moments of a w*h rectangle are w²/12 and h²/12.
        assert_relative_eq!(ellipse.size().x, 4.0 * (100.0f32 / 12.0).sqrt(), epsilon = 1e-3);
        assert_relative_eq!(ellipse.size().y, 4.0 * (16.0f32 / 12.0).sqrt(), epsilon = 1e-3);
        assert_relative_eq!(ellipse.rotation_radians(), 0.0);
    }

    #[test]
    fn regular_polygon_matches_closed_form() {
        for clockwise in [false, true] {
            let n = 360;
            let r = 100.0f32;
            let contour = regular_polygon((200, 150), r, n, clockwise);
            let expected_area = 0.5 * n as f32 * r * r * (TAU / n as f32).sin();
            // Rounding the vertices to pixels changes the area only slightly.
            assert_relative_eq!(contour.area(), expected_area, max_relative = 0.01);

            let m = contour.moments();
            assert_relative_eq!(m.centroid().unwrap(), point![200.0, 150.0], epsilon = 0.1);

            // A circle is its own equivalent ellipse.
            let ellipse = m.ellipse().unwrap();
            assert_relative_eq!(ellipse.size().x, 2.0 * r, max_relative = 0.01);
            assert_relative_eq!(ellipse.size().y, 2.0 * r, max_relative = 0.01);

            assert_eq!(
                contour.bounding_rect(),
                Some(Rect::from_corners((100, 50), (300, 250)))
            );
        }
    }

    #[test]
    fn diagonal_ellipse() {
        // Thin parallelogram along the diagonal.
        let contour = Contour::new(vec![
            point![0, 0],
            point![2, 0],
            point![102, 100],
            point![100, 100],
        ]);
        let ellipse = contour.moments().ellipse().unwrap();
        assert_relative_eq!(ellipse.rotation_radians(), FRAC_PI_4, epsilon = 0.01);
        assert!(ellipse.size().x > 10.0 * ellipse.size().y);

        let vertical = Contour::new(vec![point![0, 0], point![2, 0], point![2, 50], point![0, 50]]);
        let ellipse = vertical.moments().ellipse().unwrap();
        assert_relative_eq!(ellipse.rotation_radians().abs(), FRAC_PI_2, epsilon = 1e-4);
    }

    #[test]
    fn degenerate_contours() {
        let empty = Contour::new(Vec::new());
        assert_eq!(empty.area(), 0.0);
        assert!(empty.moments().centroid().is_none());
        assert!(empty.bounding_rect().is_none());
        assert!(empty.farthest_from(point![0.0, 0.0]).is_none());

        let line = Contour::new(vec![point![0, 0], point![5, 0], point![10, 0], point![5, 0]]);
        assert_eq!(line.area(), 0.0);
        assert!(line.moments().ellipse().is_none());
        assert_eq!(line.bounding_rect(), Some(Rect::from_top_left(0, 0, 11, 1)));
    }

    #[test]
    fn farthest_and_nearest() {
        let contour = Contour::new(vec![point![0, 0], point![10, 0], point![10, 10], point![0, 10]]);
        assert_eq!(contour.farthest_from(point![1.0, 1.0]), Some(point![10, 10]));
        assert_eq!(contour.nearest_to(point![9.0, 1.0]), Some(point![10, 0]));
        // Ties keep the first point.
        assert_eq!(contour.farthest_from(point![5.0, 5.0]), Some(point![0, 0]));
        assert!(contour.touches(&Rect::from_top_left(9, 9, 5, 5)));
        assert!(!contour.touches(&Rect::from_top_left(1, 1, 8, 8)));
        assert_eq!(contour.translate(1, -1).points()[2], point![11, 9]);
    }
}

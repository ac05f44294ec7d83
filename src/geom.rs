//! Planar geometry helpers: convex hulls and enclosing circles.
//!
//! Everything here works on `f32` points; integer contour coordinates are converted at the call
//! site.

use std::{cmp::Ordering, f32::consts::PI};

use nalgebra::{Point2, Vector2};

/// 2D cross product of `b - a` and `c - a`.
///
/// Positive if `a -> b -> c` turns counterclockwise in a Y-up coordinate system (clockwise on
/// screen, since image Y points down).
#[inline]
pub fn cross(a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> f32 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

/// Distance of `p` from the infinite line through `a` and `b`.
///
/// If `a` and `b` coincide, this is the distance between `p` and `a`.
pub fn line_distance(p: Point2<f32>, a: Point2<f32>, b: Point2<f32>) -> f32 {
    let len = (b - a).norm();
    if len == 0.0 {
        return (p - a).norm();
    }
    cross(a, b, p).abs() / len
}

/// Andrew's monotone chain convex hull.
///
/// Returns the indices into `points` of the hull vertices in counterclockwise order (Y-up
/// convention), starting at the lexicographically smallest point. Collinear points on hull edges
/// are not included, and of several identical points only the first one is.
///
/// Fewer than 3 distinct points result in a "hull" made of the distinct points themselves.
pub fn convex_hull_indices(points: &[Point2<f32>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| {
        let (pa, pb) = (points[a], points[b]);
        match pa.x.total_cmp(&pb.x) {
            Ordering::Equal => pa.y.total_cmp(&pb.y).then(a.cmp(&b)),
            o => o,
        }
    });
    order.dedup_by(|a, b| points[*a] == points[*b]);
    if order.len() < 3 {
        return order;
    }

    let mut lower: Vec<usize> = Vec::with_capacity(order.len());
    for &i in &order {
        while lower.len() >= 2
            && cross(
                points[lower[lower.len() - 2]],
                points[lower[lower.len() - 1]],
                points[i],
            ) <= 0.0
        {
            lower.pop();
        }
        lower.push(i);
    }
    let mut upper: Vec<usize> = Vec::with_capacity(order.len());
    for &i in order.iter().rev() {
        while upper.len() >= 2
            && cross(
                points[upper[upper.len() - 2]],
                points[upper[upper.len() - 1]],
                points[i],
            ) <= 0.0
        {
            upper.pop();
        }
        upper.push(i);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// A circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point2<f32>,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Point2<f32>, radius: f32) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn area(&self) -> f32 {
        PI * self.radius * self.radius
    }

    /// Returns whether `p` lies in the circle, allowing a small relative tolerance for rounding.
    pub fn contains(&self, p: Point2<f32>) -> bool {
        (p - self.center).norm() <= self.radius * (1.0 + 1e-5) + 1e-4
    }

    fn from_two(a: Point2<f32>, b: Point2<f32>) -> Self {
        let center = nalgebra::center(&a, &b);
        Self::new(center, (a - center).norm())
    }

    /// Circumcircle of three points.
    ///
    /// Falls back to the circle over the two farthest-apart points when `a`, `b` and `c` are
    /// collinear.
    fn from_three(a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> Self {
        let ab: Vector2<f32> = b - a;
        let ac: Vector2<f32> = c - a;
        let d = 2.0 * (ab.x * ac.y - ab.y * ac.x);
        if d.abs() < 1e-6 {
            return [(a, b), (a, c), (b, c)]
                .into_iter()
                .map(|(p, q)| Self::from_two(p, q))
                .max_by(|x, y| x.radius.total_cmp(&y.radius))
                .unwrap_or_else(|| Self::new(a, 0.0));
        }
        let ab2 = ab.norm_squared();
        let ac2 = ac.norm_squared();
        let offset = Vector2::new(
            (ac.y * ab2 - ab.y * ac2) / d,
            (ab.x * ac2 - ac.x * ab2) / d,
        );
        Self::new(a + offset, offset.norm())
    }
}

/// Computes the smallest circle enclosing all `points`.
///
/// The circle is supported by one, two or three of the input points. Returns [`None`] if `points`
/// is empty; a single point yields a circle of radius 0.
///
/// This is the iterative form of Welzl's algorithm, without the random shuffle: the inputs here
/// are a handful of defect points, so the quadratic-ish worst case doesn't matter, and a
/// deterministic result is more useful.
pub fn min_enclosing_circle(points: &[Point2<f32>]) -> Option<Circle> {
    let (&first, rest) = points.split_first()?;
    let mut circle = Circle::new(first, 0.0);
    for (i, &p) in rest.iter().enumerate() {
        if circle.contains(p) {
            continue;
        }
        // `p` is on the boundary of the enclosing circle of `points[..=i + 1]`.
        circle = Circle::new(p, 0.0);
        for (j, &q) in points[..=i].iter().enumerate() {
            if circle.contains(q) {
                continue;
            }
            circle = Circle::from_two(p, q);
            for &r in &points[..j] {
                if !circle.contains(r) {
                    circle = Circle::from_three(p, q, r);
                }
            }
        }
    }
    Some(circle)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::point;

    use super::*;

    fn random_points(seed: u64, n: usize) -> Vec<Point2<f32>> {
        let mut rng = fastrand::Rng::with_seed(seed);
        std::iter::repeat_with(|| point![rng.f32() * 200.0 - 100.0, rng.f32() * 100.0])
            .take(n)
            .collect()
    }

    #[test]
    fn hull_of_square_with_inner_points() {
        let points = [
            point![0.0, 0.0],
            point![5.0, 5.0],
            point![10.0, 0.0],
            point![10.0, 10.0],
            point![5.0, 0.0], // collinear, dropped
            point![0.0, 10.0],
            point![2.0, 3.0],
        ];
        let mut hull = convex_hull_indices(&points);
        assert_eq!(hull.len(), 4);
        hull.sort();
        assert_eq!(hull, [0, 2, 3, 5]);
    }

    #[test]
    fn hull_degenerate() {
        assert!(convex_hull_indices(&[]).is_empty());
        assert_eq!(convex_hull_indices(&[point![1.0, 1.0]]), [0]);
        assert_eq!(
            convex_hull_indices(&[point![1.0, 1.0], point![1.0, 1.0], point![2.0, 1.0]]),
            [0, 2]
        );
    }

    #[test]
    fn hull_contains_all_points() {
        for seed in 0..8 {
            let points = random_points(seed, 64);
            let hull = convex_hull_indices(&points);
            assert!(hull.len() >= 3);
            for k in 0..hull.len() {
                let a = points[hull[k]];
                let b = points[hull[(k + 1) % hull.len()]];
                for &p in &points {
                    assert!(cross(a, b, p) >= -1e-3, "{p} is outside hull edge {a}-{b}");
                }
            }
        }
    }

    #[test]
    fn line_distance_basics() {
        let a = point![0.0, 0.0];
        let b = point![10.0, 0.0];
        assert_relative_eq!(line_distance(point![3.0, 4.0], a, b), 4.0);
        assert_relative_eq!(line_distance(point![3.0, -4.0], a, b), 4.0);
        assert_relative_eq!(line_distance(point![3.0, 4.0], a, a), 5.0);
    }

    #[test]
    fn enclosing_circle_small_inputs() {
        assert!(min_enclosing_circle(&[]).is_none());

        let single = min_enclosing_circle(&[point![3.0, 4.0]]).unwrap();
        assert_eq!(single, Circle::new(point![3.0, 4.0], 0.0));

        let pair = min_enclosing_circle(&[point![0.0, 0.0], point![4.0, 0.0]]).unwrap();
        assert_relative_eq!(pair.center, point![2.0, 0.0]);
        assert_relative_eq!(pair.radius, 2.0);
    }

    #[test]
    fn enclosing_circle_of_triangle() {
        // Right triangle: the hypotenuse is the diameter.
        let c = min_enclosing_circle(&[point![0.0, 0.0], point![6.0, 0.0], point![0.0, 8.0]])
            .unwrap();
        assert_relative_eq!(c.center, point![3.0, 4.0], epsilon = 1e-4);
        assert_relative_eq!(c.radius, 5.0, epsilon = 1e-4);

        // Acute triangle: circumcircle.
        let pts = [point![0.0, 0.0], point![2.0, 0.0], point![1.0, 1.5]];
        let c = min_enclosing_circle(&pts).unwrap();
        for p in pts {
            assert_relative_eq!((p - c.center).norm(), c.radius, epsilon = 1e-4);
        }

        // Obtuse triangle: the longest side is the diameter.
        let c = min_enclosing_circle(&[point![0.0, 0.0], point![10.0, 0.0], point![5.0, 1.0]])
            .unwrap();
        assert_relative_eq!(c.center, point![5.0, 0.0], epsilon = 1e-4);
        assert_relative_eq!(c.radius, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn enclosing_circle_of_points_on_circle() {
        let center = point![50.0, 40.0];
        let points: Vec<_> = (0..7)
            .map(|i| {
                let a = i as f32 * 0.9;
                center + Vector2::new(a.cos(), a.sin()) * 20.0
            })
            .collect();
        let c = min_enclosing_circle(&points).unwrap();
        assert_relative_eq!(c.center, center, epsilon = 1e-3);
        assert_relative_eq!(c.radius, 20.0, epsilon = 1e-3);
    }

    #[test]
    fn enclosing_circle_contains_random_points() {
        for seed in 0..8 {
            let points = random_points(seed, 40);
            let c = min_enclosing_circle(&points).unwrap();
            for &p in &points {
                assert!(c.contains(p), "{p} outside {c:?}");
            }
            // At least two points lie on the boundary.
            let on_boundary = points
                .iter()
                .filter(|&&p| ((p - c.center).norm() - c.radius).abs() < 1e-2)
                .count();
            assert!(on_boundary >= 2);
        }
    }
}

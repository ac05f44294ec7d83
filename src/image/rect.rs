use std::{cmp, fmt};

use nalgebra::{Point2, Rotation2, Vector2};

use crate::geom::convex_hull_indices;

/// An axis-aligned rectangle.
///
/// This rectangle type uses (signed) integer coordinates and is meant to be used with the
/// [`crate::image`] module: it covers the pixels `x..x + width` and `y..y + height`.
///
/// Rectangles are allowed to have zero height and/or width.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl Rect {
    /// Creates a rectangle extending downwards and right from a point.
    #[inline]
    pub fn from_top_left(top_left_x: i32, top_left_y: i32, width: u32, height: u32) -> Self {
        Self {
            x: top_left_x,
            y: top_left_y,
            width,
            height,
        }
    }

    /// Creates a rectangle from two opposing corner points.
    ///
    /// Both corners are *included* in the rectangle.
    pub fn from_corners(top_left: (i32, i32), bottom_right: (i32, i32)) -> Self {
        Self::span_inner(top_left.0, top_left.1, bottom_right.0, bottom_right.1)
    }

    /// Computes the (axis-aligned) bounding rectangle that encompasses `points`.
    ///
    /// Returns `None` if `points` is an empty iterator.
    pub fn bounding<I: IntoIterator<Item = (i32, i32)>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();

        let (x, y) = iter.next()?;
        let (mut x_min, mut x_max, mut y_min, mut y_max) = (x, x, y, y);

        for (x, y) in iter {
            x_min = cmp::min(x_min, x);
            x_max = cmp::max(x_max, x);
            y_min = cmp::min(y_min, y);
            y_max = cmp::max(y_max, y);
        }

        Some(Self::span_inner(x_min, y_min, x_max, y_max))
    }

    fn span_inner(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        assert!(x_min <= x_max, "x_min={}, x_max={}", x_min, x_max);
        assert!(y_min <= y_max, "y_min={}, y_max={}", y_min, y_max);
        Self {
            x: x_min,
            y: y_min,
            width: (i64::from(x_max) - i64::from(x_min) + 1) as u32,
            height: (i64::from(y_max) - i64::from(y_min) + 1) as u32,
        }
    }

    /// Returns the X coordinate of the left side of the rectangle.
    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Returns the Y coordinate of the top side of the rectangle.
    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the X coordinate one past the right edge.
    #[inline]
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Returns the Y coordinate one past the bottom edge.
    #[inline]
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Returns the number of pixels contained in `self`.
    #[inline]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn center(&self) -> Point2<f32> {
        Point2::new(
            self.x as f32 + self.width as f32 * 0.5,
            self.y as f32 + self.height as f32 * 0.5,
        )
    }

    #[must_use]
    pub fn move_by(&self, x: i32, y: i32) -> Rect {
        Rect::from_top_left(self.x + x, self.y + y, self.width, self.height)
    }

    /// Returns a copy of `self` with its height replaced by `height`.
    #[must_use]
    pub fn with_height(&self, height: u32) -> Rect {
        Rect { height, ..*self }
    }

    /// Computes the intersection of `self` and `other`.
    ///
    /// Returns `None` when the intersection is empty (ie. the rectangles do not overlap).
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x_min = self.x.max(other.x);
        let y_min = self.y.max(other.y);
        let x_max = self.right().min(other.right()) - 1;
        let y_max = self.bottom().min(other.bottom()) - 1;
        if i64::from(x_min) > x_max || i64::from(y_min) > y_max {
            return None;
        }
        Some(Rect::from_corners((x_min, y_min), (x_max as i32, y_max as i32)))
    }

    /// Returns whether `self` contains `other`.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }

    /// Returns whether the pixel at `(x, y)` lies inside of `self`.
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        self.x <= x && self.y <= y && i64::from(x) < self.right() && i64::from(y) < self.bottom()
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y, w, h) = (self.x, self.y, self.width, self.height);
        let (bx, by) = (self.right(), self.bottom());
        write!(f, "Rect @ ({x},{y})-({bx},{by})/{w}x{h}")
    }
}

/// A rectangle with `f32` center and size, rotated around its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedRect {
    center: Point2<f32>,
    size: Vector2<f32>,
    radians: f32,
}

impl RotatedRect {
    /// Creates a new rotated rectangle.
    ///
    /// `radians` is the rotation to apply to the axis-aligned rectangle of the given `size`. Since
    /// Y points down in image coordinates, positive angles rotate clockwise on screen.
    #[inline]
    pub fn new(center: Point2<f32>, size: Vector2<f32>, radians: f32) -> Self {
        Self {
            center,
            size,
            radians,
        }
    }

    /// Computes the bounding rectangle with rotation `radians` that encompasses `points`.
    ///
    /// Returns [`None`] if `points` is an empty iterator.
    pub fn bounding<I: IntoIterator<Item = Point2<f32>>>(radians: f32, points: I) -> Option<Self> {
        let mut points = points.into_iter().peekable();

        // Make sure we have at least 1 point.
        points.peek()?;

        // Rotate all points into the rectangle's frame, where it is axis-aligned, then rotate its
        // center back. The pivot doesn't matter, so we use the origin.
        let into = Rotation2::new(-radians);
        let mut min = Vector2::repeat(f32::MAX);
        let mut max = Vector2::repeat(f32::MIN);
        for p in points {
            let p = into * p.coords;
            min = min.inf(&p);
            max = max.sup(&p);
        }

        let center = Rotation2::new(radians) * ((min + max) * 0.5);
        Some(Self::new(Point2::from(center), max - min, radians))
    }

    /// Computes the minimum-area rotated rectangle enclosing `points`.
    ///
    /// One side of the minimal rectangle is always collinear with an edge of the convex hull, so
    /// only the hull edge directions are tried. Returns [`None`] if `points` is empty.
    pub fn min_area(points: &[Point2<f32>]) -> Option<Self> {
        let hull: Vec<Point2<f32>> = convex_hull_indices(points)
            .into_iter()
            .map(|i| points[i])
            .collect();
        if hull.len() < 3 {
            // A point or a segment: align with the segment, if any.
            let radians = match hull.as_slice() {
                [a, b] => (b.y - a.y).atan2(b.x - a.x),
                _ => 0.0,
            };
            return Self::bounding(radians, hull.iter().copied());
        }

        (0..hull.len())
            .filter_map(|k| {
                let a = hull[k];
                let b = hull[(k + 1) % hull.len()];
                Self::bounding((b.y - a.y).atan2(b.x - a.x), hull.iter().copied())
            })
            .min_by(|a, b| a.area().total_cmp(&b.area()))
    }

    /// Returns the rectangle's rotation in radians.
    #[inline]
    pub fn rotation_radians(&self) -> f32 {
        self.radians
    }

    /// Returns the rectangle's rotation in degrees.
    pub fn rotation_degrees(&self) -> f32 {
        self.radians.to_degrees()
    }

    #[inline]
    pub fn center(&self) -> Point2<f32> {
        self.center
    }

    /// Returns the width and height of the rectangle, measured along its own (rotated) axes.
    #[inline]
    pub fn size(&self) -> Vector2<f32> {
        self.size
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.size.x * self.size.y
    }

    /// Returns the rotated rectangle's corners.
    ///
    /// The order is: top-left, top-right, bottom-right, bottom-left, as seen from the non-rotated
    /// rect: after the rotation is applied, the corners can be rotated anywhere else, but the order
    /// is retained.
    pub fn rotated_corners(&self) -> [Point2<f32>; 4] {
        let half = self.size * 0.5;
        let rot = Rotation2::new(self.radians);
        [
            Vector2::new(-half.x, -half.y),
            Vector2::new(half.x, -half.y),
            Vector2::new(half.x, half.y),
            Vector2::new(-half.x, half.y),
        ]
        .map(|rel| self.center + rot * rel)
    }

    /// Returns whether `point` lies inside of `self` (edges included).
    pub fn contains_point(&self, point: Point2<f32>) -> bool {
        let rel = Rotation2::new(-self.radians) * (point - self.center);
        let half = self.size * 0.5;
        rel.x.abs() <= half.x + 1e-4 && rel.y.abs() <= half.y + 1e-4
    }
}

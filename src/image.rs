//! Binary masks.
//!
//! This module provides:
//!
//! - The [`Mask`] type, an owned single-channel image where every nonzero pixel is foreground.
//! - Contour extraction on masks ([`Mask::external_contours`]).
//! - The erase operations used to cut the palm out of a hand silhouette.
//! - [`Rect`] and [`RotatedRect`], rectangles in mask coordinates.

mod rect;


use std::fmt;

use image::{GrayImage, Luma};
use imageproc::contours::BorderType;
use nalgebra::Point2;

use crate::{contour::Contour, resolution::Resolution};

pub use rect::*;

const BACKGROUND: Luma<u8> = Luma([0]);
const FOREGROUND: Luma<u8> = Luma([255]);

/// A binary image: nonzero pixels are foreground (skin), zero pixels are background.
///
/// Any single-channel 8-bit image can be used as a mask. The operations on [`Mask`] only ever
/// write `0` and `255`.
#[derive(Clone, PartialEq, Eq)]
pub struct Mask {
    buf: GrayImage,
}

impl Mask {
    /// Creates an all-background mask of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buf: GrayImage::new(width, height),
        }
    }

    /// Wraps an existing grayscale image.
    pub fn from_gray(buf: GrayImage) -> Self {
        Self { buf }
    }

    /// Creates a mask from row-major pixel data.
    ///
    /// Returns [`None`] if `data` does not have exactly `width * height` elements.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        GrayImage::from_raw(width, height, data).map(Self::from_gray)
    }

    /// Returns the width of this mask, in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    /// Returns the height of this mask, in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width(), self.height())
    }

    /// Returns a [`Rect`] covering this mask.
    ///
    /// The rectangle will be positioned at `(0, 0)` and have the width and height of the mask.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_top_left(0, 0, self.width(), self.height())
    }

    /// Returns whether the pixel at `(x, y)` is foreground.
    ///
    /// Pixels outside of the mask are background.
    pub fn get(&self, x: i32, y: i32) -> bool {
        if !self.rect().contains_point(x, y) {
            return false;
        }
        self.buf[(x as u32, y as u32)].0[0] != 0
    }

    /// Sets the pixel at `(x, y)`. Writes outside of the mask are ignored.
    pub fn set(&mut self, x: i32, y: i32, foreground: bool) {
        if !self.rect().contains_point(x, y) {
            return;
        }
        self.buf[(x as u32, y as u32)] = if foreground { FOREGROUND } else { BACKGROUND };
    }

    /// Returns the number of foreground pixels.
    pub fn count_foreground(&self) -> usize {
        self.buf.as_raw().iter().filter(|&&v| v != 0).count()
    }

    #[inline]
    pub fn as_gray(&self) -> &GrayImage {
        &self.buf
    }

    pub fn into_gray(self) -> GrayImage {
        self.buf
    }

    /// Finds the outer boundaries of all foreground regions.
    ///
    /// Only outermost borders are returned: holes, and regions nested inside of holes, are
    /// skipped. The contours are returned in raster scan order of their topmost-leftmost pixel,
    /// and each contour starts at that pixel. Regions touching the edges of the mask are included.
    pub fn external_contours(&self) -> Vec<Contour> {
        if self.rect().is_empty() {
            return Vec::new();
        }

        // `find_contours` never starts a border in the first column, so trace a copy with a
        // 1-pixel background frame.
        let mut padded = GrayImage::new(self.width() + 2, self.height() + 2);
        for (x, y, pix) in self.buf.enumerate_pixels() {
            padded.put_pixel(x + 1, y + 1, *pix);
        }

        imageproc::contours::find_contours::<i32>(&padded)
            .into_iter()
            .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
            .map(|c| {
                Contour::new(
                    c.points
                        .into_iter()
                        .map(|p| Point2::new(p.x - 1, p.y - 1))
                        .collect(),
                )
            })
            .collect()
    }

    /// Copies the area covered by `rect` into a new mask of the size of `rect`.
    ///
    /// Parts of `rect` that lie outside of `self` are background in the result.
    pub fn crop(&self, rect: Rect) -> Mask {
        let mut out = Mask::new(rect.width(), rect.height());
        if let Some(area) = rect.intersection(&self.rect()) {
            for y in area.y()..area.y() + area.height() as i32 {
                for x in area.x()..area.x() + area.width() as i32 {
                    let pix = self.buf[(x as u32, y as u32)];
                    out.buf[((x - rect.x()) as u32, (y - rect.y()) as u32)] = pix;
                }
            }
        }
        out
    }

    /// Sets every pixel within `radius` of `center` to background.
    ///
    /// The circle may extend past (or lie completely outside of) the mask.
    pub fn erase_circle(&mut self, center: Point2<f32>, radius: f32) {
        if radius.is_nan() || radius < 0.0 {
            return;
        }
        imageproc::drawing::draw_filled_circle_mut(
            &mut self.buf,
            (center.x.round() as i32, center.y.round() as i32),
            radius.round() as i32,
            BACKGROUND,
        );
    }

    /// Sets every pixel inside of `rect` to background.
    pub fn erase_rect(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        imageproc::drawing::draw_filled_rect_mut(
            &mut self.buf,
            imageproc::rect::Rect::at(rect.x(), rect.y()).of_size(rect.width(), rect.height()),
            BACKGROUND,
        );
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} Mask", self.width(), self.height())
    }
}

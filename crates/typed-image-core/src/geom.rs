//! Integer geometry used for image extents, regions of interest and line
//! profiles.

use std::fmt;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Width/height pair in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    #[inline]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered.
    #[inline]
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Axis-aligned pixel rectangle; `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    #[inline]
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole image of the given size.
    #[inline]
    pub const fn full(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Build from edge coordinates, `left..right` x `top..bottom`.
    pub fn from_edges(left: usize, right: usize, top: usize, bottom: usize) -> Option<Self> {
        if right < left || bottom < top {
            return None;
        }
        Some(Self::new(left, top, right - left, bottom - top))
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when the rectangle is non-empty and lies inside `bounds`.
    pub fn fits_in(&self, bounds: Size) -> bool {
        !self.is_empty()
            && self.x < bounds.width
            && self.y < bounds.height
            && self.width <= bounds.width - self.x
            && self.height <= bounds.height - self.y
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[x={}, y={}, {}x{}]",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Straight segment between two pixel centers, `x` = column, `y` = row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSegment {
    pub p1: Point2<i32>,
    pub p2: Point2<i32>,
}

impl LineSegment {
    pub fn new(p1: Point2<i32>, p2: Point2<i32>) -> Self {
        Self { p1, p2 }
    }

    /// Number of pixels an 8-connected rasterization visits, endpoints included.
    pub fn pixel_count(&self) -> usize {
        let dx = (i64::from(self.p2.x) - i64::from(self.p1.x)).unsigned_abs();
        let dy = (i64::from(self.p2.y) - i64::from(self.p1.y)).unsigned_abs();
        dx.max(dy) as usize + 1
    }

    /// Lazy 8-connected Bresenham walk from `p1` to `p2`, endpoints included.
    pub fn rasterize(&self) -> LineWalk {
        let (x0, y0) = (i64::from(self.p1.x), i64::from(self.p1.y));
        let (x1, y1) = (i64::from(self.p2.x), i64::from(self.p2.y));
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        LineWalk {
            x: x0,
            y: y0,
            x1,
            y1,
            dx,
            dy,
            sx: if x0 < x1 { 1 } else { -1 },
            sy: if y0 < y1 { 1 } else { -1 },
            err: dx + dy,
            done: false,
        }
    }
}

/// Iterator returned by [`LineSegment::rasterize`].
///
/// Error terms are kept in `i64` so endpoints anywhere in the `i32` range
/// cannot overflow.
#[derive(Clone, Debug)]
pub struct LineWalk {
    x: i64,
    y: i64,
    x1: i64,
    y1: i64,
    dx: i64,
    dy: i64,
    sx: i64,
    sy: i64,
    err: i64,
    done: bool,
}

impl Iterator for LineWalk {
    type Item = Point2<i32>;

    fn next(&mut self) -> Option<Point2<i32>> {
        if self.done {
            return None;
        }
        // x and y stay between the endpoints, so they fit back into i32.
        let point = Point2::new(self.x as i32, self.y as i32);
        if self.x == self.x1 && self.y == self.y1 {
            self.done = true;
            return Some(point);
        }
        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let left = (self.x1 - self.x).unsigned_abs().max((self.y1 - self.y).unsigned_abs());
        match usize::try_from(left).ok().and_then(|n| n.checked_add(1)) {
            Some(n) => (n, Some(n)),
            None => (usize::MAX, None),
        }
    }
}

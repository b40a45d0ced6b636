#![forbid(unsafe_code)]

//! Geometric primitives for listbox layout, damage and clipping.
//!
//! All coordinates are widget-relative pixels with the origin at the top-left
//! corner of the listbox. Edges saturate instead of overflowing so degenerate
//! sizes never panic.

use smallvec::SmallVec;

/// A position relative to the widget origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    #[inline]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    /// Zero-sized extent.
    pub const ZERO: Self = Self::new(0, 0);

    #[inline]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Check if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A rectangle used for row bounds, scrollbar placement and damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in pixels.
    pub width: u16,
    /// Height in pixels.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle anchored at the widget origin.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Overlapping part of two rectangles, or `None` when they are disjoint.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Translate by `dy` rows of pixels, saturating at the bottom edge.
    #[inline]
    #[must_use]
    pub const fn offset_y(self, dy: u16) -> Self {
        Self::new(self.x, self.y.saturating_add(dy), self.width, self.height)
    }
}

/// A set of rectangles describing a damaged or clipped area.
///
/// Listbox damage is almost always one or two rows, so the rects live inline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Region {
    rects: SmallVec<[Rect; 2]>,
}

impl Region {
    /// An empty region.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rectangle. Empty rectangles and exact duplicates are ignored.
    pub fn add(&mut self, rect: Rect) {
        if rect.is_empty() || self.rects.contains(&rect) {
            return;
        }
        self.rects.push(rect);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// The rectangles making up this region, in insertion order.
    #[must_use]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Smallest rectangle covering the whole region.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        let first = *self.rects.first()?;
        Some(self.rects[1..].iter().fold(first, |acc, r| {
            let x = acc.x.min(r.x);
            let y = acc.y.min(r.y);
            let right = acc.right().max(r.right());
            let bottom = acc.bottom().max(r.bottom());
            Rect::new(x, y, right - x, bottom - y)
        }))
    }

    /// Check if any rectangle of the region overlaps `rect`.
    #[must_use]
    pub fn intersects(&self, rect: &Rect) -> bool {
        self.rects.iter().any(|r| r.intersection(rect).is_some())
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        let mut region = Self::new();
        region.add(rect);
        region
    }
}

impl FromIterator<Rect> for Region {
    fn from_iter<I: IntoIterator<Item = Rect>>(iter: I) -> Self {
        let mut region = Self::new();
        for rect in iter {
            region.add(rect);
        }
        region
    }
}

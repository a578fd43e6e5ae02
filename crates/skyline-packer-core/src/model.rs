use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge coordinate (`x + w`).
    pub fn right(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge coordinate (`y + h`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    pub fn size(&self) -> RectSize {
        RectSize::new(self.w, self.h)
    }
    /// True if either side is zero.
    pub fn is_degenerate(&self) -> bool {
        self.w == 0 || self.h == 0
    }
    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
    /// Open-interval overlap test: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, r: &Rect) -> bool {
        !(self.right() <= r.x || r.right() <= self.x || self.bottom() <= r.y || r.bottom() <= self.y)
    }
}

/// Size of a rectangle that has not been placed yet.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RectSize {
    pub w: u32,
    pub h: u32,
}

impl RectSize {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
}

impl From<(u32, u32)> for RectSize {
    fn from((w, h): (u32, u32)) -> Self {
        Self { w, h }
    }
}

/// One horizontal segment of the skyline: `[x, x + w)` is covered up to height `y`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkylineNode {
    pub x: u32,
    pub y: u32,
    pub w: u32,
}

impl SkylineNode {
    #[inline]
    pub fn left(&self) -> u32 {
        self.x
    }
    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.w
    }
}

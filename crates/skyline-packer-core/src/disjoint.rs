//! Pairwise overlap oracle for tests and benches.
//!
//! Nothing in the packers consults this; wrap a packer's output with it to assert that
//! placements (and harvested waste) never overlap.

use crate::model::Rect;

/// Growing set of mutually disjoint rectangles.
#[derive(Debug, Clone, Default)]
pub struct DisjointRects {
    rects: Vec<Rect>,
}

impl DisjointRects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `r` if it overlaps nothing recorded so far. Returns false (and records
    /// nothing) on overlap. Degenerate rectangles are accepted but never stored.
    pub fn add(&mut self, r: Rect) -> bool {
        if r.is_degenerate() {
            return true;
        }
        if !self.disjoint(&r) {
            return false;
        }
        self.rects.push(r);
        true
    }

    /// Same test as [`add`](Self::add) without recording.
    pub fn disjoint(&self, r: &Rect) -> bool {
        if r.is_degenerate() {
            return true;
        }
        self.rects.iter().all(|other| are_disjoint(r, other))
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// True if `a` and `b` do not overlap. Shared edges and degenerate rectangles never overlap.
pub fn are_disjoint(a: &Rect, b: &Rect) -> bool {
    a.is_degenerate() || b.is_degenerate() || !a.intersects(b)
}

/// True if no two rectangles in `rects` overlap.
pub fn all_disjoint(rects: &[Rect]) -> bool {
    let mut oracle = DisjointRects::new();
    rects.iter().all(|r| oracle.add(*r))
}

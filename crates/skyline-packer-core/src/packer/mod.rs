use crate::config::{FreeRectChoice, SplitRule};
use crate::model::Rect;

pub mod guillotine;
pub mod skyline;

/// A packer places rectangles into a fixed-size bin.
///
/// Implementations must ensure no overlaps and keep every placement inside the bin.
/// `pack` returns `None` if the rectangle cannot be placed.
pub trait Packer {
    fn can_pack(&self, w: u32, h: u32) -> bool;
    fn pack(&mut self, w: u32, h: u32) -> Option<Rect>;
    /// Fraction of the bin area claimed so far, in `[0, 1]`.
    fn occupancy(&self) -> f64;
}

/// Secondary packer that receives the gaps a skyline leaves under its placements.
///
/// The skyline only appends to the free list and asks for single insertions; how the map
/// chooses and splits free rectangles is up to the implementation.
pub trait WasteMap {
    /// Re-initializes the map to a `w` x `h` bin with an empty free list.
    fn reset(&mut self, w: u32, h: u32);
    /// Places a `w` x `h` rectangle into one of the free rectangles.
    fn insert(
        &mut self,
        w: u32,
        h: u32,
        merge: bool,
        choice: FreeRectChoice,
        split: SplitRule,
    ) -> Option<Rect>;
    /// True if `insert` would currently place a `w` x `h` rectangle.
    fn can_insert(&self, w: u32, h: u32) -> bool;
    fn free_rectangles(&self) -> &[Rect];
    fn free_rectangles_mut(&mut self) -> &mut Vec<Rect>;
}

use super::guillotine::GuillotinePacker;
use super::{Packer, WasteMap};
use crate::config::{FreeRectChoice, PackerConfig, SkylineHeuristic, SplitRule};
use crate::error::Result;
use crate::model::{Rect, RectSize, SkylineNode};
use tracing::{debug, instrument, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A scored placement of one request on top of skyline node `node`.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    node: usize,
    rect: Rect,
    score: (u64, u64),
}

impl Candidate {
    #[inline]
    fn beats(&self, other: &Candidate) -> bool {
        self.score < other.score
    }
}

/// Read-only view of a skyline used by the placement search.
#[derive(Clone, Copy)]
struct Search<'a> {
    skyline: &'a [SkylineNode],
    bin_width: u32,
    bin_height: u32,
}

impl Search<'_> {
    /// Resting height of a `w` x `h` rectangle whose left edge is at node `index`, or `None`
    /// if it would cross the right or bottom edge of the bin.
    fn fits(&self, index: usize, w: u32, h: u32) -> Option<u32> {
        let start = self.skyline[index];
        if start.x as u64 + w as u64 > self.bin_width as u64 {
            return None;
        }
        let mut y = start.y;
        let mut width_left = w;
        let mut i = index;
        while width_left > 0 {
            let node = self.skyline.get(i)?;
            y = y.max(node.y);
            width_left = width_left.saturating_sub(node.w);
            i += 1;
        }
        if y as u64 + h as u64 > self.bin_height as u64 {
            return None;
        }
        Some(y)
    }

    /// Area between a rectangle resting at `y` and the skyline under its footprint.
    fn wasted_area(&self, index: usize, w: u32, y: u32) -> u64 {
        let left = self.skyline[index].x;
        let right = left + w;
        self.skyline[index..]
            .iter()
            .take_while(|n| n.x < right)
            .map(|n| {
                debug_assert!(y >= n.y, "rect rests below skyline node {n:?}");
                let use_w = n.right().min(right) - n.x;
                use_w as u64 * y.saturating_sub(n.y) as u64
            })
            .sum()
    }

    fn bottom_left(&self, w: u32, h: u32) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for (i, node) in self.skyline.iter().enumerate() {
            let Some(y) = self.fits(i, w, h) else {
                continue;
            };
            let cand = Candidate {
                node: i,
                rect: Rect::new(node.x, y, w, h),
                score: (y as u64 + h as u64, node.w as u64),
            };
            if best.as_ref().is_none_or(|b| cand.beats(b)) {
                best = Some(cand);
            }
        }
        best
    }

    fn min_waste(&self, w: u32, h: u32) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for (i, node) in self.skyline.iter().enumerate() {
            let Some(y) = self.fits(i, w, h) else {
                continue;
            };
            let cand = Candidate {
                node: i,
                rect: Rect::new(node.x, y, w, h),
                score: (self.wasted_area(i, w, y), y as u64 + h as u64),
            };
            if best.as_ref().is_none_or(|b| cand.beats(b)) {
                best = Some(cand);
            }
        }
        best
    }

    fn find(&self, heuristic: SkylineHeuristic, w: u32, h: u32) -> Option<Candidate> {
        match heuristic {
            SkylineHeuristic::BottomLeft => self.bottom_left(w, h),
            SkylineHeuristic::MinWaste => self.min_waste(w, h),
        }
    }

    /// Best (request index, placement) over all pending requests; the first minimum wins.
    #[cfg(not(feature = "parallel"))]
    fn best_request(
        &self,
        rects: &[RectSize],
        heuristic: SkylineHeuristic,
    ) -> Option<(usize, Candidate)> {
        let mut best: Option<(usize, Candidate)> = None;
        for (i, r) in rects.iter().enumerate() {
            let Some(cand) = self.find(heuristic, r.w, r.h) else {
                continue;
            };
            if best.as_ref().is_none_or(|(_, b)| cand.beats(b)) {
                best = Some((i, cand));
            }
        }
        best
    }

    #[cfg(feature = "parallel")]
    fn best_request(
        &self,
        rects: &[RectSize],
        heuristic: SkylineHeuristic,
    ) -> Option<(usize, Candidate)> {
        rects
            .par_iter()
            .enumerate()
            .filter_map(|(i, r)| self.find(heuristic, r.w, r.h).map(|c| (i, c)))
            .min_by_key(|(i, c)| (c.score, *i))
    }
}

/// Skyline bin packer with optional waste-map recovery.
///
/// The skyline is an ordered list of nodes covering `[0, bin_width)`, each node recording
/// the height already claimed over its span. Between calls the nodes are contiguous, their
/// `x` is strictly increasing and no two neighbours share the same `y`.
///
/// With the waste map enabled, the gap left under each placement is handed to a secondary
/// packer `W` and single inserts are served from it first.
#[derive(Debug, Clone)]
pub struct SkylinePacker<W = GuillotinePacker> {
    bin_width: u32,
    bin_height: u32,
    skyline: Vec<SkylineNode>,
    used_area: u64,
    use_waste_map: bool,
    waste: W,
    heuristic: SkylineHeuristic,
    waste_choice: FreeRectChoice,
    waste_split: SplitRule,
    merge_waste: bool,
}

impl<W: WasteMap + Default> SkylinePacker<W> {
    pub fn new(bin_width: u32, bin_height: u32, use_waste_map: bool) -> Self {
        Self::with_waste_map(bin_width, bin_height, use_waste_map, W::default())
    }

    /// Builds a packer from a validated configuration.
    pub fn from_config(config: PackerConfig) -> Result<Self> {
        config.validate()?;
        let mut packer = Self::new(config.bin_width, config.bin_height, config.use_waste_map);
        packer.heuristic = config.heuristic;
        packer.waste_choice = config.waste_choice;
        packer.waste_split = config.waste_split;
        packer.merge_waste = config.merge_waste;
        Ok(packer)
    }
}

impl<W: WasteMap> SkylinePacker<W> {
    /// Uses `waste` as the secondary packer. It is reset to the bin size on every `init`.
    pub fn with_waste_map(bin_width: u32, bin_height: u32, use_waste_map: bool, waste: W) -> Self {
        let mut packer = Self {
            bin_width,
            bin_height,
            skyline: Vec::new(),
            used_area: 0,
            use_waste_map,
            waste,
            heuristic: SkylineHeuristic::BottomLeft,
            waste_choice: FreeRectChoice::BestShortSideFit,
            waste_split: SplitRule::SplitMaximizeArea,
            merge_waste: true,
        };
        packer.init(bin_width, bin_height, use_waste_map);
        packer
    }

    /// Empties the bin: one node spanning the full width at height 0.
    pub fn init(&mut self, bin_width: u32, bin_height: u32, use_waste_map: bool) {
        self.bin_width = bin_width;
        self.bin_height = bin_height;
        self.use_waste_map = use_waste_map;
        self.used_area = 0;
        self.skyline.clear();
        self.skyline.push(SkylineNode {
            x: 0,
            y: 0,
            w: bin_width,
        });
        if use_waste_map {
            self.waste.reset(bin_width, bin_height);
        }
    }

    pub fn bin_width(&self) -> u32 {
        self.bin_width
    }

    pub fn bin_height(&self) -> u32 {
        self.bin_height
    }

    /// Area claimed by skyline and waste-map placements.
    pub fn used_area(&self) -> u64 {
        self.used_area
    }

    pub fn skyline(&self) -> &[SkylineNode] {
        &self.skyline
    }

    pub fn uses_waste_map(&self) -> bool {
        self.use_waste_map
    }

    pub fn waste_map(&self) -> Option<&W> {
        self.use_waste_map.then_some(&self.waste)
    }

    /// Heuristic used by [`insert`](Self::insert) after the waste map misses.
    pub fn heuristic(&self) -> SkylineHeuristic {
        self.heuristic
    }

    pub fn set_heuristic(&mut self, heuristic: SkylineHeuristic) {
        self.heuristic = heuristic;
    }

    /// Fraction of the bin claimed so far.
    pub fn occupancy(&self) -> f64 {
        let bin_area = self.bin_width as u64 * self.bin_height as u64;
        if bin_area > 0 {
            self.used_area as f64 / bin_area as f64
        } else {
            0.0
        }
    }

    fn search(&self) -> Search<'_> {
        Search {
            skyline: &self.skyline,
            bin_width: self.bin_width,
            bin_height: self.bin_height,
        }
    }

    /// True if a `w` x `h` request would currently be placed by [`insert`](Self::insert).
    pub fn can_pack(&self, w: u32, h: u32) -> bool {
        if self.use_waste_map && self.waste.can_insert(w, h) {
            return true;
        }
        self.search().find(self.heuristic, w, h).is_some()
    }

    /// Places one rectangle, trying the waste map before the skyline.
    pub fn insert(&mut self, w: u32, h: u32) -> Option<Rect> {
        self.insert_with(w, h, self.heuristic)
    }

    /// Like [`insert`](Self::insert) with an explicit skyline heuristic for the fallback.
    pub fn insert_with(&mut self, w: u32, h: u32, heuristic: SkylineHeuristic) -> Option<Rect> {
        if let Some(r) = self.insert_into_waste_map(w, h) {
            return Some(r);
        }
        match heuristic {
            SkylineHeuristic::BottomLeft => self.insert_bottom_left(w, h),
            SkylineHeuristic::MinWaste => self.insert_min_waste(w, h),
        }
    }

    /// Places one rectangle on the skyline with the lowest resulting top edge.
    pub fn insert_bottom_left(&mut self, w: u32, h: u32) -> Option<Rect> {
        let cand = self.search().bottom_left(w, h)?;
        Some(self.commit(&cand))
    }

    /// Places one rectangle on the skyline where it traps the least area.
    pub fn insert_min_waste(&mut self, w: u32, h: u32) -> Option<Rect> {
        let cand = self.search().min_waste(w, h)?;
        Some(self.commit(&cand))
    }

    /// Packs as many of `rects` as fit using the min-waste heuristic.
    ///
    /// Each round places the globally best request. Placed requests are removed from
    /// `rects`; whatever is left afterwards did not fit.
    pub fn insert_batch(&mut self, rects: &mut Vec<RectSize>) -> Vec<Rect> {
        self.insert_batch_with(rects, SkylineHeuristic::MinWaste)
    }

    #[instrument(skip_all, fields(requests = rects.len(), heuristic = ?heuristic))]
    pub fn insert_batch_with(
        &mut self,
        rects: &mut Vec<RectSize>,
        heuristic: SkylineHeuristic,
    ) -> Vec<Rect> {
        let mut placed = Vec::with_capacity(rects.len());
        while !rects.is_empty() {
            let Some((rect_index, cand)) = self.search().best_request(rects, heuristic) else {
                break;
            };
            let rect = self.commit(&cand);
            rects.remove(rect_index);
            placed.push(rect);
        }
        debug!(
            placed = placed.len(),
            unplaced = rects.len(),
            "batch insert finished"
        );
        placed
    }

    /// Hands `rect` to the waste map for reuse by later single inserts.
    pub fn add_waste(&mut self, rect: Rect) {
        if !self.use_waste_map {
            debug!(?rect, "waste map disabled; donation dropped");
            return;
        }
        if rect.is_degenerate() {
            return;
        }
        if !Rect::new(0, 0, self.bin_width, self.bin_height).contains(&rect) {
            debug!(?rect, "waste outside the bin; donation dropped");
            return;
        }
        self.waste.free_rectangles_mut().push(rect);
    }

    fn insert_into_waste_map(&mut self, w: u32, h: u32) -> Option<Rect> {
        if !self.use_waste_map {
            return None;
        }
        let rect =
            self.waste
                .insert(w, h, self.merge_waste, self.waste_choice, self.waste_split)?;
        debug_assert!(
            rect.right() <= self.bin_width && rect.bottom() <= self.bin_height,
            "waste map placed {rect:?} outside the bin"
        );
        self.used_area += rect.area();
        debug!(?rect, "placed from waste map");
        Some(rect)
    }

    fn commit(&mut self, cand: &Candidate) -> Rect {
        self.add_skyline_level(cand.node, &cand.rect);
        self.used_area += cand.rect.area();
        trace!(node = cand.node, rect = ?cand.rect, "skyline place");
        cand.rect
    }

    fn add_skyline_level(&mut self, index: usize, rect: &Rect) {
        // Zero-width placements leave the skyline untouched.
        if rect.w == 0 {
            return;
        }
        if self.use_waste_map {
            self.add_waste_areas(index, rect);
        }

        let node = SkylineNode {
            x: rect.x,
            y: rect.bottom(),
            w: rect.w,
        };
        debug_assert!(node.right() <= self.bin_width);
        debug_assert!(node.y <= self.bin_height);
        self.skyline.insert(index, node);

        let i = index + 1;
        while i < self.skyline.len() {
            let prev_right = self.skyline[i - 1].right();
            if self.skyline[i].left() >= prev_right {
                break;
            }
            let shrink = prev_right - self.skyline[i].left();
            if self.skyline[i].w <= shrink {
                self.skyline.remove(i);
            } else {
                self.skyline[i].x += shrink;
                self.skyline[i].w -= shrink;
                break;
            }
        }

        self.merge();
        debug_assert!(self.skyline_is_valid(), "broken skyline: {:?}", self.skyline);
    }

    /// Pushes the gap between `rect` and every node under it (pre-insertion heights).
    fn add_waste_areas(&mut self, index: usize, rect: &Rect) {
        let rect_right = rect.right();
        for node in self.skyline[index..]
            .iter()
            .take_while(|n| n.left() < rect_right)
        {
            let left = node.left().max(rect.x);
            let right = node.right().min(rect_right);
            let w = right.saturating_sub(left);
            let h = rect.y.saturating_sub(node.y);
            if w > 0 && h > 0 {
                let waste = Rect::new(left, node.y, w, h);
                trace!(?waste, "harvested waste");
                self.waste.free_rectangles_mut().push(waste);
            }
        }
    }

    fn merge(&mut self) {
        let mut i = 1;
        while i < self.skyline.len() {
            if self.skyline[i - 1].y == self.skyline[i].y {
                let w = self.skyline[i].w;
                self.skyline[i - 1].w += w;
                self.skyline.remove(i);
            } else {
                i += 1;
            }
        }
    }

    fn skyline_is_valid(&self) -> bool {
        let Some(first) = self.skyline.first() else {
            return false;
        };
        let Some(last) = self.skyline.last() else {
            return false;
        };
        first.x == 0
            && last.right() == self.bin_width
            && self
                .skyline
                .windows(2)
                .all(|p| p[0].right() == p[1].x && p[0].w > 0 && p[0].y != p[1].y)
    }
}

impl<W: WasteMap> Packer for SkylinePacker<W> {
    fn can_pack(&self, w: u32, h: u32) -> bool {
        SkylinePacker::<W>::can_pack(self, w, h)
    }

    fn pack(&mut self, w: u32, h: u32) -> Option<Rect> {
        self.insert(w, h)
    }

    fn occupancy(&self) -> f64 {
        SkylinePacker::<W>::occupancy(self)
    }
}

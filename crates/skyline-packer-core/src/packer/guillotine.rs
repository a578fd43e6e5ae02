use super::{Packer, WasteMap};
use crate::config::{FreeRectChoice, SplitRule};
use crate::model::Rect;
use tracing::trace;

/// Free-list packer that cuts the leftover of every consumed free rectangle in two.
///
/// Used stand-alone or as the skyline's waste map, where it starts with an empty free
/// list and only ever receives gaps harvested from under the skyline.
#[derive(Debug, Clone)]
pub struct GuillotinePacker {
    bin_width: u32,
    bin_height: u32,
    free: Vec<Rect>,
    used: Vec<Rect>,
    used_area: u64,
    choice: FreeRectChoice,
    split: SplitRule,
    merge: bool,
}

impl Default for GuillotinePacker {
    fn default() -> Self {
        Self {
            bin_width: 0,
            bin_height: 0,
            free: Vec::new(),
            used: Vec::new(),
            used_area: 0,
            choice: FreeRectChoice::BestShortSideFit,
            split: SplitRule::SplitMaximizeArea,
            merge: true,
        }
    }
}

impl GuillotinePacker {
    /// A `w` x `h` bin whose free list is the whole bin.
    pub fn new(w: u32, h: u32, choice: FreeRectChoice, split: SplitRule) -> Self {
        let mut packer = Self {
            choice,
            split,
            ..Self::default()
        };
        packer.reset(w, h);
        if w > 0 && h > 0 {
            packer.free.push(Rect::new(0, 0, w, h));
        }
        packer
    }

    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    pub fn used_rectangles(&self) -> &[Rect] {
        &self.used
    }

    pub fn used_area(&self) -> u64 {
        self.used_area
    }

    fn score(choice: FreeRectChoice, fr: &Rect, w: u32, h: u32) -> i64 {
        let area_fit = fr.area() as i64 - (w as u64 * h as u64) as i64;
        let leftover_h = (fr.w as i64 - w as i64).abs();
        let leftover_v = (fr.h as i64 - h as i64).abs();
        let short_fit = leftover_h.min(leftover_v);
        let long_fit = leftover_h.max(leftover_v);
        match choice {
            FreeRectChoice::BestAreaFit => area_fit,
            FreeRectChoice::BestShortSideFit => short_fit,
            FreeRectChoice::BestLongSideFit => long_fit,
            FreeRectChoice::WorstAreaFit => -area_fit,
            FreeRectChoice::WorstShortSideFit => -short_fit,
            FreeRectChoice::WorstLongSideFit => -long_fit,
        }
    }

    fn choose(&self, w: u32, h: u32, choice: FreeRectChoice) -> Option<(usize, Rect)> {
        let mut best_idx = None;
        let mut best_score = i64::MAX;
        for (i, fr) in self.free.iter().enumerate() {
            if fr.w == w && fr.h == h {
                // exact fit
                return Some((i, Rect::new(fr.x, fr.y, w, h)));
            }
            if fr.w >= w && fr.h >= h {
                let s = Self::score(choice, fr, w, h);
                if s < best_score {
                    best_score = s;
                    best_idx = Some(i);
                }
            }
        }
        best_idx.map(|i| (i, Rect::new(self.free[i].x, self.free[i].y, w, h)))
    }

    fn split(split: SplitRule, fr: &Rect, placed: &Rect) -> (Option<Rect>, Option<Rect>) {
        let w_right = fr.w - placed.w;
        let h_bottom = fr.h - placed.h;

        let split_horizontal = match split {
            SplitRule::SplitShorterLeftoverAxis => w_right <= h_bottom,
            SplitRule::SplitLongerLeftoverAxis => w_right > h_bottom,
            SplitRule::SplitMinimizeArea => {
                placed.w as u64 * h_bottom as u64 > w_right as u64 * placed.h as u64
            }
            SplitRule::SplitMaximizeArea => {
                placed.w as u64 * h_bottom as u64 <= w_right as u64 * placed.h as u64
            }
            SplitRule::SplitShorterAxis => fr.w <= fr.h,
            SplitRule::SplitLongerAxis => fr.w > fr.h,
        };

        // Horizontal: the bottom piece spans the full free width and the right piece is
        // only as tall as the placement. Vertical is the transpose.
        let mut bottom = Rect::new(fr.x, fr.y + placed.h, placed.w, h_bottom);
        let mut right = Rect::new(fr.x + placed.w, fr.y, w_right, fr.h);
        if split_horizontal {
            bottom.w = fr.w;
            right.h = placed.h;
        }
        let r1 = (!bottom.is_degenerate()).then_some(bottom);
        let r2 = (!right.is_degenerate()).then_some(right);
        (r1, r2)
    }

    fn place(&mut self, idx: usize, placed: &Rect, split: SplitRule, merge: bool) {
        let fr = self.free.remove(idx);
        let (a, b) = Self::split(split, &fr, placed);
        self.free.extend(a);
        self.free.extend(b);
        if merge {
            self.merge_free_list();
        }
        self.used.push(*placed);
        self.used_area += placed.area();
        trace!(x = placed.x, y = placed.y, w = placed.w, h = placed.h, "guillotine place");
    }

    fn merge_free_list(&mut self) {
        let mut merged = true;
        while merged {
            merged = false;
            'outer: for i in 0..self.free.len() {
                for j in i + 1..self.free.len() {
                    let a = self.free[i];
                    let b = self.free[j];
                    // horizontal merge (same y, height, contiguous in x)
                    if a.y == b.y && a.h == b.h {
                        if a.right() == b.x {
                            self.free[i] = Rect::new(a.x, a.y, a.w + b.w, a.h);
                            self.free.remove(j);
                            merged = true;
                            break 'outer;
                        } else if b.right() == a.x {
                            self.free[i] = Rect::new(b.x, a.y, a.w + b.w, a.h);
                            self.free.remove(j);
                            merged = true;
                            break 'outer;
                        }
                    }
                    // vertical merge (same x, width, contiguous in y)
                    if a.x == b.x && a.w == b.w {
                        if a.bottom() == b.y {
                            self.free[i] = Rect::new(a.x, a.y, a.w, a.h + b.h);
                            self.free.remove(j);
                            merged = true;
                            break 'outer;
                        } else if b.bottom() == a.y {
                            self.free[i] = Rect::new(a.x, b.y, a.w, a.h + b.h);
                            self.free.remove(j);
                            merged = true;
                            break 'outer;
                        }
                    }
                }
            }
        }
    }
}

impl WasteMap for GuillotinePacker {
    fn reset(&mut self, w: u32, h: u32) {
        self.bin_width = w;
        self.bin_height = h;
        self.free.clear();
        self.used.clear();
        self.used_area = 0;
    }

    fn insert(
        &mut self,
        w: u32,
        h: u32,
        merge: bool,
        choice: FreeRectChoice,
        split: SplitRule,
    ) -> Option<Rect> {
        let (idx, place) = self.choose(w, h, choice)?;
        self.place(idx, &place, split, merge);
        Some(place)
    }

    fn can_insert(&self, w: u32, h: u32) -> bool {
        self.free.iter().any(|fr| fr.w >= w && fr.h >= h)
    }

    fn free_rectangles(&self) -> &[Rect] {
        &self.free
    }

    fn free_rectangles_mut(&mut self) -> &mut Vec<Rect> {
        &mut self.free
    }
}

impl Packer for GuillotinePacker {
    fn can_pack(&self, w: u32, h: u32) -> bool {
        self.choose(w, h, self.choice).is_some()
    }

    fn pack(&mut self, w: u32, h: u32) -> Option<Rect> {
        WasteMap::insert(self, w, h, self.merge, self.choice, self.split)
    }

    fn occupancy(&self) -> f64 {
        let bin_area = self.bin_width as u64 * self.bin_height as u64;
        if bin_area > 0 {
            self.used_area as f64 / bin_area as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_area_split_keeps_larger_piece_whole() {
        // 10x4 free, place 5x2: right leftover 5x4 (area 20) vs bottom 10x2 (area 20).
        // placed.w * h_bottom (10) <= w_right * placed.h (10) -> horizontal.
        let fr = Rect::new(0, 0, 10, 4);
        let placed = Rect::new(0, 0, 5, 2);
        let (bottom, right) = GuillotinePacker::split(SplitRule::SplitMaximizeArea, &fr, &placed);
        assert_eq!(bottom, Some(Rect::new(0, 2, 10, 2)));
        assert_eq!(right, Some(Rect::new(5, 0, 5, 2)));
    }

    #[test]
    fn exact_fit_wins_over_better_score() {
        let mut g = GuillotinePacker::default();
        g.reset(20, 20);
        g.free.push(Rect::new(0, 0, 9, 9));
        g.free.push(Rect::new(10, 10, 4, 4));
        let placed = WasteMap::insert(
            &mut g,
            4,
            4,
            true,
            FreeRectChoice::BestAreaFit,
            SplitRule::SplitShorterLeftoverAxis,
        );
        assert_eq!(placed, Some(Rect::new(10, 10, 4, 4)));
        assert_eq!(g.free_rectangles(), &[Rect::new(0, 0, 9, 9)]);
    }

    #[test]
    fn pack_merges_only_when_enabled() {
        let setup = |merge: bool| {
            let mut g = GuillotinePacker::default().with_merge(merge);
            g.reset(8, 8);
            g.free.push(Rect::new(0, 0, 4, 4));
            g.free.push(Rect::new(4, 0, 4, 4));
            g.free.push(Rect::new(0, 4, 8, 4));
            g
        };

        let mut unmerged = setup(false);
        assert_eq!(unmerged.pack(8, 4), Some(Rect::new(0, 4, 8, 4)));
        assert_eq!(unmerged.free_rectangles().len(), 2);
        assert!(!unmerged.can_pack(8, 4));

        let mut merged = setup(true);
        assert_eq!(merged.pack(8, 4), Some(Rect::new(0, 4, 8, 4)));
        assert_eq!(merged.free_rectangles(), &[Rect::new(0, 0, 8, 4)]);
        assert!(merged.can_pack(8, 4));
        assert!(merged.can_insert(8, 4));
    }

    #[test]
    fn merge_joins_edge_sharing_rects() {
        let mut g = GuillotinePacker::default();
        g.reset(8, 8);
        g.free.push(Rect::new(0, 0, 4, 2));
        g.free.push(Rect::new(4, 0, 4, 2));
        g.free.push(Rect::new(0, 2, 8, 3));
        g.merge_free_list();
        assert_eq!(g.free_rectangles(), &[Rect::new(0, 0, 8, 5)]);
    }
}

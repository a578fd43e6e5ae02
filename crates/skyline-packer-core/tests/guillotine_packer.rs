use skyline_packer_core::config::{FreeRectChoice, SplitRule};
use skyline_packer_core::disjoint::DisjointRects;
use skyline_packer_core::model::Rect;
use skyline_packer_core::packer::guillotine::GuillotinePacker;
use skyline_packer_core::packer::skyline::SkylinePacker;
use skyline_packer_core::packer::Packer;

fn fill<P: Packer>(p: &mut P, sizes: &[(u32, u32)]) -> Vec<Rect> {
    sizes.iter().filter_map(|&(w, h)| p.pack(w, h)).collect()
}

#[test]
fn guillotine_disjoint_on_small_set() {
    let mut p = GuillotinePacker::new(
        256,
        256,
        FreeRectChoice::BestAreaFit,
        SplitRule::SplitShorterLeftoverAxis,
    );
    let rects = vec![
        (64, 64),
        (32, 64),
        (64, 32),
        (48, 48),
        (16, 80),
        (80, 16),
        (40, 40),
        (30, 50),
        (50, 30),
    ];
    let placed = fill(&mut p, &rects);
    assert_eq!(placed.len(), rects.len());

    let mut oracle = DisjointRects::new();
    for r in &placed {
        assert!(r.right() <= 256 && r.bottom() <= 256);
        assert!(oracle.add(*r), "{:?} overlaps an earlier placement", r);
    }
    for fr in p.used_rectangles() {
        assert!(placed.contains(fr));
    }
    let used: u64 = placed.iter().map(Rect::area).sum();
    assert!((p.occupancy() - used as f64 / 65536.0).abs() < 1e-12);
}

#[test]
fn guillotine_fills_bin_exactly() {
    let mut p = GuillotinePacker::new(
        8,
        8,
        FreeRectChoice::BestShortSideFit,
        SplitRule::SplitMaximizeArea,
    );
    let placed = fill(&mut p, &[(4, 4), (4, 4), (4, 4), (4, 4)]);
    assert_eq!(placed.len(), 4);
    assert!(!p.can_pack(1, 1));
    assert_eq!(p.pack(1, 1), None);
    assert!((p.occupancy() - 1.0).abs() < 1e-12);
}

#[test]
fn packers_are_interchangeable_behind_the_trait() {
    let sizes = [(10, 10), (20, 5), (5, 20), (15, 15)];
    let mut sky: SkylinePacker = SkylinePacker::new(40, 40, false);
    let mut gui = GuillotinePacker::new(
        40,
        40,
        FreeRectChoice::BestAreaFit,
        SplitRule::SplitShorterLeftoverAxis,
    );
    let packers: [&mut dyn Packer; 2] = [&mut sky, &mut gui];
    for p in packers {
        let placed = fill_dyn(p, &sizes);
        assert_eq!(placed.len(), sizes.len());
        let mut oracle = DisjointRects::new();
        assert!(placed.iter().all(|r| oracle.add(*r)));
        assert!(p.occupancy() > 0.0);
    }
}

fn fill_dyn(p: &mut dyn Packer, sizes: &[(u32, u32)]) -> Vec<Rect> {
    sizes.iter().filter_map(|&(w, h)| p.pack(w, h)).collect()
}

//! Skyline bin packing into a fixed-size bin.
//!
//! - Algorithms: Skyline (Bottom-Left / Min-Waste), optional waste-map recovery backed by a
//!   Guillotine free-list packer
//! - Single inserts return `Option<Rect>`; batch inserts place the globally best request
//!   each round and leave the ones that never fit in the input vector
//! - Configuration and geometry are serde-serializable
//!
//! Quick example:
//! ```
//! use skyline_packer_core::prelude::*;
//!
//! let mut packer: SkylinePacker = SkylinePacker::new(10, 10, false);
//! let r = packer.insert(4, 4).expect("fits in an empty bin");
//! assert_eq!(r, Rect::new(0, 0, 4, 4));
//! assert!((packer.occupancy() - 0.16).abs() < 1e-9);
//! ```

pub mod config;
pub mod disjoint;
pub mod error;
pub mod model;
pub mod packer;

pub use config::*;
pub use error::*;
pub use model::*;
pub use packer::*;

/// Convenience prelude for common types and functions.
/// Importing `skyline_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{
        FreeRectChoice, PackerConfig, PackerConfigBuilder, SkylineHeuristic, SplitRule,
    };
    pub use crate::disjoint::DisjointRects;
    pub use crate::model::{Rect, RectSize, SkylineNode};
    pub use crate::packer::guillotine::GuillotinePacker;
    pub use crate::packer::skyline::SkylinePacker;
    pub use crate::packer::{Packer, WasteMap};
}

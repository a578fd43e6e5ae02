use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Skyline placement heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SkylineHeuristic {
    /// Lowest resulting top edge; ties go to the narrower starting segment.
    BottomLeft,
    /// Least area trapped under the rectangle; ties go to the lowest top edge.
    MinWaste,
}

impl FromStr for SkylineHeuristic {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bl" | "bottomleft" => Ok(Self::BottomLeft),
            "minwaste" | "mw" => Ok(Self::MinWaste),
            _ => Err(()),
        }
    }
}

/// Free-rect choice heuristics used by the guillotine waste map.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FreeRectChoice {
    BestAreaFit,
    BestShortSideFit,
    BestLongSideFit,
    WorstAreaFit,
    WorstShortSideFit,
    WorstLongSideFit,
}

impl FromStr for FreeRectChoice {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "baf" | "bestareafit" => Ok(Self::BestAreaFit),
            "bssf" | "bestshortsidefit" => Ok(Self::BestShortSideFit),
            "blsf" | "bestlongsidefit" => Ok(Self::BestLongSideFit),
            "waf" | "worstareafit" => Ok(Self::WorstAreaFit),
            "wssf" | "worstshortsidefit" => Ok(Self::WorstShortSideFit),
            "wlsf" | "worstlongsidefit" => Ok(Self::WorstLongSideFit),
            _ => Err(()),
        }
    }
}

/// Split axis rules for the leftover of a consumed free rectangle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SplitRule {
    SplitShorterLeftoverAxis,
    SplitLongerLeftoverAxis,
    SplitMinimizeArea,
    SplitMaximizeArea,
    SplitShorterAxis,
    SplitLongerAxis,
}

impl FromStr for SplitRule {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slas" | "splitshorterleftoveraxis" => Ok(Self::SplitShorterLeftoverAxis),
            "llas" | "splitlongerleftoveraxis" => Ok(Self::SplitLongerLeftoverAxis),
            "minas" | "splitminimizearea" => Ok(Self::SplitMinimizeArea),
            "maxas" | "splitmaximizearea" => Ok(Self::SplitMaximizeArea),
            "sas" | "splitshorteraxis" => Ok(Self::SplitShorterAxis),
            "las" | "splitlongeraxis" => Ok(Self::SplitLongerAxis),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackerConfig {
    /// Bin width in pixels.
    pub bin_width: u32,
    /// Bin height in pixels.
    pub bin_height: u32,
    /// Recover gaps under placed rectangles into a secondary free-list packer.
    #[serde(default)]
    pub use_waste_map: bool,
    /// Heuristic used by single inserts when the waste map cannot satisfy a request.
    #[serde(default = "default_heuristic")]
    pub heuristic: SkylineHeuristic,
    /// Free-rect choice passed to the waste map.
    #[serde(default = "default_waste_choice")]
    pub waste_choice: FreeRectChoice,
    /// Split rule passed to the waste map.
    #[serde(default = "default_waste_split")]
    pub waste_split: SplitRule,
    /// Let the waste map merge adjacent free rectangles after each insertion.
    #[serde(default = "default_merge_waste")]
    pub merge_waste: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            bin_width: 1024,
            bin_height: 1024,
            use_waste_map: false,
            heuristic: default_heuristic(),
            waste_choice: default_waste_choice(),
            waste_split: default_waste_split(),
            merge_waste: default_merge_waste(),
        }
    }
}

impl PackerConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if either bin dimension is zero.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::PackerError;

        if self.bin_width == 0 || self.bin_height == 0 {
            return Err(PackerError::InvalidDimensions {
                width: self.bin_width,
                height: self.bin_height,
            });
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration. Missing heuristic fields take their defaults.
    pub fn from_json(s: &str) -> crate::error::Result<Self> {
        let cfg: PackerConfig = serde_json::from_str(s)
            .map_err(|e| crate::error::PackerError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}

fn default_heuristic() -> SkylineHeuristic {
    SkylineHeuristic::BottomLeft
}
fn default_waste_choice() -> FreeRectChoice {
    FreeRectChoice::BestShortSideFit
}
fn default_waste_split() -> SplitRule {
    SplitRule::SplitMaximizeArea
}
fn default_merge_waste() -> bool {
    true
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn with_bin_dimensions(mut self, w: u32, h: u32) -> Self {
        self.cfg.bin_width = w;
        self.cfg.bin_height = h;
        self
    }
    pub fn use_waste_map(mut self, v: bool) -> Self {
        self.cfg.use_waste_map = v;
        self
    }
    pub fn heuristic(mut self, v: SkylineHeuristic) -> Self {
        self.cfg.heuristic = v;
        self
    }
    pub fn waste_choice(mut self, v: FreeRectChoice) -> Self {
        self.cfg.waste_choice = v;
        self
    }
    pub fn waste_split(mut self, v: SplitRule) -> Self {
        self.cfg.waste_split = v;
        self
    }
    pub fn merge_waste(mut self, v: bool) -> Self {
        self.cfg.merge_waste = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}

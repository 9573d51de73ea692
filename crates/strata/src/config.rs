//! Configuration types for Strata diagram synthesis.
//!
//! All types implement [`serde::Deserialize`] and fall back to defaults for
//! any missing field, so a configuration file only needs the values it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and sizing settings.
//! - [`LayoutConfig`] - Layout algorithm, direction and per-scope spacing profiles.
//! - [`SizingConfig`] - Constants that turn node text content into node sizes.
//!
//! # Example
//!
//! ```
//! # use strata::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.validate().is_ok());
//! assert!(config.layout().project().node_spacing() > config.layout().file().node_spacing());
//! ```

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use strata_core::diagram::LayoutDirection;

use crate::{error::ConfigError, scope::ScopeMode};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Node sizing configuration section.
    #[serde(default)]
    sizing: SizingConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and sizing configurations.
    pub fn new(layout: LayoutConfig, sizing: SizingConfig) -> Self {
        Self { layout, sizing }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the sizing configuration.
    pub fn sizing(&self) -> &SizingConfig {
        &self.sizing
    }

    /// Checks every numeric setting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for negative, non-finite or zero values where
    /// they are not meaningful, and when the project spacing profile is
    /// tighter than the file one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        self.sizing.validate()
    }
}

/// Available layout algorithms.
///
/// The names match external configuration strings (snake_case).
///
/// # Variants
///
/// - `Layered` - Built-in longest-path layered layout (default)
/// - `Sugiyama` - Layered layout computed by the `rust-sugiyama` crate
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutAlgorithm {
    /// Built-in layered layout (default)
    #[default]
    Layered,
    /// `rust-sugiyama` layout
    Sugiyama,
}

impl FromStr for LayoutAlgorithm {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "layered" => Ok(Self::Layered),
            "sugiyama" => Ok(Self::Sugiyama),
            _ => Err("Unsupported layout algorithm"),
        }
    }
}

impl From<LayoutAlgorithm> for &'static str {
    fn from(val: LayoutAlgorithm) -> Self {
        match val {
            LayoutAlgorithm::Layered => "layered",
            LayoutAlgorithm::Sugiyama => "sugiyama",
        }
    }
}

impl Display for LayoutAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Distances between neighbouring nodes of a rank and between consecutive ranks.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SpacingProfile {
    node_spacing: f32,
    rank_spacing: f32,
}

impl SpacingProfile {
    pub fn new(node_spacing: f32, rank_spacing: f32) -> Self {
        Self {
            node_spacing,
            rank_spacing,
        }
    }

    /// Gap between two nodes sharing a rank.
    pub fn node_spacing(&self) -> f32 {
        self.node_spacing
    }

    /// Gap between two consecutive ranks.
    pub fn rank_spacing(&self) -> f32 {
        self.rank_spacing
    }
}

/// Layout settings.
///
/// The `file` and `project` spacing profiles are selected by the scope mode of
/// each regeneration; project diagrams are spread wider.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    algorithm: LayoutAlgorithm,
    direction: LayoutDirection,
    file: SpacingProfile,
    project: SpacingProfile,
    /// Gap between cells of the fallback grid.
    grid_spacing: f32,
    /// Upper bound on barycenter sweeps during crossing reduction.
    ordering_passes: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            algorithm: LayoutAlgorithm::default(),
            direction: LayoutDirection::default(),
            file: SpacingProfile::new(50.0, 80.0),
            project: SpacingProfile::new(100.0, 140.0),
            grid_spacing: 40.0,
            ordering_passes: 4,
        }
    }
}

impl LayoutConfig {
    pub fn with_algorithm(mut self, algorithm: LayoutAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_spacing(mut self, file: SpacingProfile, project: SpacingProfile) -> Self {
        self.file = file;
        self.project = project;
        self
    }

    pub fn algorithm(&self) -> LayoutAlgorithm {
        self.algorithm
    }

    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }

    /// Spacing used for File-view diagrams.
    pub fn file(&self) -> SpacingProfile {
        self.file
    }

    /// Spacing used for Project-view diagrams.
    pub fn project(&self) -> SpacingProfile {
        self.project
    }

    /// Returns the spacing profile for a scope mode.
    pub fn spacing(&self, mode: ScopeMode) -> SpacingProfile {
        match mode {
            ScopeMode::File => self.file,
            ScopeMode::Project => self.project,
        }
    }

    pub fn grid_spacing(&self) -> f32 {
        self.grid_spacing
    }

    pub fn ordering_passes(&self) -> usize {
        self.ordering_passes
    }

    fn validate(&self) -> Result<(), ConfigError> {
        non_negative("layout.file.node_spacing", self.file.node_spacing)?;
        non_negative("layout.file.rank_spacing", self.file.rank_spacing)?;
        non_negative("layout.project.node_spacing", self.project.node_spacing)?;
        non_negative("layout.project.rank_spacing", self.project.rank_spacing)?;
        non_negative("layout.grid_spacing", self.grid_spacing)?;

        if self.project.node_spacing < self.file.node_spacing {
            return Err(ConfigError::ProfileOrder {
                field: "node_spacing",
                file: self.file.node_spacing,
                project: self.project.node_spacing,
            });
        }
        if self.project.rank_spacing < self.file.rank_spacing {
            return Err(ConfigError::ProfileOrder {
                field: "rank_spacing",
                file: self.file.rank_spacing,
                project: self.project.rank_spacing,
            });
        }
        Ok(())
    }
}

/// Constants turning the text content of a node into its size.
///
/// Sizes are estimated from character counts instead of measured glyphs, so
/// they are reproducible without a rendering surface.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SizingConfig {
    min_width: f32,
    min_height: f32,
    /// Estimated width of one character.
    char_width: f32,
    /// Total horizontal padding added to the longest line.
    horizontal_padding: f32,
    /// Height of the name compartment.
    header_height: f32,
    /// Height of one member line.
    member_height: f32,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            min_width: 160.0,
            min_height: 60.0,
            char_width: 7.5,
            horizontal_padding: 32.0,
            header_height: 44.0,
            member_height: 20.0,
        }
    }
}

impl SizingConfig {
    pub fn min_width(&self) -> f32 {
        self.min_width
    }

    pub fn min_height(&self) -> f32 {
        self.min_height
    }

    pub fn char_width(&self) -> f32 {
        self.char_width
    }

    pub fn horizontal_padding(&self) -> f32 {
        self.horizontal_padding
    }

    pub fn header_height(&self) -> f32 {
        self.header_height
    }

    pub fn member_height(&self) -> f32 {
        self.member_height
    }

    fn validate(&self) -> Result<(), ConfigError> {
        non_negative("sizing.min_width", self.min_width)?;
        non_negative("sizing.min_height", self.min_height)?;
        non_negative("sizing.horizontal_padding", self.horizontal_padding)?;
        non_negative("sizing.header_height", self.header_height)?;
        non_negative("sizing.member_height", self.member_height)?;
        if !self.char_width.is_finite() || self.char_width <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "sizing.char_width",
                value: self.char_width,
            });
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeOrNonFinite { field, value })
    }
}

//! Domino - pip counting for photographed domino tiles.
//!
//! This library locates an upright domino tile in an 8-bit raster, finds the
//! dividing bar and counts the pips in each half:
//! - Tile gating by aspect ratio, occupancy and size
//! - Divider row search from row intensity profiles
//! - Connected-component labeling and circle validation of pips
//! - Circle Hough transform as an alternative detector
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use domino::{Channels, PipCounter, Raster};
//!
//! let raster = Raster::new(width, height, Channels::Rgb, pixels)?;
//! let detection = PipCounter::new().detect(&raster);
//!
//! let (upper, lower) = detection.result.as_pair();
//! println!("{upper}-{lower}");
//! ```

pub mod circle;
pub mod component;
pub mod config;
pub mod divider;
pub mod fill;
pub(crate) mod grid;
pub mod hough;
pub mod labeling;
pub mod pip_counter;
pub mod raster;
pub mod tile_shape;

#[cfg(test)]
pub mod testing;

// ============================================================================
// Core image types
// ============================================================================

pub use grid::Grid;
pub use raster::{
    BinaryMask, Channels, FOREGROUND, GrayImage, Raster, RasterError, dark_mask,
    global_threshold, grayscale,
};

// ============================================================================
// Configuration
// ============================================================================

pub use config::{
    CircleConfig, Config, ConfigError, DividerConfig, RadiusBounds, SizeTier, TileShapeConfig,
};

// ============================================================================
// Pipeline stages
// ============================================================================

pub use circle::{CircleRejection, CircleValidator};
pub use component::{BoundingBox, ComponentStats};
pub use divider::{DividerLine, DividerRule, locate_divider};
pub use fill::scanline_fill;
pub use hough::{HoughCircle, detect_circles_hough};
pub use labeling::{Connectivity, LabelMap};
pub use tile_shape::{TileCandidate, find_tile};

// ============================================================================
// Pip counting
// ============================================================================

pub use pip_counter::{Diagnostics, Half, Pip, PipCounter, PipDetection, PipResult, count_pips};

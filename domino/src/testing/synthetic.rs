//! Synthetic rasters for tests and benchmarks.
//!
//! Drawing helpers paint into a [`GrayImage`] in place. Coordinates are
//! inclusive pixel bounds and are clipped to the image.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::grid::Grid;
use crate::raster::{BinaryMask, Channels, FOREGROUND, GrayImage, Raster};

pub const WHITE: u8 = 255;
pub const BLACK: u8 = 0;

/// Create a uniform image filled with a single value.
pub fn canvas(width: usize, height: usize, value: u8) -> GrayImage {
    Grid::filled(width, height, value)
}

/// Fill every pixel with `(x - cx)² + (y - cy)² <= r²`.
pub fn fill_disk(image: &mut GrayImage, cx: usize, cy: usize, radius: usize, value: u8) {
    let r2 = (radius * radius) as i64;
    let x_end = (cx + radius).min(image.width() - 1);
    let y_end = (cy + radius).min(image.height() - 1);
    for y in cy.saturating_sub(radius)..=y_end {
        for x in cx.saturating_sub(radius)..=x_end {
            let dx = x as i64 - cx as i64;
            let dy = y as i64 - cy as i64;
            if dx * dx + dy * dy <= r2 {
                image[(x, y)] = value;
            }
        }
    }
}

/// Fill the rectangle `[x0, x1] × [y0, y1]`.
pub fn fill_rect(image: &mut GrayImage, x0: usize, y0: usize, x1: usize, y1: usize, value: u8) {
    let x1 = x1.min(image.width() - 1);
    let y1 = y1.min(image.height() - 1);
    for y in y0..=y1 {
        for x in x0..=x1 {
            image[(x, y)] = value;
        }
    }
}

/// Draw a rectangle outline whose outer edge is `[x0, x1] × [y0, y1]`.
pub fn draw_rect_outline(
    image: &mut GrayImage,
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
    thickness: usize,
    value: u8,
) {
    let t = thickness.max(1) - 1;
    fill_rect(image, x0, y0, x1, y0 + t, value);
    fill_rect(image, x0, y1 - t, x1, y1, value);
    fill_rect(image, x0, y0, x0 + t, y1, value);
    fill_rect(image, x1 - t, y0, x1, y1, value);
}

/// Mask from ASCII art: `#` is foreground, anything else background.
pub fn mask_from_ascii(rows: &[&str]) -> BinaryMask {
    let height = rows.len();
    let width = rows.first().map_or(0, |r| r.len());
    let cells = rows
        .iter()
        .flat_map(|row| {
            assert_eq!(row.len(), width, "ragged ASCII mask");
            row.bytes().map(|b| if b == b'#' { FOREGROUND } else { 0 })
        })
        .collect();
    Grid::from_vec(width, height, cells)
}

/// Random mask with each pixel foreground with probability `density`.
pub fn random_mask(width: usize, height: usize, density: f64, seed: u64) -> BinaryMask {
    let mut rng = StdRng::seed_from_u64(seed);
    let cells = (0..width * height)
        .map(|_| {
            if rng.random_bool(density) {
                FOREGROUND
            } else {
                0
            }
        })
        .collect();
    Grid::from_vec(width, height, cells)
}

/// Replicate a gray image into an RGB raster.
pub fn to_rgb(gray: &GrayImage) -> Raster {
    let data = gray.cells().iter().flat_map(|&v| [v, v, v]).collect();
    Raster::new(gray.width(), gray.height(), Channels::Rgb, data).unwrap()
}

pub fn to_raster(gray: GrayImage) -> Raster {
    Raster::from_gray(gray).unwrap()
}

// ============================================================================
// Domino scenes
// ============================================================================

/// Upright domino tile on a light background.
///
/// Geometry (100×200 canvas): outline `[5, 94] × [5, 194]` four pixels thick,
/// divider bar on rows 99..=101 spanning the tile, pips of radius 8.
#[derive(Debug, Clone)]
pub struct DominoScene {
    pub width: usize,
    pub height: usize,
    pub background: u8,
    pub ink: u8,
    pub outline: bool,
    pub divider: bool,
    pub pip_radius: usize,
    pub pips: Vec<(usize, usize)>,
}

pub const SCENE_DIVIDER_ROW: usize = 99;

/// Pip centers for one half, top half when `upper`.
pub fn half_layout(value: usize, upper: bool) -> Vec<(usize, usize)> {
    let (left, mid, right) = (28, 50, 72);
    let offset = if upper { 0 } else { 100 };
    let (top, center, bottom) = (25 + offset, 50 + offset, 75 + offset);
    match value {
        0 => vec![],
        1 => vec![(mid, center)],
        2 => vec![(left, top), (right, bottom)],
        3 => vec![(left, top), (mid, center), (right, bottom)],
        4 => vec![(left, top), (right, top), (left, bottom), (right, bottom)],
        5 => vec![
            (left, top),
            (right, top),
            (mid, center),
            (left, bottom),
            (right, bottom),
        ],
        6 => vec![
            (left, top),
            (right, top),
            (left, center),
            (right, center),
            (left, bottom),
            (right, bottom),
        ],
        other => panic!("no layout for {other} pips"),
    }
}

impl DominoScene {
    /// Standard tile showing `upper` and `lower` pips.
    pub fn tile(upper: usize, lower: usize) -> Self {
        let mut pips = half_layout(upper, true);
        pips.extend(half_layout(lower, false));
        Self {
            width: 100,
            height: 200,
            background: WHITE,
            ink: BLACK,
            outline: true,
            divider: true,
            pip_radius: 8,
            pips,
        }
    }

    pub fn render(&self) -> GrayImage {
        let mut image = canvas(self.width, self.height, self.background);
        if self.outline {
            draw_rect_outline(&mut image, 5, 5, 94, 194, 4, self.ink);
        }
        if self.divider {
            fill_rect(
                &mut image,
                5,
                SCENE_DIVIDER_ROW,
                94,
                SCENE_DIVIDER_ROW + 2,
                self.ink,
            );
        }
        for &(x, y) in &self.pips {
            fill_disk(&mut image, x, y, self.pip_radius, self.ink);
        }
        image
    }

    pub fn raster(&self) -> Raster {
        to_raster(self.render())
    }
}

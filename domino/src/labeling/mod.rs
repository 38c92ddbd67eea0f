//! Connected component labeling by breadth-first flood.
//!
//! Labels are dense integers starting at 1, assigned in raster-scan order of
//! each component's first pixel. Background stays 0.

#[cfg(test)]
mod tests;

use std::collections::VecDeque;

use glam::UVec2;

use crate::grid::Grid;
use crate::raster::BinaryMask;

const FOUR_NEIGHBORS: [(isize, isize); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

const EIGHT_NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Pixel connectivity for connected component labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// Only horizontal and vertical neighbors are connected.
    Four,
    /// Diagonal neighbors are connected too.
    #[default]
    Eight,
}

impl Connectivity {
    #[inline]
    fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Connectivity::Four => &FOUR_NEIGHBORS,
            Connectivity::Eight => &EIGHT_NEIGHBORS,
        }
    }
}

/// A 2D label map from connected component analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    labels: Grid<u32>,
    num_labels: usize,
}

impl LabelMap {
    /// Label every maximal connected group of foreground pixels.
    ///
    /// Each pixel is enqueued at most once: it is labeled at enqueue time and
    /// only unlabeled foreground neighbors are pushed.
    pub fn from_mask(mask: &BinaryMask, connectivity: Connectivity) -> Self {
        let width = mask.width();
        let height = mask.height();
        let offsets = connectivity.offsets();

        let mut labels = Grid::filled(width, height, 0u32);
        let mut next_label = 0u32;
        let mut frontier = VecDeque::new();

        for y in 0..height {
            for x in 0..width {
                if mask[(x, y)] == 0 || labels[(x, y)] != 0 {
                    continue;
                }

                next_label += 1;
                labels[(x, y)] = next_label;
                frontier.push_back((x, y));

                while let Some((px, py)) = frontier.pop_front() {
                    for &(dx, dy) in offsets {
                        let Some(nx) = px.checked_add_signed(dx).filter(|&nx| nx < width) else {
                            continue;
                        };
                        let Some(ny) = py.checked_add_signed(dy).filter(|&ny| ny < height) else {
                            continue;
                        };
                        if mask[(nx, ny)] != 0 && labels[(nx, ny)] == 0 {
                            labels[(nx, ny)] = next_label;
                            frontier.push_back((nx, ny));
                        }
                    }
                }
            }
        }

        Self {
            labels,
            num_labels: next_label as usize,
        }
    }

    /// Number of connected components (excluding background).
    #[inline]
    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.labels.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.labels.height()
    }

    /// Raw labels, row-major.
    #[inline]
    pub fn labels(&self) -> &[u32] {
        self.labels.cells()
    }

    /// Member pixels of every component, indexed by `label - 1`.
    ///
    /// Pixels of each component are listed in raster-scan order.
    pub fn component_pixels(&self) -> Vec<Vec<UVec2>> {
        let mut components = vec![Vec::new(); self.num_labels];
        for (y, row) in self.labels.rows().enumerate() {
            for (x, &label) in row.iter().enumerate() {
                if label != 0 {
                    components[label as usize - 1].push(UVec2::new(x as u32, y as u32));
                }
            }
        }
        components
    }
}

impl std::ops::Index<(usize, usize)> for LabelMap {
    type Output = u32;

    #[inline]
    fn index(&self, xy: (usize, usize)) -> &Self::Output {
        &self.labels[xy]
    }
}

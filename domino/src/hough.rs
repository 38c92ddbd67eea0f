//! Circle Hough transform.
//!
//! Every foreground pixel votes, for each candidate radius, for 16 centers
//! spaced evenly on the circle of that radius around it. Votes accumulate in
//! a sparse map keyed by `(center_x, center_y, radius)`. Entries at or above
//! the vote threshold are ranked by votes and near duplicates are dropped.
//!
//! Not part of the default pip counting path.

use glam::UVec2;
use hashbrown::HashMap;
use rayon::prelude::*;

use crate::raster::BinaryMask;

/// Number of sampled angles per radius, `0` and `2π` both included.
pub const ANGLE_STEPS: usize = 16;

/// Foreground pixels per rayon work unit.
const PIXELS_PER_CHUNK: usize = 256;

/// A detected circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoughCircle {
    pub center: UVec2,
    pub radius: u32,
    pub votes: u32,
}

/// Accumulator cell: vote count and the sequence number of the first vote,
/// which orders equal-vote candidates like a sequential scan would.
#[derive(Debug, Clone, Copy)]
struct Cell {
    votes: u32,
    first_vote: u64,
}

type Accumulator = HashMap<(u32, u32, u32), Cell>;

/// `ANGLE_STEPS` angles from 0 to 2π inclusive, as `(cos, sin)` pairs.
fn angle_table() -> [(f64, f64); ANGLE_STEPS] {
    let step = std::f64::consts::TAU / (ANGLE_STEPS - 1) as f64;
    std::array::from_fn(|k| {
        let theta = if k == ANGLE_STEPS - 1 {
            std::f64::consts::TAU
        } else {
            k as f64 * step
        };
        (theta.cos(), theta.sin())
    })
}

/// Accumulator cells touched per foreground pixel, in `u64` so the full
/// `u32` radius range cannot overflow.
fn votes_per_pixel(radius_min: u32, radius_max: u32) -> u64 {
    (u64::from(radius_max - radius_min) + 1) * ANGLE_STEPS as u64
}

fn merge(mut into: Accumulator, from: Accumulator) -> Accumulator {
    if into.len() < from.len() {
        return merge(from, into);
    }
    for (key, cell) in from {
        into.entry(key)
            .and_modify(|c| {
                c.votes += cell.votes;
                c.first_vote = c.first_vote.min(cell.first_vote);
            })
            .or_insert(cell);
    }
    into
}

/// Detect circles with radius in `[radius_min, radius_max]` receiving at
/// least `vote_threshold` votes.
///
/// Candidate centers are `trunc(x - r·cos θ)`, `trunc(y - r·sin θ)`,
/// truncated toward zero; centers outside the mask are discarded. Results
/// are sorted by descending votes, and a candidate is dropped when its
/// center lies within half its radius of an already kept circle.
pub fn detect_circles_hough(
    mask: &BinaryMask,
    radius_min: u32,
    radius_max: u32,
    vote_threshold: u32,
) -> Vec<HoughCircle> {
    let (width, height) = (mask.width() as i64, mask.height() as i64);
    if radius_min > radius_max {
        return Vec::new();
    }

    let edges: Vec<(u32, u32)> = mask
        .rows()
        .enumerate()
        .flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &v)| v != 0)
                .map(move |(x, _)| (x as u32, y as u32))
        })
        .collect();
    if edges.is_empty() {
        return Vec::new();
    }

    let angles = angle_table();
    let seq_stride = votes_per_pixel(radius_min, radius_max);

    let accumulator = edges
        .par_chunks(PIXELS_PER_CHUNK)
        .enumerate()
        .fold(Accumulator::new, |mut acc, (chunk_idx, chunk)| {
            for (offset, &(x, y)) in chunk.iter().enumerate() {
                let pixel_idx = (chunk_idx * PIXELS_PER_CHUNK + offset) as u64;
                for r in radius_min..=radius_max {
                    let rf = f64::from(r);
                    for (k, &(cos, sin)) in angles.iter().enumerate() {
                        let a = (f64::from(x) - rf * cos) as i64;
                        let b = (f64::from(y) - rf * sin) as i64;
                        if a < 0 || a >= width || b < 0 || b >= height {
                            continue;
                        }
                        let seq = pixel_idx * seq_stride
                            + u64::from(r - radius_min) * ANGLE_STEPS as u64
                            + k as u64;
                        acc.entry((a as u32, b as u32, r))
                            .and_modify(|c| c.votes += 1)
                            .or_insert(Cell {
                                votes: 1,
                                first_vote: seq,
                            });
                    }
                }
            }
            acc
        })
        .reduce(Accumulator::new, merge);

    let mut ranked: Vec<(HoughCircle, u64)> = accumulator
        .into_iter()
        .filter(|(_, cell)| cell.votes >= vote_threshold)
        .map(|((a, b, r), cell)| {
            (
                HoughCircle {
                    center: UVec2::new(a, b),
                    radius: r,
                    votes: cell.votes,
                },
                cell.first_vote,
            )
        })
        .collect();
    ranked.sort_unstable_by(|(ca, fa), (cb, fb)| cb.votes.cmp(&ca.votes).then(fa.cmp(fb)));

    let mut kept: Vec<HoughCircle> = Vec::new();
    for (candidate, _) in ranked {
        let min_distance = f64::from(candidate.radius) * 0.5;
        let duplicate = kept
            .iter()
            .any(|k| candidate.center.as_dvec2().distance(k.center.as_dvec2()) < min_distance);
        if !duplicate {
            kept.push(candidate);
        }
    }

    tracing::debug!(
        "Hough: {} edge pixels, {} circles kept (r {}..={}, threshold {})",
        edges.len(),
        kept.len(),
        radius_min,
        radius_max,
        vote_threshold
    );
    kept
}

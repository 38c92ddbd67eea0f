//! Scanline region fill.
//!
//! Fills the 4-connected region of equal-valued pixels around a seed, one
//! horizontal run at a time, with an explicit stack of run seeds.

use crate::raster::BinaryMask;

/// Return a copy of `mask` with the seed's region set to `value`.
///
/// The region is every pixel reachable from `seed` through horizontal and
/// vertical steps over pixels holding the seed's original value. A seed
/// outside the mask, or one already holding `value`, leaves the copy
/// unchanged.
pub fn scanline_fill(mask: &BinaryMask, seed: (usize, usize), value: u8) -> BinaryMask {
    let mut filled = mask.clone();
    let (width, height) = (mask.width(), mask.height());
    let (seed_x, seed_y) = seed;

    if seed_x >= width || seed_y >= height {
        return filled;
    }

    let original = filled[seed];
    if original == value {
        return filled;
    }

    let mut stack = vec![seed];

    while let Some((x, y)) = stack.pop() {
        // Pushed seeds may have been filled by an earlier run.
        if filled[(x, y)] != original {
            continue;
        }

        let row = filled.row_mut(y);
        let mut left = x;
        while left > 0 && row[left - 1] == original {
            left -= 1;
        }
        let mut right = x;
        while right + 1 < width && row[right + 1] == original {
            right += 1;
        }
        row[left..=right].fill(value);

        for ny in [y.checked_sub(1), Some(y + 1).filter(|&ny| ny < height)]
            .into_iter()
            .flatten()
        {
            let row = filled.row(ny);
            let mut i = left;
            while i <= right {
                if row[i] == original {
                    stack.push((i, ny));
                    while i <= right && row[i] == original {
                        i += 1;
                    }
                } else {
                    i += 1;
                }
            }
        }
    }

    filled
}

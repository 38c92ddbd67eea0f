//! Tests for connected component labeling.

use std::collections::BTreeSet;

use super::*;
use crate::testing::synthetic::{mask_from_ascii, random_mask};

#[test]
fn empty_mask() {
    let mask = mask_from_ascii(&["....", "....", "...."]);
    let label_map = LabelMap::from_mask(&mask, Connectivity::Eight);

    assert_eq!(label_map.num_labels(), 0);
    assert!(label_map.labels().iter().all(|&l| l == 0));
    assert!(label_map.component_pixels().is_empty());
}

#[test]
fn single_pixel() {
    let mask = mask_from_ascii(&["....", ".#..", "...."]);
    let label_map = LabelMap::from_mask(&mask, Connectivity::Eight);

    assert_eq!(label_map.num_labels(), 1);
    assert_eq!(label_map[(1, 1)], 1);
    assert_eq!(label_map.labels().iter().filter(|&&l| l == 1).count(), 1);
}

#[test]
fn diagonal_pixels_join_with_eight_connectivity() {
    // #...
    // .#..
    // ..#.
    let mask = mask_from_ascii(&["#...", ".#..", "..#."]);

    let eight = LabelMap::from_mask(&mask, Connectivity::Eight);
    assert_eq!(eight.num_labels(), 1);
    assert_eq!(eight[(0, 0)], eight[(2, 2)]);

    let four = LabelMap::from_mask(&mask, Connectivity::Four);
    assert_eq!(four.num_labels(), 3);
}

#[test]
fn labels_follow_raster_order_of_first_pixel() {
    // #..#
    // #..#
    // ....
    // .##.
    let mask = mask_from_ascii(&["#..#", "#..#", "....", ".##."]);
    let label_map = LabelMap::from_mask(&mask, Connectivity::Eight);

    assert_eq!(label_map.num_labels(), 3);
    assert_eq!(label_map[(0, 0)], 1);
    assert_eq!(label_map[(3, 0)], 2);
    assert_eq!(label_map[(1, 3)], 3);
}

#[test]
fn u_shape_gets_single_label() {
    // Both arms are discovered on row 0 but connect through the bottom.
    // #...#
    // #...#
    // #####
    let mask = mask_from_ascii(&["#...#", "#...#", "#####"]);
    let label_map = LabelMap::from_mask(&mask, Connectivity::Four);

    assert_eq!(label_map.num_labels(), 1);
    assert_eq!(label_map[(0, 0)], label_map[(4, 0)]);
}

#[test]
fn spiral_is_one_component() {
    let mask = mask_from_ascii(&[
        "#######", //
        "......#", //
        "#####.#", //
        "#...#.#", //
        "#.###.#", //
        "#.....#", //
        "#######",
    ]);
    let label_map = LabelMap::from_mask(&mask, Connectivity::Four);
    assert_eq!(label_map.num_labels(), 1);
}

#[test]
fn nonzero_values_other_than_255_are_foreground() {
    let mut mask = mask_from_ascii(&["...", "...", "..."]);
    mask[(1, 1)] = 1;
    mask[(2, 2)] = 17;
    let label_map = LabelMap::from_mask(&mask, Connectivity::Eight);
    assert_eq!(label_map.num_labels(), 1);
}

#[test]
fn component_pixels_match_label_counts() {
    let mask = mask_from_ascii(&["##..#", "#...#", "....#", "##..."]);
    let label_map = LabelMap::from_mask(&mask, Connectivity::Eight);
    let components = label_map.component_pixels();

    assert_eq!(components.len(), label_map.num_labels());
    for (idx, pixels) in components.iter().enumerate() {
        let label = idx as u32 + 1;
        let count = label_map.labels().iter().filter(|&&l| l == label).count();
        assert_eq!(pixels.len(), count);
        for p in pixels {
            assert_eq!(label_map[(p.x as usize, p.y as usize)], label);
        }
    }
    assert_eq!(components[0], vec![UVec2::new(0, 0), UVec2::new(1, 0), UVec2::new(0, 1)]);
}

#[test]
fn random_masks_have_dense_labels() {
    for seed in 0..8 {
        let mask = random_mask(64, 48, 0.45, seed);
        let label_map = LabelMap::from_mask(&mask, Connectivity::Eight);

        let distinct: BTreeSet<u32> = label_map.labels().iter().copied().filter(|&l| l != 0).collect();
        let expected: BTreeSet<u32> = (1..=label_map.num_labels() as u32).collect();
        assert_eq!(distinct, expected, "seed {seed}");

        for (label, &m) in label_map.labels().iter().zip(mask.cells()) {
            assert_eq!(*label == 0, m == 0, "seed {seed}");
        }
    }
}

#[test]
fn labeling_is_deterministic() {
    let mask = random_mask(80, 80, 0.5, 42);
    let a = LabelMap::from_mask(&mask, Connectivity::Eight);
    let b = LabelMap::from_mask(&mask, Connectivity::Eight);
    assert_eq!(a, b);
}

#[test]
fn eight_connected_neighbors_share_label_in_random_masks() {
    let mask = random_mask(50, 50, 0.4, 7);
    let label_map = LabelMap::from_mask(&mask, Connectivity::Eight);
    let (w, h) = (mask.width(), mask.height());

    for y in 0..h {
        for x in 0..w {
            if mask[(x, y)] == 0 {
                continue;
            }
            for &(dx, dy) in &EIGHT_NEIGHBORS {
                let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
                else {
                    continue;
                };
                if nx < w && ny < h && mask[(nx, ny)] != 0 {
                    assert_eq!(label_map[(x, y)], label_map[(nx, ny)]);
                }
            }
        }
    }
}

#[test]
fn full_mask_is_one_component() {
    let mask = random_mask(30, 20, 1.0, 0);
    let label_map = LabelMap::from_mask(&mask, Connectivity::Four);
    assert_eq!(label_map.num_labels(), 1);
    assert!(label_map.labels().iter().all(|&l| l == 1));
}

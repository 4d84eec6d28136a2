//! Connected-component labeling of cell masks

use ndarray::Array2;
use pelagis_core::raster::{Neighborhood, Raster};
use pelagis_core::{Error, Result};
use std::collections::VecDeque;

/// Label connected components of a mask raster.
///
/// Nonzero mask cells are foreground. Each maximal group of foreground
/// cells connected under `neighborhood` receives a unique positive label,
/// assigned in row-major discovery order; background cells are labeled 0.
///
/// Use `Neighborhood::Queen3x3` for 8-connectivity (edge and corner
/// neighbors join a component) or `Neighborhood::Rook3x3` for
/// 4-connectivity.
///
/// # Arguments
/// * `mask` - Mask raster, nonzero = foreground
/// * `neighborhood` - Connectivity structure
///
/// # Returns
/// Label raster of identical shape plus the number of components found
pub fn label_components(
    mask: &Raster<u8>,
    neighborhood: Neighborhood,
) -> Result<(Raster<i32>, usize)> {
    if mask.is_empty() {
        return Err(Error::InvalidDimensions {
            rows: mask.rows(),
            cols: mask.cols(),
        });
    }

    let (rows, cols) = mask.shape();
    let offsets = neighborhood.offsets_no_center();

    let mut labels = Array2::<i32>::zeros((rows, cols));
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
    let mut component_count: i32 = 0;

    for row in 0..rows {
        for col in 0..cols {
            if unsafe { mask.get_unchecked(row, col) } == 0 || labels[(row, col)] != 0 {
                continue;
            }

            // New component: flood it out from the seed cell
            component_count += 1;
            labels[(row, col)] = component_count;
            queue.push_back((row, col));

            while let Some((r, c)) = queue.pop_front() {
                for &(dr, dc) in &offsets {
                    let nr = r as isize + dr;
                    let nc = c as isize + dc;

                    if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
                        continue;
                    }

                    let nr = nr as usize;
                    let nc = nc as usize;

                    if labels[(nr, nc)] != 0 {
                        continue;
                    }
                    if unsafe { mask.get_unchecked(nr, nc) } == 0 {
                        continue;
                    }

                    labels[(nr, nc)] = component_count;
                    queue.push_back((nr, nc));
                }
            }
        }
    }

    let mut output = mask.with_same_meta::<i32>(rows, cols);
    output.set_nodata(Some(0));
    *output.data_mut() = labels;

    Ok((output, component_count as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from(rows: usize, cols: usize, foreground: &[(usize, usize)]) -> Raster<u8> {
        let mut m: Raster<u8> = Raster::new(rows, cols);
        for &(r, c) in foreground {
            m.set(r, c, 1).unwrap();
        }
        m
    }

    #[test]
    fn test_empty_mask_has_no_components() {
        let m = mask_from(4, 4, &[]);
        let (labels, n) = label_components(&m, Neighborhood::Queen3x3).unwrap();
        assert_eq!(n, 0);
        for row in 0..4 {
            for col in 0..4 {
                assert_eq!(labels.get(row, col).unwrap(), 0);
            }
        }
    }

    #[test]
    fn test_diagonal_cells_queen_vs_rook() {
        let m = mask_from(4, 4, &[(1, 1), (2, 2)]);

        let (labels, n) = label_components(&m, Neighborhood::Queen3x3).unwrap();
        assert_eq!(n, 1, "diagonal cells are 8-connected");
        assert_eq!(labels.get(1, 1).unwrap(), labels.get(2, 2).unwrap());

        let (_, n) = label_components(&m, Neighborhood::Rook3x3).unwrap();
        assert_eq!(n, 2, "diagonal cells are not 4-connected");
    }

    #[test]
    fn test_separated_groups_get_distinct_labels() {
        let m = mask_from(5, 5, &[(0, 0), (0, 1), (4, 4)]);
        let (labels, n) = label_components(&m, Neighborhood::Queen3x3).unwrap();

        assert_eq!(n, 2);
        let a = labels.get(0, 0).unwrap();
        assert_eq!(labels.get(0, 1).unwrap(), a);
        let b = labels.get(4, 4).unwrap();
        assert!(a > 0 && b > 0 && a != b);
    }

    #[test]
    fn test_background_stays_zero() {
        let m = mask_from(3, 3, &[(1, 1)]);
        let (labels, n) = label_components(&m, Neighborhood::Queen3x3).unwrap();

        assert_eq!(n, 1);
        assert_eq!(labels.get(1, 1).unwrap(), 1);
        assert_eq!(labels.get(0, 0).unwrap(), 0);
        assert_eq!(labels.nodata(), Some(0));
    }

    #[test]
    fn test_row_major_label_order() {
        let m = mask_from(3, 5, &[(0, 4), (2, 0)]);
        let (labels, n) = label_components(&m, Neighborhood::Queen3x3).unwrap();

        assert_eq!(n, 2);
        assert_eq!(labels.get(0, 4).unwrap(), 1);
        assert_eq!(labels.get(2, 0).unwrap(), 2);
    }

    #[test]
    fn test_empty_raster_is_an_error() {
        let m: Raster<u8> = Raster::new(0, 0);
        assert!(label_components(&m, Neighborhood::Queen3x3).is_err());
    }
}

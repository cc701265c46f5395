//! Binary morphology: disk structuring elements and dilation.

use crate::grid::Grid;

/// Offsets of a disk-shaped structuring element of the given radius.
///
/// A cell (dr, dc) belongs to the disk when `dr² + dc² ≤ r²`, which matches
/// the disk the upstream mapper inflates with. Radius 0 is the single
/// center cell.
pub fn disk(radius: usize) -> Vec<(i32, i32)> {
    let r = radius as i32;
    let r2 = r * r;
    let mut offsets = Vec::new();
    for dr in -r..=r {
        for dc in -r..=r {
            if dr * dr + dc * dc <= r2 {
                offsets.push((dr, dc));
            }
        }
    }
    offsets
}

/// Binary dilation of a grid by a disk of the given radius.
///
/// Every set cell stamps the disk around itself; cells outside the grid
/// are dropped. Pure function, the input is untouched.
pub fn dilate(grid: &Grid, radius: usize) -> Grid {
    let offsets = disk(radius);
    let mut out = Grid::new(grid.rows(), grid.cols());
    let rows = grid.rows() as i32;
    let cols = grid.cols() as i32;
    for r in 0..grid.rows() {
        for c in 0..grid.cols() {
            if grid.get(r, c) == 0.0 {
                continue;
            }
            for &(dr, dc) in &offsets {
                let nr = r as i32 + dr;
                let nc = c as i32 + dc;
                if nr >= 0 && nc >= 0 && nr < rows && nc < cols {
                    out.set(nr as usize, nc as usize, 1.0);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_radius_zero_is_center() {
        assert_eq!(disk(0), vec![(0, 0)]);
    }

    #[test]
    fn test_disk_radius_one_is_cross() {
        let d = disk(1);
        assert_eq!(d.len(), 5);
        assert!(d.contains(&(0, 0)));
        assert!(d.contains(&(-1, 0)));
        assert!(d.contains(&(0, 1)));
        // Corners are outside a radius-1 disk
        assert!(!d.contains(&(1, 1)));
    }

    #[test]
    fn test_dilate_single_cell() {
        let mut g = Grid::new(5, 5);
        g.set(2, 2, 1.0);
        let out = dilate(&g, 1);
        assert_eq!(out.count_nonzero(), 5);
        assert_eq!(out.get(2, 2), 1.0);
        assert_eq!(out.get(1, 2), 1.0);
        assert_eq!(out.get(3, 2), 1.0);
        assert_eq!(out.get(2, 1), 1.0);
        assert_eq!(out.get(2, 3), 1.0);
        assert_eq!(out.get(1, 1), 0.0);
    }

    #[test]
    fn test_dilate_clips_at_border() {
        let mut g = Grid::new(3, 3);
        g.set(0, 0, 1.0);
        let out = dilate(&g, 1);
        assert_eq!(out.count_nonzero(), 3);
    }

    #[test]
    fn test_dilate_empty_grid() {
        let g = Grid::new(4, 4);
        let out = dilate(&g, 2);
        assert!(out.is_all_zero());
    }

    #[test]
    fn test_dilate_preserves_input() {
        let mut g = Grid::new(5, 5);
        g.set(2, 2, 1.0);
        let _ = dilate(&g, 2);
        assert_eq!(g.count_nonzero(), 1);
    }
}

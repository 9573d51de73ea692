//! Row-major grid placement used when a layout engine fails.

use strata_core::geometry::{Point, Size};

/// Places nodes left to right, top to bottom, on a square-ish grid.
///
/// The grid has `ceil(sqrt(n))` columns and every cell is as large as the
/// largest usable node plus `spacing`. Returns top-left positions. Unusable
/// sizes (negative, NaN) count as zero so the grid itself stays finite.
pub(super) fn positions(sizes: &[Size], spacing: f32) -> Vec<Point> {
    if sizes.is_empty() {
        return Vec::new();
    }

    let spacing = if spacing.is_finite() && spacing >= 0.0 {
        spacing
    } else {
        0.0
    };
    let columns = (sizes.len() as f64).sqrt().ceil() as usize;
    let largest = sizes
        .iter()
        .filter(|size| size.is_valid())
        .fold(Size::default(), |acc, &size| acc.max(size));
    let cell_width = largest.width() + spacing;
    let cell_height = largest.height() + spacing;

    (0..sizes.len())
        .map(|i| {
            let (row, column) = (i / columns, i % columns);
            Point::new(column as f32 * cell_width, row as f32 * cell_height)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_empty() {
        assert!(positions(&[], 40.0).is_empty());
    }

    #[test]
    fn test_single_node_at_origin() {
        assert_eq!(positions(&[Size::new(10.0, 10.0)], 40.0), [Point::new(0.0, 0.0)]);
    }

    #[test]
    fn test_row_major_order() {
        let sizes = vec![Size::new(100.0, 60.0); 5];
        let grid = positions(&sizes, 40.0);

        // Three columns for five nodes.
        let expected = [(0.0, 0.0), (140.0, 0.0), (280.0, 0.0), (0.0, 100.0), (140.0, 100.0)];
        for (point, (x, y)) in grid.iter().zip(expected) {
            assert_approx_eq!(f32, point.x(), x);
            assert_approx_eq!(f32, point.y(), y);
        }
    }

    #[test]
    fn test_cell_fits_largest_node() {
        let sizes = [Size::new(50.0, 20.0), Size::new(200.0, 90.0), Size::new(10.0, 10.0)];
        let grid = positions(&sizes, 10.0);

        assert_approx_eq!(f32, grid[1].x(), 210.0);
        assert_approx_eq!(f32, grid[2].y(), 100.0);
    }

    #[test]
    fn test_degenerate_sizes_stay_finite() {
        let sizes = [Size::new(f32::NAN, 20.0), Size::new(-5.0, 10.0), Size::new(30.0, 30.0)];
        let grid = positions(&sizes, f32::INFINITY);
        assert!(grid.iter().all(|p| p.is_finite()));
    }
}

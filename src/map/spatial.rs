use std::collections::HashMap;

/// Spatial index for geographic features using conservative approximation.
/// Each feature's bounding box is indexed into every cell it overlaps,
/// guaranteeing no false negatives while allowing false positives
/// (eliminated by the exact point-in-ring test downstream).
pub struct FeatureGrid {
    cells: HashMap<(i32, i32), Vec<usize>>,
    cell_size: f64,
}

impl FeatureGrid {
    #[inline(always)]
    fn to_cell(&self, lon: f64, lat: f64) -> (i32, i32) {
        let x = (lon / self.cell_size).floor() as i32;
        let y = (lat / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Build from feature bounding boxes (conservative approximation:
    /// each feature inserted into every cell its bbox overlaps)
    pub fn build(bboxes: impl Iterator<Item = (f64, f64, f64, f64)>, cell_size: f64) -> Self {
        let mut grid = Self {
            cells: HashMap::new(),
            cell_size,
        };
        for (idx, (min_lon, min_lat, max_lon, max_lat)) in bboxes.enumerate() {
            let min_cell = grid.to_cell(min_lon, min_lat);
            let max_cell = grid.to_cell(max_lon, max_lat);
            for y in min_cell.1..=max_cell.1 {
                for x in min_cell.0..=max_cell.0 {
                    grid.cells.entry((x, y)).or_default().push(idx);
                }
            }
        }
        grid
    }

    /// Candidate feature indices for the cell containing a point.
    pub fn query_point(&self, lon: f64, lat: f64) -> &[usize] {
        self.cells
            .get(&self.to_cell(lon, lat))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_query_hits_overlapping_bbox() {
        let bboxes = vec![(0.0, 0.0, 10.0, 10.0), (20.0, 20.0, 30.0, 30.0)];
        let grid = FeatureGrid::build(bboxes.into_iter(), 5.0);

        assert_eq!(grid.query_point(5.0, 5.0), &[0]);
        assert_eq!(grid.query_point(25.0, 25.0), &[1]);
        assert!(grid.query_point(50.0, 50.0).is_empty());
    }

    #[test]
    fn test_shared_cell_lists_both() {
        let bboxes = vec![(0.0, 0.0, 4.0, 4.0), (1.0, 1.0, 3.0, 3.0)];
        let grid = FeatureGrid::build(bboxes.into_iter(), 10.0);
        assert_eq!(grid.query_point(2.0, 2.0), &[0, 1]);
    }
}

use std::collections::HashMap;

/// Spatial index over country bounding boxes using conservative
/// approximation. Each country is indexed into every cell its bbox overlaps,
/// guaranteeing no false negatives while allowing false positives
/// (eliminated by the exact point-in-polygon test in the renderer).
pub struct CountryIndex {
    cells: HashMap<(i32, i32), Vec<usize>>,
    cell_size: f64,
}

impl CountryIndex {
    #[inline(always)]
    fn to_cell(&self, lon: f64, lat: f64) -> (i32, i32) {
        let x = (lon / self.cell_size).floor() as i32;
        let y = (lat / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Build from country bounding boxes (min_lon, min_lat, max_lon, max_lat)
    /// with the given cell size in degrees.
    pub fn build(bboxes: impl Iterator<Item = (f64, f64, f64, f64)>, cell_size: f64) -> Self {
        let mut index = Self { cells: HashMap::new(), cell_size };
        for (idx, (min_lon, min_lat, max_lon, max_lat)) in bboxes.enumerate() {
            let min_cell = index.to_cell(min_lon, min_lat);
            let max_cell = index.to_cell(max_lon, max_lat);
            for y in min_cell.1..=max_cell.1 {
                for x in min_cell.0..=max_cell.0 {
                    index.cells.entry((x, y)).or_default().push(idx);
                }
            }
        }
        index
    }

    /// Country indices whose bbox cell contains the point. May include
    /// false positives; never misses a country covering the point.
    pub fn candidates(&self, lon: f64, lat: f64) -> &[usize] {
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
    fn test_candidates_cover_bbox() {
        let bboxes = vec![(0.0, 0.0, 10.0, 10.0), (40.0, 40.0, 50.0, 50.0)];
        let index = CountryIndex::build(bboxes.into_iter(), 5.0);

        assert_eq!(index.candidates(5.0, 5.0), &[0]);
        assert_eq!(index.candidates(45.0, 45.0), &[1]);
        assert!(index.candidates(-30.0, -30.0).is_empty());
    }

    #[test]
    fn test_overlapping_bboxes_share_cells() {
        let bboxes = vec![(0.0, 0.0, 10.0, 10.0), (5.0, 5.0, 15.0, 15.0)];
        let index = CountryIndex::build(bboxes.into_iter(), 5.0);
        let hits = index.candidates(7.0, 7.0);
        assert!(hits.contains(&0) && hits.contains(&1));
    }

    #[test]
    fn test_negative_coordinates() {
        let bboxes = vec![(-80.0, -56.0, -66.0, -17.0)];
        let index = CountryIndex::build(bboxes.into_iter(), 5.0);
        assert_eq!(index.candidates(-70.0, -30.0), &[0]);
    }
}

use crate::bounds::{BoundingBox, Point};
use crate::tessellation::SpatialAlgorithm;

/// A spatial index based on a uniform grid.
///
/// This structure divides space into a fixed number of bins (voxels). It is fast for roughly
/// uniform particle distributions, but may be less memory efficient for highly clustered
/// data. Points outside the grid bounds are clamped into the border bins.
pub struct AlgorithmGrid {
    /// Number of bins along each axis.
    pub resolution: [usize; 3],
    /// Scale factor from coordinate to bin index, per axis.
    pub scale: [f64; 3],
    /// Maximum valid (fractional) bin index, per axis.
    pub limit: [f64; 3],
    /// Minimum corner of the grid bounds.
    pub min: Point,
    /// The grid bins, each containing a list of generator indices.
    pub bins: Vec<Vec<usize>>,
    /// Map from generator index to its bin index.
    pub generator_bin_ids: Vec<usize>,
    /// Precomputed search order for visiting neighboring bins.
    pub bin_search_order: Vec<([isize; 3], f64)>,
}

impl AlgorithmGrid {
    /// Creates a new `AlgorithmGrid` with the specified resolution over `bounds`.
    pub fn new(nx: usize, ny: usize, nz: usize, bounds: &BoundingBox) -> Self {
        let resolution = [nx.max(1), ny.max(1), nz.max(1)];
        let scale: [f64; 3] = [0usize, 1, 2].map(|axis| resolution[axis] as f64 / (bounds.max[axis] - bounds.min[axis]));
        let bin_size = scale.map(|s| 1.0 / s);

        let r = resolution.map(|n| n as isize);
        let mut bin_search_order = Vec::with_capacity(((2 * r[0] + 1) * (2 * r[1] + 1) * (2 * r[2] + 1)) as usize);
        for z in -r[2]..=r[2] {
            for y in -r[1]..=r[1] {
                for x in -r[0]..=r[0] {
                    let offset = [x, y, z];
                    bin_search_order.push((offset, min_dist_sq(&offset, &bin_size)));
                }
            }
        }
        bin_search_order.sort_by(|a, b| a.1.total_cmp(&b.1));

        AlgorithmGrid {
            resolution,
            scale,
            limit: resolution.map(|n| n as f64 - 1e-5),
            min: bounds.min,
            bins: vec![Vec::new(); resolution[0] * resolution[1] * resolution[2]],
            generator_bin_ids: Vec::new(),
            bin_search_order,
        }
    }

    /// Creates a grid with `cbrt(count)` bins per axis, a good default for `count` points.
    pub fn with_point_count(count: usize, bounds: &BoundingBox) -> Self {
        let n = (count as f64).cbrt().ceil() as usize;
        Self::new(n, n, n, bounds)
    }

    fn bin_coords(&self, p: &Point) -> [usize; 3] {
        [0usize, 1, 2].map(|axis| ((p[axis] - self.min[axis]) * self.scale[axis]).clamp(0.0, self.limit[axis]) as usize)
    }

    /// Calculates the linear index of the bin containing `p`.
    pub fn get_bin_index(&self, p: &Point) -> usize {
        let [ix, iy, iz] = self.bin_coords(p);
        ix + iy * self.resolution[0] + iz * self.resolution[0] * self.resolution[1]
    }
}

impl SpatialAlgorithm for AlgorithmGrid {
    fn set_generators(&mut self, generators: &[Point]) {
        self.bins.iter_mut().for_each(|bin| bin.clear());
        let bin_ids: Vec<usize> = generators.iter().map(|p| self.get_bin_index(p)).collect();
        self.generator_bin_ids = bin_ids;
        for (i, &bin) in self.generator_bin_ids.iter().enumerate() {
            self.bins[bin].push(i);
        }
    }

    fn visit_neighbors<F>(&self, generators: &[Point], index: usize, max_dist_sq: &mut f64, mut visitor: F)
    where
        F: FnMut(usize, &Point, f64) -> f64,
    {
        let pos = generators[index];
        let home = self.bin_coords(&pos);
        let bin_size = self.scale.map(|s| 1.0 / s);
        // Position of the generator inside its home bin, in bin units
        let rel: [f64; 3] = [0usize, 1, 2].map(|axis| (pos[axis] - self.min[axis]) * self.scale[axis] - home[axis] as f64);

        for &(offset, min_d2) in &self.bin_search_order {
            if min_d2 > 4.0 * *max_dist_sq {
                break;
            }

            let mut bin = [0usize; 3];
            let mut gap_sq = 0.0;
            let mut inside = true;
            for axis in 0..3 {
                let b = home[axis] as isize + offset[axis];
                if b < 0 || b >= self.resolution[axis] as isize {
                    inside = false;
                    break;
                }
                bin[axis] = b as usize;

                let d = offset[axis];
                let gap = if d > 0 {
                    (d as f64 - rel[axis]) * bin_size[axis]
                } else if d < 0 {
                    (-(d + 1) as f64 + rel[axis]) * bin_size[axis]
                } else {
                    0.0
                };
                let gap = gap.max(0.0);
                gap_sq += gap * gap;
            }
            if !inside || gap_sq > 4.0 * *max_dist_sq {
                continue;
            }

            let bin_index = bin[0] + bin[1] * self.resolution[0] + bin[2] * self.resolution[0] * self.resolution[1];
            for &j in &self.bins[bin_index] {
                if j == index {
                    continue;
                }
                *max_dist_sq = visitor(j, &generators[j], *max_dist_sq);
            }
        }
    }
}

/// Lower bound on the squared distance between points in two bins `offset` apart.
fn min_dist_sq(offset: &[isize; 3], bin_size: &[f64; 3]) -> f64 {
    (0..3)
        .map(|axis| {
            let gap = (offset[axis].unsigned_abs().saturating_sub(1)) as f64 * bin_size[axis];
            gap * gap
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> AlgorithmGrid {
        AlgorithmGrid::new(10, 10, 10, &BoundingBox::cube(100.0))
    }

    #[test]
    fn test_grid_binning_indices() {
        let grid = grid();
        assert_eq!(grid.get_bin_index(&[5.0, 5.0, 5.0]), 0);
        assert_eq!(grid.get_bin_index(&[15.0, 5.0, 5.0]), 1);
        assert_eq!(grid.get_bin_index(&[5.0, 15.0, 5.0]), 10);
        // Clamped into the border bins
        assert_eq!(grid.get_bin_index(&[-50.0, 5.0, 5.0]), 0);
        assert_eq!(grid.get_bin_index(&[150.0, 150.0, 150.0]), 999);
    }

    #[test]
    fn test_visit_neighbors_covers_everything_with_unbounded_radius() {
        let mut grid = grid();
        let generators = vec![[5.0, 5.0, 5.0], [95.0, 95.0, 95.0], [50.0, 10.0, 80.0], [5.5, 5.0, 5.0]];
        grid.set_generators(&generators);

        let mut visited = Vec::new();
        let mut max_dist_sq = f64::INFINITY;
        grid.visit_neighbors(&generators, 0, &mut max_dist_sq, |j, _, d| {
            visited.push(j);
            d
        });
        visited.sort_unstable();
        assert_eq!(visited, vec![1, 2, 3]);
    }

    #[test]
    fn test_visit_neighbors_stops_at_radius() {
        let mut grid = grid();
        let generators = vec![[5.0, 5.0, 5.0], [95.0, 95.0, 95.0], [6.0, 5.0, 5.0]];
        grid.set_generators(&generators);

        let mut visited = Vec::new();
        let mut max_dist_sq = 4.0;
        grid.visit_neighbors(&generators, 0, &mut max_dist_sq, |j, _, d| {
            visited.push(j);
            d
        });
        assert_eq!(visited, vec![2]);
    }
}

/// An unordered pair of Voronoi-adjacent generators, stored with `a < b`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ridge {
    pub a: usize,
    pub b: usize,
}

impl Ridge {
    pub fn new(i: usize, j: usize) -> Self {
        Ridge { a: i.min(j), b: i.max(j) }
    }
}

/// The ridges between generators of a tessellation.
///
/// Faces on the clip box carry negative wall ids; they stand in for auxiliary points and
/// never become ridges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VoronoiDiagram {
    point_count: usize,
    ridges: Vec<Ridge>,
    boundary: Vec<bool>,
}

impl VoronoiDiagram {
    /// Builds the diagram from the face neighbour ids of every cell, indexed by generator.
    ///
    /// A ridge is recorded when either side reports it, so a face lost to round-off on one
    /// side still yields a symmetric pair. Ridges come out sorted.
    pub fn from_face_neighbors(point_count: usize, cells: &[Vec<i32>]) -> Self {
        let mut ridges = Vec::new();
        let mut boundary = vec![false; point_count];
        let mut dropped = 0usize;

        for (i, faces) in cells.iter().enumerate().take(point_count) {
            for &n in faces {
                if n < 0 || n as usize >= point_count {
                    boundary[i] = true;
                    dropped += 1;
                    continue;
                }
                let j = n as usize;
                if j != i {
                    ridges.push(Ridge::new(i, j));
                }
            }
        }
        ridges.sort_unstable();
        ridges.dedup();
        tracing::trace!(dropped, "faces without a generator on the far side");

        VoronoiDiagram {
            point_count,
            ridges,
            boundary,
        }
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn ridges(&self) -> &[Ridge] {
        &self.ridges
    }

    /// Whether the region of `index` reached the clip box.
    pub fn is_boundary(&self, index: usize) -> bool {
        self.boundary.get(index).copied().unwrap_or(false)
    }

    pub fn boundary_count(&self) -> usize {
        self.boundary.iter().filter(|&&b| b).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ridges_are_unioned_and_sorted() {
        // 0 sees 2 and a wall, 1 sees 0, 2 sees nobody.
        let cells = vec![vec![2, -1], vec![0], vec![]];
        let diagram = VoronoiDiagram::from_face_neighbors(3, &cells);

        assert_eq!(diagram.ridges(), &[Ridge::new(0, 1), Ridge::new(0, 2)]);
        assert!(diagram.is_boundary(0));
        assert!(!diagram.is_boundary(1));
        assert!(!diagram.is_boundary(7));
    }

    #[test]
    fn test_out_of_range_ids_are_dropped() {
        let cells = vec![vec![1, 5], vec![0, 0]];
        let diagram = VoronoiDiagram::from_face_neighbors(2, &cells);

        assert_eq!(diagram.ridges(), &[Ridge { a: 0, b: 1 }]);
        assert_eq!(diagram.boundary_count(), 1);
    }
}

use crate::bounds::{wall_normal, BoundingBox, Point};
use crate::cell_faces::{cross, dist_sq, dot, sub, CellFaces, CellFacesScratch, WallCrossing};
use crate::diagram::VoronoiDiagram;
use crate::error::{Error, Result};
use crate::region::Region;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Faces smaller than this fraction of clip box extent times generator extent do not form
/// ridges.
const FACE_AREA_TOLERANCE: f64 = 1e-12;

/// Generators closer than this fraction of their extent to a hull plane count as on it.
const HULL_TOLERANCE: f64 = 1e-9;

/// Clip box enlargements before the diagram is given up on.
const MAX_GROWTH_ROUNDS: usize = 64;

/// Margin added around escaped vertices, as a fraction of the grown box extent.
const GROWTH_MARGIN: f64 = 0.1;

/// What the diagram needs to know about one clipped cell.
struct CellSurvey {
    id: usize,
    face_neighbors: Vec<i32>,
    crossings: Vec<WallCrossing>,
    interior_vertex: bool,
    touches_walls: bool,
    collapsed: bool,
}

impl CellSurvey {
    fn new(cell: &CellFaces, min_area: f64) -> Self {
        let touches_walls = cell.touches_walls();
        CellSurvey {
            id: cell.id(),
            face_neighbors: cell.face_neighbors_above(min_area),
            crossings: if touches_walls { cell.wall_crossings(min_area) } else { Vec::new() },
            interior_vertex: cell.has_interior_vertex(min_area),
            touches_walls,
            collapsed: cell.is_empty(),
        }
    }
}

/// A Voronoi tessellation of a static set of generators inside a clip box.
///
/// Cells are not stored: each one is rebuilt on demand by clipping the clip box against the
/// bisector planes of the candidate neighbours the spatial algorithm reports.
pub struct Tessellation<A: SpatialAlgorithm> {
    pub bounds: BoundingBox,
    pub generators: Vec<Point>,
    pub algorithm: A,
}

impl<A: SpatialAlgorithm> Tessellation<A> {
    pub fn new(bounds: BoundingBox, algorithm: A) -> Self {
        Self {
            bounds,
            generators: Vec::new(),
            algorithm,
        }
    }

    pub fn set_generators(&mut self, generators: Vec<Point>) {
        self.generators = generators;
        self.algorithm.set_generators(&self.generators);
    }

    pub fn count_generators(&self) -> usize {
        self.generators.len()
    }

    /// Calculates the cell of generator `index`.
    pub fn get(&self, index: usize) -> Option<CellFaces> {
        if index >= self.generators.len() {
            return None;
        }
        Some(self.compute_cell(index, &mut CellFacesScratch::default()))
    }

    /// The region of generator `index`, with vertices on the clip box at infinity.
    pub fn region(&self, index: usize) -> Option<Region> {
        self.get(index).map(|cell| cell.region())
    }

    /// Calculates every cell in parallel and maps it through `f`, in generator order.
    ///
    /// This avoids keeping all cells in memory at once.
    pub fn map<F, R>(&self, f: F) -> Vec<R>
    where
        F: Fn(CellFaces) -> R + Sync + Send,
        R: Send,
    {
        (0..self.generators.len())
            .into_par_iter()
            .map_init(CellFacesScratch::default, |scratch, i| f(self.compute_cell(i, scratch)))
            .collect()
    }

    /// Reduces the tessellation to its ridges between generators.
    ///
    /// Every ridge has a Voronoi vertex, so the clip box is first grown until it holds all of
    /// them: as long as a Voronoi edge leaves the box and ends in a vertex instead of running
    /// off to infinity, the box is enlarged to take that vertex in. Regions computed after
    /// this returns are exact up to their vertices at infinity.
    ///
    /// Fails with [`Error::GeometryDegenerate`] when the generators have no Voronoi vertex at
    /// all, or the vertices keep escaping.
    pub fn diagram(&mut self) -> Result<VoronoiDiagram> {
        if self.generators.is_empty() {
            return Ok(VoronoiDiagram::from_face_neighbors(0, &[]));
        }

        let g0 = self.generators[0];
        let spread = BoundingBox::new(g0, g0).enclosing(&self.generators).extent();

        for round in 0..MAX_GROWTH_ROUNDS {
            let extent = self.bounds.extent();
            let min_area = FACE_AREA_TOLERANCE * extent * spread;
            let surveys = self.map(|cell| CellSurvey::new(&cell, min_area));
            let escaped = self.escaped_vertices(&surveys, HULL_TOLERANCE * spread);

            if escaped.is_empty() && surveys.iter().any(|survey| survey.interior_vertex) {
                for survey in surveys.iter().filter(|survey| survey.collapsed) {
                    warn!(generator = survey.id, "voronoi cell collapsed");
                }
                let face_neighbors: Vec<Vec<i32>> = surveys.into_iter().map(|survey| survey.face_neighbors).collect();
                let diagram = VoronoiDiagram::from_face_neighbors(self.generators.len(), &face_neighbors);
                debug!(
                    generators = self.generators.len(),
                    ridges = diagram.ridges().len(),
                    boundary = diagram.boundary_count(),
                    rounds = round + 1,
                    "reduced tessellation to ridges"
                );
                return Ok(diagram);
            }

            self.bounds = if escaped.is_empty() {
                self.bounds.padded(extent)
            } else {
                let grown = self.bounds.enclosing(&escaped);
                grown.padded(GROWTH_MARGIN * grown.extent())
            };
            debug!(round, escaped = escaped.len(), extent = self.bounds.extent(), "grew clip box");
        }

        Err(Error::GeometryDegenerate(format!(
            "voronoi vertices still outside the clip box after {} enlargements",
            MAX_GROWTH_ROUNDS
        )))
    }

    /// Voronoi vertices beyond the clip box that are reachable over an edge leaving it.
    fn escaped_vertices(&self, surveys: &[CellSurvey], tolerance: f64) -> Vec<Point> {
        // A vertex outside the box is nearest to generators whose cells reach the walls.
        let outer: Vec<usize> = surveys.iter().filter(|survey| survey.touches_walls).map(|survey| survey.id).collect();

        let mut escaped = Vec::new();
        for survey in surveys {
            for crossing in &survey.crossings {
                if let Some(end) = self.edge_end(survey.id, crossing, &outer, tolerance) {
                    if !self.bounds.contains(&end) {
                        escaped.push(end);
                    }
                }
            }
        }
        escaped
    }

    /// Follows the edge equidistant to generator `i` and the crossing's generators from the
    /// wall outwards. Returns the vertex it ends in, `None` for a ray to infinity.
    fn edge_end(&self, i: usize, crossing: &WallCrossing, candidates: &[usize], tolerance: f64) -> Option<Point> {
        let g = &self.generators;
        let [j, k] = crossing.generators;
        let n = cross(&sub(&g[j], &g[i]), &sub(&g[k], &g[i]));
        let n_len = dot(&n, &n).sqrt();
        if n_len == 0.0 {
            return None;
        }

        // Orient the edge direction out of the wall it crosses
        let alignment = crossing
            .walls
            .iter()
            .filter_map(|&wall| wall_normal(wall))
            .map(|normal| dot(&n, &normal))
            .max_by(|a, b| a.abs().total_cmp(&b.abs()))?;
        if alignment.abs() <= HULL_TOLERANCE * n_len {
            return None;
        }
        let d = n.map(|c| c * alignment.signum() / n_len);

        // The edge ends where another generator becomes as close as `i`. Generators behind
        // the plane of `i`, `j` and `k` never do: then it is a ray off a hull facet.
        let x = crossing.position;
        let r2 = dist_sq(&x, &g[i]);
        candidates
            .iter()
            .filter(|&&l| l != i && l != j && l != k)
            .filter_map(|&l| {
                let approach = dot(&d, &sub(&g[l], &g[i]));
                (approach > tolerance).then(|| (dist_sq(&x, &g[l]) - r2).max(0.0) / (2.0 * approach))
            })
            .min_by(f64::total_cmp)
            .map(|t| [x[0] + t * d[0], x[1] + t * d[1], x[2] + t * d[2]])
    }

    fn compute_cell(&self, index: usize, scratch: &mut CellFacesScratch) -> CellFaces {
        let g = self.generators[index];
        let mut cell = CellFaces::new(index, &self.bounds);
        let mut current_max_dist_sq = cell.max_radius_sq(&g);

        self.algorithm
            .visit_neighbors(&self.generators, index, &mut current_max_dist_sq, |j, n_pos, cur_dist| {
                let d = sub(n_pos, &g);
                // Beyond twice the cell radius the bisector cannot reach the cell
                if dot(&d, &d) > 4.0 * cur_dist {
                    return cur_dist;
                }
                let mid = [g[0] + d[0] * 0.5, g[1] + d[1] * 0.5, g[2] + d[2] * 0.5];
                cell.clip(&mid, &d, j as i32, scratch, &g).unwrap_or(cur_dist)
            });

        cell
    }
}

/// Trait defining a spatial acceleration structure for neighbour candidates.
pub trait SpatialAlgorithm: Send + Sync {
    /// Rebuild the index with new generators.
    fn set_generators(&mut self, generators: &[Point]);

    /// Visit potential neighbors of generator `index`, nearest bins first.
    ///
    /// # Arguments
    /// * `generators` - The full list of generators.
    /// * `index` - The index of the generator we are processing.
    /// * `max_dist_sq` - The current squared radius of the cell. The visitor returns the
    ///                   updated radius, which narrows the search as the cell shrinks.
    /// * `visitor` - Called with each candidate's index and position.
    fn visit_neighbors<F>(&self, generators: &[Point], index: usize, max_dist_sq: &mut f64, visitor: F)
    where
        F: FnMut(usize, &Point, f64) -> f64;
}

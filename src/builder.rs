use crate::algo_grid::AlgorithmGrid;
use crate::bounds::{Domain, Point};
use crate::cell_faces::{cross, dot, sub};
use crate::config::TessellationConfig;
use crate::error::{Error, Result};
use crate::graph::{Graph, GraphBuilder};
use crate::tessellation::Tessellation;
use tracing::{debug, info};

/// Spans below this fraction of the extent, per dimension, count as zero.
const DEGENERACY_TOLERANCE: f64 = 1e-10;

/// Turns particle positions and their owners into a Voronoi neighbour graph.
#[derive(Clone, Debug, Default)]
pub struct TessellationBuilder {
    config: TessellationConfig,
}

impl TessellationBuilder {
    pub fn new(config: TessellationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TessellationConfig {
        &self.config
    }

    /// Builds the neighbour graph of `points`.
    ///
    /// Cell `i` belongs to `points[i]` and `owners[i]`; two cells are neighbours when their
    /// Voronoi regions share a face. Fails without a partial graph when the inputs disagree
    /// in shape or the points do not span a 3D tessellation.
    pub fn build(&self, points: &[Point], owners: &[u32], domain: &Domain) -> Result<Graph> {
        self.build_with_tessellation(points, owners, domain).map(|(graph, _)| graph)
    }

    /// Like [`build`](Self::build), also handing back the tessellation. Its clip box has
    /// grown to hold every Voronoi vertex, so its regions are exact.
    pub fn build_with_tessellation(
        &self,
        points: &[Point],
        owners: &[u32],
        domain: &Domain,
    ) -> Result<(Graph, Tessellation<AlgorithmGrid>)> {
        let mut graph = GraphBuilder::new(points, owners)?;
        let mut tessellation = self.tessellate(points, domain)?;
        let diagram = tessellation.diagram()?;

        for ridge in diagram.ridges() {
            graph.connect(ridge.a, ridge.b);
        }
        for id in (0..points.len()).filter(|&i| diagram.is_boundary(i)) {
            graph.mark_boundary(id);
        }

        info!(
            cells = points.len(),
            edges = diagram.ridges().len(),
            boundary = diagram.boundary_count(),
            "built neighbour graph"
        );
        Ok((graph.finish(), tessellation))
    }

    /// Validates `points` and sets up their tessellation.
    ///
    /// The initial clip box is the hull of `domain` and `points`, padded on every side by
    /// `padding` times its extent. [`Tessellation::diagram`] grows it further as needed.
    pub fn tessellate(&self, points: &[Point], domain: &Domain) -> Result<Tessellation<AlgorithmGrid>> {
        self.config.validate()?;
        if !domain.is_valid() {
            return Err(Error::InvalidDomain {
                min: domain.min,
                max: domain.max,
            });
        }
        check_finite(points)?;
        check_non_degenerate(points)?;

        let hull = domain.enclosing(points);
        let clip_box = hull.padded(self.config.padding * hull.extent());
        let algorithm = match self.config.grid_resolution {
            Some(n) => AlgorithmGrid::new(n, n, n, &hull),
            None => AlgorithmGrid::with_point_count(points.len(), &hull),
        };
        debug!(resolution = ?algorithm.resolution, clip_min = ?clip_box.min, clip_max = ?clip_box.max, "tessellating");

        let mut tessellation = Tessellation::new(clip_box, algorithm);
        tessellation.set_generators(points.to_vec());
        Ok(tessellation)
    }
}

fn check_finite(points: &[Point]) -> Result<()> {
    match points.iter().position(|p| !p.iter().all(|c| c.is_finite())) {
        Some(index) => Err(Error::NonFiniteCoordinate { index }),
        None => Ok(()),
    }
}

/// Rejects inputs without a proper 3D Voronoi diagram: fewer than four points, coincident
/// points, and point sets inside a plane or on a line.
fn check_non_degenerate(points: &[Point]) -> Result<()> {
    if points.len() < 4 {
        return Err(Error::GeometryDegenerate(format!(
            "{} points, a 3D tessellation needs at least 4",
            points.len()
        )));
    }

    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| {
        let (p, q) = (&points[a], &points[b]);
        p[0].total_cmp(&q[0]).then(p[1].total_cmp(&q[1])).then(p[2].total_cmp(&q[2]))
    });
    if let Some(pair) = order.windows(2).find(|w| points[w[0]] == points[w[1]]) {
        let (a, b) = (pair[0].min(pair[1]), pair[0].max(pair[1]));
        return Err(Error::GeometryDegenerate(format!("points {} and {} coincide", a, b)));
    }

    // Grow a simplex: farthest point from p0, then farthest from the line, then from the plane.
    let p0 = points[0];
    let scale = Domain::new(p0, p0).enclosing(points).extent();

    let e1 = points
        .iter()
        .map(|p| sub(p, &p0))
        .max_by(|a, b| dot(a, a).total_cmp(&dot(b, b)))
        .unwrap_or([0.0; 3]);
    let e1_len = dot(&e1, &e1).sqrt();

    let normal = points
        .iter()
        .map(|p| cross(&e1, &sub(p, &p0)))
        .max_by(|a, b| dot(a, a).total_cmp(&dot(b, b)))
        .unwrap_or([0.0; 3]);
    let normal_len = dot(&normal, &normal).sqrt();
    if normal_len <= DEGENERACY_TOLERANCE * e1_len * scale {
        return Err(Error::GeometryDegenerate("all points are collinear".into()));
    }

    let height = points
        .iter()
        .map(|p| dot(&normal, &sub(p, &p0)).abs())
        .fold(0.0, f64::max);
    if height <= DEGENERACY_TOLERANCE * normal_len * scale {
        return Err(Error::GeometryDegenerate("all points are coplanar".into()));
    }
    Ok(())
}

//! Finite stand-ins for the vertices of unbounded Voronoi regions.
//!
//! A region on the convex hull of the generators extends to infinity. For export it still
//! needs a closed set of positions, so every vertex at infinity is replaced by the corner of
//! the domain nearest to a reference point computed from the region's finite vertices.

use crate::bounds::{Domain, Point};
use serde::{Deserialize, Serialize};

/// One entry of a region's vertex loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionVertex {
    /// Index into the table of finite vertex positions.
    Finite(usize),
    /// A vertex without a finite position.
    Infinite,
}

impl RegionVertex {
    /// Decodes the `-1` convention used by qhull-style vertex lists. Other negative indices
    /// are not vertices.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            -1 => Some(RegionVertex::Infinite),
            i if i >= 0 => Some(RegionVertex::Finite(i as usize)),
            _ => None,
        }
    }
}

/// How the reference point of a region is derived from its finite vertices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePoint {
    /// Component-wise sum of the finite vertices, not divided by their count.
    #[default]
    FiniteVertexSum,
    /// Arithmetic mean of the finite vertices.
    FiniteVertexMean,
}

impl ReferencePoint {
    /// Computes the reference point of `vertices`. A region without finite vertices yields
    /// the origin.
    pub fn compute(&self, vertices: &[RegionVertex], positions: &[Point]) -> Point {
        let mut center = [0.0; 3];
        let mut count = 0usize;
        for vertex in vertices {
            if let RegionVertex::Finite(i) = vertex {
                let p = positions[*i];
                center[0] += p[0];
                center[1] += p[1];
                center[2] += p[2];
                count += 1;
            }
        }
        match self {
            ReferencePoint::FiniteVertexSum => center,
            ReferencePoint::FiniteVertexMean if count > 0 => center.map(|c| c / count as f64),
            ReferencePoint::FiniteVertexMean => center,
        }
    }
}

/// The vertex loop of one Voronoi region together with its finite vertex positions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Region {
    vertices: Vec<RegionVertex>,
    positions: Vec<Point>,
}

impl Region {
    pub fn new(vertices: Vec<RegionVertex>, positions: Vec<Point>) -> Self {
        Self { vertices, positions }
    }

    pub fn vertices(&self) -> &[RegionVertex] {
        &self.vertices
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn is_unbounded(&self) -> bool {
        self.vertices.contains(&RegionVertex::Infinite)
    }

    /// Finite positions for every vertex of the loop, see [`resolve_region_vertices_with`].
    pub fn resolve(&self, domain: &Domain, reference: ReferencePoint) -> Vec<Point> {
        resolve_region_vertices_with(&self.vertices, &self.positions, domain, reference)
    }
}

/// Replaces every vertex at infinity by the domain corner closest to the sum of the
/// region's finite vertices. Finite vertices are passed through unchanged.
pub fn resolve_region_vertices(vertices: &[RegionVertex], positions: &[Point], domain: &Domain) -> Vec<Point> {
    resolve_region_vertices_with(vertices, positions, domain, ReferencePoint::FiniteVertexSum)
}

/// Like [`resolve_region_vertices`] with a configurable reference point.
///
/// # Panics
/// If a [`RegionVertex::Finite`] index is out of range for `positions`.
pub fn resolve_region_vertices_with(
    vertices: &[RegionVertex],
    positions: &[Point],
    domain: &Domain,
    reference: ReferencePoint,
) -> Vec<Point> {
    let center = reference.compute(vertices, positions);
    vertices
        .iter()
        .map(|vertex| match vertex {
            RegionVertex::Finite(i) => positions[*i],
            RegionVertex::Infinite => closest_corner(&center, domain),
        })
        .collect()
}

/// Snaps `pos` to a corner of `domain`, independently per axis: `min` strictly below the
/// midpoint, `max` from the midpoint up.
pub fn closest_corner(pos: &Point, domain: &Domain) -> Point {
    [0usize, 1, 2].map(|axis| {
        if pos[axis] < domain.midpoint(axis) {
            domain.min[axis]
        } else {
            domain.max[axis]
        }
    })
}

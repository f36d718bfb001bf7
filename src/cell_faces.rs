use crate::bounds::{BoundingBox, Point};
use crate::bounds::{BOX_ID_BACK, BOX_ID_BOTTOM, BOX_ID_FRONT, BOX_ID_LEFT, BOX_ID_RIGHT, BOX_ID_TOP};
use crate::region::{Region, RegionVertex};

/// Signed distances within this fraction of the clip box extent count as lying on the
/// clipping plane.
const CLIP_TOLERANCE: f64 = 1e-9;

/// Scratch buffer to reuse allocations during clipping.
#[derive(Default, Clone)]
pub struct CellFacesScratch {
    vertices: Vec<Point>,
    face_counts: Vec<u16>,
    face_indices: Vec<u16>,
    face_neighbors: Vec<i32>,
    dists: Vec<f64>,
    is_intersection: Vec<bool>,
    old_to_new: Vec<Option<u16>>,
    intersection_map: Vec<(u32, u16)>,
    lid_segments: Vec<(u16, u16)>,
    face_buffer: Vec<u16>,
    lid_buffer: Vec<u16>,
    lid_map: Vec<u16>,
}

impl CellFacesScratch {
    fn reset(&mut self, num_verts: usize) {
        self.vertices.clear();
        self.face_counts.clear();
        self.face_indices.clear();
        self.face_neighbors.clear();
        self.is_intersection.clear();
        self.old_to_new.clear();
        self.old_to_new.resize(num_verts, None);
        self.intersection_map.clear();
        self.lid_segments.clear();
        self.lid_map.clear();
    }

    /// Returns the vertex where edge `(s, e)` crosses the plane, creating it on first use
    /// so the two faces sharing the edge agree on the index.
    fn intersection(&mut self, vertices: &[Point], s: usize, e: usize, generator: &Point, max_d2: &mut f64) -> u16 {
        let key = if s < e { (s as u32) << 16 | e as u32 } else { (e as u32) << 16 | s as u32 };
        if let Some(&(_, id)) = self.intersection_map.iter().find(|&&(k, _)| k == key) {
            return id;
        }

        let d_s = self.dists[s];
        let d_e = self.dists[e];
        let t = (d_s / (d_s - d_e)).clamp(0.0, 1.0);
        let a = vertices[s];
        let b = vertices[e];
        let p = [
            a[0] + t * (b[0] - a[0]),
            a[1] + t * (b[1] - a[1]),
            a[2] + t * (b[2] - a[2]),
        ];

        let id = self.vertices.len() as u16;
        self.vertices.push(p);
        self.is_intersection.push(true);
        self.intersection_map.push((key, id));
        *max_d2 = max_d2.max(dist_sq(&p, generator));
        id
    }
}

/// A Voronoi cell as a convex polyhedron with per-face neighbour information.
#[derive(Clone, Debug)]
pub struct CellFaces {
    pub(crate) id: usize,
    pub(crate) vertices: Vec<Point>,
    // Number of vertices for each face
    pub(crate) face_counts: Vec<u16>,
    // Flattened indices for all faces
    pub(crate) face_indices: Vec<u16>,
    // Neighbor ID for each face. Negative values indicate the walls of the clip box.
    pub(crate) face_neighbors: Vec<i32>,
    // Clipping tolerance, scaled to the box the cell started from
    tolerance: f64,
}

/// A vertex on the clip box where the faces towards two generators meet: the Voronoi edge
/// shared by the cell and `generators` leaves the box here.
#[derive(Clone, Debug, PartialEq)]
pub struct WallCrossing {
    pub position: Point,
    pub generators: [usize; 2],
    /// Walls the vertex lies on, more than one on an edge or corner of the box.
    pub walls: Vec<i32>,
}

impl CellFaces {
    /// Creates the cell of generator `id` as the full box `bounds`.
    pub fn new(id: usize, bounds: &BoundingBox) -> CellFaces {
        let [min_x, min_y, min_z] = bounds.min;
        let [max_x, max_y, max_z] = bounds.max;
        let vertices = vec![
            [min_x, min_y, min_z], // 0
            [max_x, min_y, min_z], // 1
            [max_x, max_y, min_z], // 2
            [min_x, max_y, min_z], // 3
            [min_x, min_y, max_z], // 4
            [max_x, min_y, max_z], // 5
            [max_x, max_y, max_z], // 6
            [min_x, max_y, max_z], // 7
        ];

        let face_indices: Vec<u16> = vec![
            3, 2, 1, 0, // Bottom (z-)
            4, 5, 6, 7, // Top (z+)
            0, 1, 5, 4, // Front (y-)
            2, 3, 7, 6, // Back (y+)
            0, 4, 7, 3, // Left (x-)
            1, 2, 6, 5, // Right (x+)
        ];

        CellFaces {
            id,
            vertices,
            face_counts: vec![4; 6],
            face_indices,
            face_neighbors: vec![
                BOX_ID_BOTTOM,
                BOX_ID_TOP,
                BOX_ID_FRONT,
                BOX_ID_BACK,
                BOX_ID_LEFT,
                BOX_ID_RIGHT,
            ],
            tolerance: CLIP_TOLERANCE * bounds.extent(),
        }
    }

    /// The ID of the generator associated with this cell.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Neighbor ID for each face. Negative values indicate walls of the clip box.
    pub fn face_neighbors(&self) -> &[i32] {
        &self.face_neighbors
    }

    /// IDs of the generators this cell shares a face with.
    pub fn neighbors(&self) -> impl Iterator<Item = usize> + '_ {
        self.face_neighbors.iter().filter(|&&n| n >= 0).map(|&n| n as usize)
    }

    /// Whether any face of the cell still lies on the clip box.
    pub fn touches_walls(&self) -> bool {
        self.face_neighbors.iter().any(|&n| n < 0)
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn faces(&self) -> Vec<&[u16]> {
        let mut faces = Vec::with_capacity(self.face_counts.len());
        let mut offset = 0;
        for &count in &self.face_counts {
            let count = count as usize;
            faces.push(&self.face_indices[offset..offset + count]);
            offset += count;
        }
        faces
    }

    pub fn volume(&self) -> f64 {
        let mut volume = 0.0;
        for face in self.faces() {
            if face.len() < 3 {
                continue;
            }
            // Fan triangulation around the first vertex of the face
            let v0 = self.vertices[face[0] as usize];
            for pair in face[1..].windows(2) {
                let v1 = self.vertices[pair[0] as usize];
                let v2 = self.vertices[pair[1] as usize];
                volume += dot(&v0, &cross(&v1, &v2));
            }
        }
        (volume / 6.0).abs()
    }

    /// Area of the planar polygon `face`.
    pub fn face_area(&self, face: &[u16]) -> f64 {
        if face.len() < 3 {
            return 0.0;
        }
        let v0 = self.vertices[face[0] as usize];
        let mut area = [0.0; 3];
        for pair in face[1..].windows(2) {
            let e1 = sub(&self.vertices[pair[0] as usize], &v0);
            let e2 = sub(&self.vertices[pair[1] as usize], &v0);
            let c = cross(&e1, &e2);
            area = [area[0] + c[0], area[1] + c[1], area[2] + c[2]];
        }
        0.5 * dot(&area, &area).sqrt()
    }

    /// Neighbor IDs of the faces with an area above `min_area`.
    ///
    /// Clipping can leave faces that collapsed to an edge or a point; they do not separate
    /// two cells.
    pub fn face_neighbors_above(&self, min_area: f64) -> Vec<i32> {
        self.faces()
            .iter()
            .zip(&self.face_neighbors)
            .filter(|(face, _)| self.face_area(face) > min_area)
            .map(|(_, &n)| n)
            .collect()
    }

    /// Neighbor IDs of the faces above `min_area` meeting at each vertex.
    fn vertex_neighbors(&self, min_area: f64) -> Vec<Vec<i32>> {
        let mut incident: Vec<Vec<i32>> = vec![Vec::new(); self.vertices.len()];
        for (face, &neighbor) in self.faces().iter().zip(&self.face_neighbors) {
            if self.face_area(face) <= min_area {
                continue;
            }
            for &v in face.iter() {
                let list = &mut incident[v as usize];
                if !list.contains(&neighbor) {
                    list.push(neighbor);
                }
            }
        }
        incident
    }

    /// Vertices on the clip box shared by faces towards two or more generators.
    pub fn wall_crossings(&self, min_area: f64) -> Vec<WallCrossing> {
        let mut crossings = Vec::new();
        for (v, incident) in self.vertex_neighbors(min_area).into_iter().enumerate() {
            let (walls, generators): (Vec<i32>, Vec<i32>) = incident.into_iter().partition(|&n| n < 0);
            if walls.is_empty() {
                continue;
            }
            for (a, &j) in generators.iter().enumerate() {
                for &k in &generators[a + 1..] {
                    crossings.push(WallCrossing {
                        position: self.vertices[v],
                        generators: [j as usize, k as usize],
                        walls: walls.clone(),
                    });
                }
            }
        }
        crossings
    }

    /// Whether some vertex off the clip box joins three faces towards generators, i.e. is a
    /// true Voronoi vertex.
    pub fn has_interior_vertex(&self, min_area: f64) -> bool {
        self.vertex_neighbors(min_area)
            .iter()
            .any(|incident| incident.len() >= 3 && incident.iter().all(|&n| n >= 0))
    }

    /// Squared distance from `center` to the furthest vertex.
    pub fn max_radius_sq(&self, center: &Point) -> f64 {
        self.vertices.iter().map(|v| dist_sq(v, center)).fold(0.0, f64::max)
    }

    /// The cell as a region: vertices on the clip box are at infinity.
    ///
    /// An unbounded region lists [`RegionVertex::Infinite`] once, in the position of its
    /// first vertex on the clip box.
    pub fn region(&self) -> Region {
        let mut at_infinity = vec![false; self.vertices.len()];
        for (face, &neighbor) in self.faces().iter().zip(&self.face_neighbors) {
            if neighbor < 0 {
                for &i in face.iter() {
                    at_infinity[i as usize] = true;
                }
            }
        }

        let mut vertices = Vec::with_capacity(self.vertices.len());
        let mut positions = Vec::with_capacity(self.vertices.len());
        let mut infinity_listed = false;
        for (v, &infinite) in self.vertices.iter().zip(&at_infinity) {
            if !infinite {
                vertices.push(RegionVertex::Finite(positions.len()));
                positions.push(*v);
            } else if !infinity_listed {
                vertices.push(RegionVertex::Infinite);
                infinity_listed = true;
            }
        }
        Region::new(vertices, positions)
    }

    /// Clips the cell by the plane through `point` with outward `normal`, labelling the new
    /// face with `neighbor_id`. `normal` need not be normalized.
    ///
    /// Returns `None` when the plane misses the cell, otherwise the new squared radius of the
    /// cell around `generator`.
    pub fn clip(
        &mut self,
        point: &Point,
        normal: &Point,
        neighbor_id: i32,
        scratch: &mut CellFacesScratch,
        generator: &Point,
    ) -> Option<f64> {
        let length = dot(normal, normal).sqrt();
        if length == 0.0 {
            return None;
        }
        let unit = normal.map(|c| c / length);
        let tol = self.tolerance;

        let num_verts = self.vertices.len();
        scratch.dists.clear();
        scratch
            .dists
            .extend(self.vertices.iter().map(|v| dot(&sub(v, point), &unit)));

        if scratch.dists.iter().all(|&d| d <= tol) {
            return None;
        }
        if scratch.dists.iter().all(|&d| d >= -tol) {
            self.vertices.clear();
            self.face_counts.clear();
            self.face_indices.clear();
            self.face_neighbors.clear();
            return Some(0.0);
        }

        scratch.reset(num_verts);
        let mut max_d2: f64 = 0.0;

        // Keep existing vertices that are inside
        for (i, v) in self.vertices.iter().enumerate() {
            if scratch.dists[i] <= tol {
                scratch.old_to_new[i] = Some(scratch.vertices.len() as u16);
                scratch.vertices.push(*v);
                scratch.is_intersection.push(false);
                max_d2 = max_d2.max(dist_sq(v, generator));
            }
        }

        let mut offset = 0;
        for (face_idx, &count) in self.face_counts.iter().enumerate() {
            let count = count as usize;
            let indices = &self.face_indices[offset..offset + count];
            offset += count;

            scratch.face_buffer.clear();
            for k in 0..count {
                let s = indices[k] as usize;
                let e = indices[(k + 1) % count] as usize;
                let s_in = scratch.dists[s] <= tol;
                let e_in = scratch.dists[e] <= tol;

                if s_in != e_in {
                    let idx = scratch.intersection(&self.vertices, s, e, generator, &mut max_d2);
                    scratch.face_buffer.push(idx);
                }
                if e_in {
                    if let Some(idx) = scratch.old_to_new[e] {
                        scratch.face_buffer.push(idx);
                    }
                }
            }

            let len = scratch.face_buffer.len();
            if len >= 3 {
                scratch.face_counts.push(len as u16);
                scratch.face_neighbors.push(self.face_neighbors[face_idx]);

                // Segments on the clipping plane, reversed for the lid face
                for i in 0..len {
                    let u = scratch.face_buffer[i];
                    let v = scratch.face_buffer[(i + 1) % len];
                    if scratch.is_intersection[u as usize] && scratch.is_intersection[v as usize] {
                        scratch.lid_segments.push((v, u));
                    }
                }
                scratch.face_indices.extend_from_slice(&scratch.face_buffer);
            }
        }

        // Chain the segments into the lid face
        if !scratch.lid_segments.is_empty() {
            scratch.lid_buffer.clear();
            scratch.lid_map.resize(scratch.vertices.len(), u16::MAX);
            for &(u, v) in &scratch.lid_segments {
                scratch.lid_map[u as usize] = v;
            }

            let (start, next) = scratch.lid_segments[0];
            scratch.lid_buffer.push(start);
            let mut current = next;
            while current != start && scratch.lid_buffer.len() <= scratch.lid_segments.len() {
                scratch.lid_buffer.push(current);
                current = scratch.lid_map[current as usize];
                if current == u16::MAX {
                    break;
                }
            }

            if scratch.lid_buffer.len() >= 3 {
                scratch.face_counts.push(scratch.lid_buffer.len() as u16);
                scratch.face_indices.extend_from_slice(&scratch.lid_buffer);
                scratch.face_neighbors.push(neighbor_id);
            }
        }

        std::mem::swap(&mut self.vertices, &mut scratch.vertices);
        std::mem::swap(&mut self.face_counts, &mut scratch.face_counts);
        std::mem::swap(&mut self.face_indices, &mut scratch.face_indices);
        std::mem::swap(&mut self.face_neighbors, &mut scratch.face_neighbors);

        Some(max_d2)
    }
}

#[inline]
pub(crate) fn sub(a: &Point, b: &Point) -> Point {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub(crate) fn dot(a: &Point, b: &Point) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub(crate) fn cross(a: &Point, b: &Point) -> Point {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub(crate) fn dist_sq(a: &Point, b: &Point) -> f64 {
    let d = sub(a, b);
    dot(&d, &d)
}

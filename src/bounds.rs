/// A 3D coordinate.
pub type Point = [f64; 3];

/// Bounding box ID for the bottom face, it is negative to prevent conflicts with generator IDs.
pub const BOX_ID_BOTTOM: i32 = -1;
/// Bounding box ID for the top face, it is negative to prevent conflicts with generator IDs.
pub const BOX_ID_TOP: i32 = -2;
/// Bounding box ID for the front face, it is negative to prevent conflicts with generator IDs.
pub const BOX_ID_FRONT: i32 = -3;
/// Bounding box ID for the back face, it is negative to prevent conflicts with generator IDs.
pub const BOX_ID_BACK: i32 = -4;
/// Bounding box ID for the left face, it is negative to prevent conflicts with generator IDs.
pub const BOX_ID_LEFT: i32 = -5;
/// Bounding box ID for the right face, it is negative to prevent conflicts with generator IDs.
pub const BOX_ID_RIGHT: i32 = -6;

/// Outward unit normal of the clip box wall with id `id`, `None` for generator ids.
pub fn wall_normal(id: i32) -> Option<Point> {
    match id {
        BOX_ID_BOTTOM => Some([0.0, 0.0, -1.0]),
        BOX_ID_TOP => Some([0.0, 0.0, 1.0]),
        BOX_ID_FRONT => Some([0.0, -1.0, 0.0]),
        BOX_ID_BACK => Some([0.0, 1.0, 0.0]),
        BOX_ID_LEFT => Some([-1.0, 0.0, 0.0]),
        BOX_ID_RIGHT => Some([1.0, 0.0, 0.0]),
        _ => None,
    }
}

/// Axis-aligned box in 3D space.
///
/// Used both as the simulation domain that unbounded regions snap to and as the clip box
/// every Voronoi cell starts from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

/// The simulation domain.
pub type Domain = BoundingBox;

impl BoundingBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// The cube `[0, size]` on every axis.
    pub fn cube(size: f64) -> Self {
        Self::new([0.0; 3], [size; 3])
    }

    /// Midpoint of the range on `axis`.
    pub fn midpoint(&self, axis: usize) -> f64 {
        (self.min[axis] + self.max[axis]) / 2.0
    }

    /// Length of the longest side.
    pub fn extent(&self) -> f64 {
        (0..3).map(|axis| self.max[axis] - self.min[axis]).fold(0.0, f64::max)
    }

    /// Every bound is finite and every range is non-empty.
    pub fn is_valid(&self) -> bool {
        (0..3).all(|axis| {
            self.min[axis].is_finite() && self.max[axis].is_finite() && self.min[axis] < self.max[axis]
        })
    }

    pub fn contains(&self, p: &Point) -> bool {
        (0..3).all(|axis| p[axis] >= self.min[axis] && p[axis] <= self.max[axis])
    }

    /// Smallest box containing `self` and every point in `points`.
    pub fn enclosing(&self, points: &[Point]) -> Self {
        let mut min = self.min;
        let mut max = self.max;
        for p in points {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        Self { min, max }
    }

    /// Grows the box by `margin` on every side.
    pub fn padded(&self, margin: f64) -> Self {
        Self {
            min: self.min.map(|v| v - margin),
            max: self.max.map(|v| v + margin),
        }
    }
}

use crate::bounds::Point;
use crate::error::{Error, Result};
use std::fmt;

/// Stable identifier of a cell: the index of its point in the input sequence.
pub type CellId = usize;

/// One particle in the neighbour graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    id: CellId,
    position: Point,
    owner: u32,
    pub(crate) neighbors: Vec<CellId>,
    boundary: bool,
}

impl Cell {
    pub fn new(id: CellId, position: Point, owner: u32) -> Self {
        Cell {
            id,
            position,
            owner,
            neighbors: Vec::new(),
            boundary: false,
        }
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// The task that owns the particle.
    pub fn owner(&self) -> u32 {
        self.owner
    }

    /// Neighbour ids in the order their ridges were discovered.
    pub fn neighbors(&self) -> &[CellId] {
        &self.neighbors
    }

    /// Whether the cell's Voronoi region reached the clip box.
    pub fn is_boundary(&self) -> bool {
        self.boundary
    }
}

/// Mutable graph under construction. [`GraphBuilder::finish`] turns it into a [`Graph`].
#[derive(Debug)]
pub struct GraphBuilder {
    cells: Vec<Cell>,
    points: Vec<Point>,
}

impl GraphBuilder {
    /// One cell per point, with ids in input order.
    pub fn new(points: &[Point], owners: &[u32]) -> Result<Self> {
        if points.len() != owners.len() {
            return Err(Error::InputShapeMismatch {
                points: points.len(),
                owners: owners.len(),
            });
        }
        let cells = points
            .iter()
            .zip(owners)
            .enumerate()
            .map(|(id, (&position, &owner))| Cell::new(id, position, owner))
            .collect();
        Ok(GraphBuilder {
            cells,
            points: points.to_vec(),
        })
    }

    /// Adds the undirected edge `a`-`b`. No duplicate check: each ridge is connected once.
    pub fn connect(&mut self, a: CellId, b: CellId) {
        debug_assert_ne!(a, b, "a cell cannot neighbour itself");
        self.cells[a].neighbors.push(b);
        self.cells[b].neighbors.push(a);
    }

    pub fn mark_boundary(&mut self, id: CellId) {
        self.cells[id].boundary = true;
    }

    pub fn finish(self) -> Graph {
        Graph {
            cells: self.cells,
            points: self.points,
        }
    }
}

/// Read-only neighbour graph over the input points.
#[derive(Clone, Debug, PartialEq)]
pub struct Graph {
    cells: Vec<Cell>,
    points: Vec<Point>,
}

impl Graph {
    /// Assembles a graph from cells whose ids already match their positions.
    pub(crate) fn from_cells(cells: Vec<Cell>) -> Self {
        let points = cells.iter().map(|cell| cell.position).collect();
        Graph { cells, points }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    /// The input points, in input order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Every undirected edge once, as `(a, b)` with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = (CellId, CellId)> + '_ {
        self.cells.iter().flat_map(|cell| {
            cell.neighbors
                .iter()
                .filter(move |&&n| cell.id < n)
                .map(move |&n| (cell.id, n))
        })
    }

    /// Owners of the neighbours of `id`, one entry per neighbour.
    pub fn neighbor_owners(&self, id: CellId) -> impl Iterator<Item = u32> + '_ {
        self.cells
            .get(id)
            .into_iter()
            .flat_map(move |cell| cell.neighbors.iter().map(move |&n| self.cells[n].owner))
    }

    pub fn boundary_cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().filter(|cell| cell.boundary)
    }
}

/// The neighbour list format: `id owner x y z n0 n1 ...`, one line per cell.
impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let [x, y, z] = cell.position;
            write!(f, "{} {} {:?} {:?} {:?}", cell.id, cell.owner, x, y, z)?;
            for n in &cell.neighbors {
                write!(f, " {}", n)?;
            }
        }
        Ok(())
    }
}

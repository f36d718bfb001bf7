//! Reading particle snapshots and writing neighbour lists.

use crate::bounds::{Domain, Point};
use crate::error::{Error, Result};
use crate::graph::{Cell, Graph};
use crate::region::ReferencePoint;
use crate::tessellation::{SpatialAlgorithm, Tessellation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

/// A particle snapshot: box size, positions and owning task of every particle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    pub box_size: f64,
    pub coordinates: Vec<Point>,
    pub tasks: Vec<u32>,
}

impl InputRecord {
    /// Reads a JSON snapshot.
    pub fn read(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let record: Self = serde_json::from_str(data)?;
        if record.coordinates.len() != record.tasks.len() {
            return Err(Error::InputShapeMismatch {
                points: record.coordinates.len(),
                owners: record.tasks.len(),
            });
        }
        Ok(record)
    }

    /// The cube `[0, box_size]` on every axis.
    pub fn domain(&self) -> Domain {
        Domain::cube(self.box_size)
    }
}

/// Splits a flat `[x, y, z, x, y, z, ...]` buffer into points.
pub fn points_from_flat(coordinates: &[f64]) -> Result<Vec<Point>> {
    if coordinates.len() % 3 != 0 {
        return Err(Error::MalformedCoordinates(coordinates.len()));
    }
    Ok(coordinates.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect())
}

/// Writes `graph` as a neighbour list, see the [`Display`](std::fmt::Display) impl of [`Graph`].
pub fn write_neighbor_list<W: Write>(graph: &Graph, mut writer: W) -> std::io::Result<()> {
    write!(writer, "{}", graph)?;
    writer.flush()
}

/// Parses a neighbour list back into a graph.
///
/// Lines may come in any order but the ids must be exactly `0..n`. Blank lines are skipped.
pub fn read_neighbor_list<R: BufRead>(reader: R) -> Result<Graph> {
    let mut parsed: Vec<(usize, Cell, Vec<usize>)> = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (cell, neighbors) = parse_line(&line).map_err(|message| Error::Parse { line: i + 1, message })?;
        parsed.push((i + 1, cell, neighbors));
    }

    parsed.sort_by_key(|(_, cell, _)| cell.id());
    let count = parsed.len();
    let mut cells = Vec::with_capacity(count);
    for (expected, (line, mut cell, neighbors)) in parsed.into_iter().enumerate() {
        if cell.id() != expected {
            return Err(Error::Parse {
                line,
                message: format!("cell ids must be 0..{}, found {}", count, cell.id()),
            });
        }
        if let Some(&n) = neighbors.iter().find(|&&n| n >= count || n == expected) {
            return Err(Error::Parse {
                line,
                message: format!("invalid neighbour {}", n),
            });
        }
        cell.neighbors = neighbors;
        cells.push(cell);
    }
    Ok(Graph::from_cells(cells))
}

fn parse_line(line: &str) -> std::result::Result<(Cell, Vec<usize>), String> {
    let mut fields = line.split_ascii_whitespace();
    let mut next = |name: &str| fields.next().ok_or_else(|| format!("missing {}", name));

    let id = next("id")?.parse::<usize>().map_err(|e| format!("id: {}", e))?;
    let owner = next("owner")?.parse::<u32>().map_err(|e| format!("owner: {}", e))?;
    let mut position = [0.0; 3];
    for (axis, name) in ["x", "y", "z"].into_iter().enumerate() {
        position[axis] = next(name)?.parse::<f64>().map_err(|e| format!("{}: {}", name, e))?;
    }
    let neighbors = fields
        .map(|n| n.parse::<usize>().map_err(|e| format!("neighbour {:?}: {}", n, e)))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((Cell::new(id, position, owner), neighbors))
}

/// Writes every region with its vertices at infinity snapped into `domain`, one line per
/// generator: `id x0 y0 z0 x1 y1 z1 ...`.
pub fn write_regions<A: SpatialAlgorithm, W: Write>(
    tessellation: &Tessellation<A>,
    domain: &Domain,
    reference: ReferencePoint,
    mut writer: W,
) -> std::io::Result<()> {
    let lines = tessellation.map(|cell| {
        let id = cell.id();
        let vertices = cell.region().resolve(domain, reference);
        let mut line = id.to_string();
        for [x, y, z] in vertices {
            line.push_str(&format!(" {:?} {:?} {:?}", x, y, z));
        }
        line
    });
    write!(writer, "{}", lines.join("\n"))?;
    writer.flush()
}

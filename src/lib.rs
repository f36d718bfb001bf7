//! # vorograph
//!
//! `vorograph` turns the particles of a domain-decomposed simulation into a neighbour graph:
//! two particles are neighbours when their 3D Voronoi regions share a face, and every
//! particle carries the id of the task that owns it. The graph is the input for deciding
//! which tasks have to talk to each other.
//!
//! ## Features
//!
//! - **Cell clipping**: every Voronoi cell is carved out of a clip box by the bisector planes
//!   of its candidate neighbours, which a uniform grid supplies nearest first. The box grows
//!   until it holds every Voronoi vertex, so no ridge is lost.
//! - **Parallel**: cells are computed with `rayon`; the resulting graph does not depend on
//!   scheduling.
//! - **Unbounded regions**: vertices at infinity are snapped to a corner of the domain for
//!   export.
//! - **WASM**: the neighbour list is available from JavaScript through `wasm-bindgen`.
//!
//! ## Main Interface
//!
//! The primary entry point is [`TessellationBuilder::build`], which returns a [`Graph`]. Its
//! [`Display`](std::fmt::Display) impl is the neighbour list format `id owner x y z n0 n1 ...`.

mod algo_grid;
mod bounds;
mod builder;
mod cell_faces;
mod config;
mod diagram;
mod error;
mod graph;
pub mod io;
mod region;
mod tessellation;
mod wasm;

pub use algo_grid::AlgorithmGrid;
pub use bounds::{wall_normal, BoundingBox, Domain, Point};
pub use bounds::{BOX_ID_BACK, BOX_ID_BOTTOM, BOX_ID_FRONT, BOX_ID_LEFT, BOX_ID_RIGHT, BOX_ID_TOP};
pub use builder::TessellationBuilder;
pub use cell_faces::{CellFaces, CellFacesScratch, WallCrossing};
pub use config::{TessellationConfig, DEFAULT_PADDING};
pub use diagram::{Ridge, VoronoiDiagram};
pub use error::{Error, Result};
pub use graph::{Cell, CellId, Graph, GraphBuilder};
pub use region::{closest_corner, resolve_region_vertices, resolve_region_vertices_with};
pub use region::{ReferencePoint, Region, RegionVertex};
pub use tessellation::{SpatialAlgorithm, Tessellation};
pub use wasm::neighbor_list;

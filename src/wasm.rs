use crate::bounds::Domain;
use crate::builder::TessellationBuilder;
use crate::io::points_from_flat;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = initThreads)]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

/// Builds the neighbour list of particles in the cube `[0, boxSize]^3`.
///
/// # Arguments
/// * `box_size` - Side length of the domain.
/// * `coordinates` - A flat array of coordinates `[x, y, z, x, y, z, ...]`.
/// * `owners` - The owning task of every particle.
#[wasm_bindgen(js_name = neighborList)]
pub fn neighbor_list(box_size: f64, coordinates: &[f64], owners: &[u32]) -> Result<String, JsError> {
    let points = points_from_flat(coordinates)?;
    let graph = TessellationBuilder::default().build(&points, owners, &Domain::cube(box_size))?;
    Ok(graph.to_string())
}

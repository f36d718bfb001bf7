//! Edge sets checked against a brute-force Delaunay triangulation: `i` and `j` share a
//! Voronoi face exactly when some tetrahedron through both has an empty circumsphere.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use vorograph::{Domain, Point, TessellationBuilder, TessellationConfig};

fn sub(a: &Point, b: &Point) -> Point {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: &Point, b: &Point) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: &Point, b: &Point) -> Point {
    [a[1] * b[2] - a[2] * b[1], a[2] * b[0] - a[0] * b[2], a[0] * b[1] - a[1] * b[0]]
}

/// Center and squared radius of the sphere through four points, `None` when they are flat.
fn circumsphere(a: &Point, b: &Point, c: &Point, d: &Point) -> Option<(Point, f64)> {
    let (u, v, w) = (sub(b, a), sub(c, a), sub(d, a));
    let det = dot(&u, &cross(&v, &w));
    let scale = dot(&u, &u).max(dot(&v, &v)).max(dot(&w, &w)).sqrt();
    if det.abs() <= 1e-12 * scale.powi(3) {
        return None;
    }
    let (uu, vv, ww) = (dot(&u, &u), dot(&v, &v), dot(&w, &w));
    let (vw, wu, uv) = (cross(&v, &w), cross(&w, &u), cross(&u, &v));
    let offset = [0usize, 1, 2].map(|k| (uu * vw[k] + vv * wu[k] + ww * uv[k]) / (2.0 * det));
    let center = [a[0] + offset[0], a[1] + offset[1], a[2] + offset[2]];
    Some((center, dot(&offset, &offset)))
}

fn delaunay_edges(points: &[Point]) -> BTreeSet<(usize, usize)> {
    let n = points.len();
    let mut edges = BTreeSet::new();
    for a in 0..n {
        for b in a + 1..n {
            for c in b + 1..n {
                for d in c + 1..n {
                    let Some((center, r2)) = circumsphere(&points[a], &points[b], &points[c], &points[d]) else {
                        continue;
                    };
                    let empty = (0..n).filter(|m| ![a, b, c, d].contains(m)).all(|m| {
                        let e = sub(&points[m], &center);
                        dot(&e, &e) > r2 * (1.0 + 1e-10)
                    });
                    if empty {
                        let tet = [a, b, c, d];
                        for i in 0..4 {
                            for j in i + 1..4 {
                                edges.insert((tet[i], tet[j]));
                            }
                        }
                    }
                }
            }
        }
    }
    edges
}

fn graph_edges(points: &[Point], domain: &Domain, config: TessellationConfig) -> BTreeSet<(usize, usize)> {
    let owners = vec![0; points.len()];
    TessellationBuilder::new(config)
        .build(points, &owners, domain)
        .expect("tessellation should succeed")
        .edges()
        .collect()
}

fn assert_matches_delaunay(points: &[Point], domain: &Domain) {
    let expected = delaunay_edges(points);
    let actual = graph_edges(points, domain, TessellationConfig::default());
    let missing: Vec<_> = expected.difference(&actual).collect();
    let extra: Vec<_> = actual.difference(&expected).collect();
    assert!(missing.is_empty() && extra.is_empty(), "missing {:?}, extra {:?}", missing, extra);
}

fn random_box(rng: &mut StdRng, count: usize, min: Point, max: Point) -> Vec<Point> {
    (0..count)
        .map(|_| [0usize, 1, 2].map(|a| rng.gen_range(min[a]..max[a])))
        .collect()
}

#[test]
fn test_random_sets_match_delaunay() {
    for seed in 0..6 {
        let mut rng = StdRng::seed_from_u64(seed);
        let points = random_box(&mut rng, 14, [0.0; 3], [10.0; 3]);
        assert_matches_delaunay(&points, &Domain::cube(10.0));
    }
}

#[test]
fn test_thin_slab_matches_delaunay() {
    // Nearly flat sets have their hull tetrahedra's circumcenters far outside the domain.
    for seed in 10..14 {
        let mut rng = StdRng::seed_from_u64(seed);
        let points = random_box(&mut rng, 12, [0.0, 0.0, 5.0], [10.0, 10.0, 5.2]);
        assert_matches_delaunay(&points, &Domain::cube(10.0));
    }
}

#[test]
fn test_sliver_near_hull_face_matches_delaunay() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut points = Vec::new();
    for x in [1.0, 9.0] {
        for y in [1.0, 9.0] {
            for z in [1.0, 9.0] {
                points.push([x, y, z].map(|c: f64| c + rng.gen_range(-0.2..0.2)));
            }
        }
    }
    // Just inside the bottom face, and just off the middle of a bottom edge.
    points.push([5.0, 5.0, 1.3]);
    points.push([5.0, 1.05, 1.1]);
    assert_matches_delaunay(&points, &Domain::cube(10.0));
}

#[test]
fn test_shadowed_segment_matches_delaunay() {
    let points = [[4.0, 5.0, 5.0], [6.0, 5.0, 5.0], [5.0, 5.001, 5.0], [5.0, 6.0, 6.0], [5.0, 6.0, 4.0]];
    assert_matches_delaunay(&points, &Domain::cube(10.0));
}

#[test]
fn test_edges_do_not_depend_on_scale() {
    let mut rng = StdRng::seed_from_u64(5);
    let unit = random_box(&mut rng, 30, [0.0; 3], [1.0; 3]);
    let reference = graph_edges(&unit, &Domain::cube(1.0), TessellationConfig::default());
    assert_eq!(reference, delaunay_edges(&unit));

    for scale in [1e-6, 1e-3, 1e4, 1e11] {
        let points: Vec<Point> = unit.iter().map(|p| p.map(|c| c * scale)).collect();
        let edges = graph_edges(&points, &Domain::cube(scale), TessellationConfig::default());
        assert_eq!(edges, reference, "scale {}", scale);
    }
}

#[test]
fn test_padding_and_grid_do_not_change_edges() {
    let mut rng = StdRng::seed_from_u64(17);
    let points = random_box(&mut rng, 40, [0.0; 3], [10.0; 3]);
    let domain = Domain::cube(10.0);
    let expected = delaunay_edges(&points);

    for (padding, grid_resolution) in [(0.0, None), (0.0, Some(1)), (10.0, Some(5)), (100.0, None)] {
        let config = TessellationConfig { padding, grid_resolution, ..Default::default() };
        assert_eq!(graph_edges(&points, &domain, config), expected, "padding {} grid {:?}", padding, grid_resolution);
    }
}

use std::io::Cursor;
use vorograph::io::{read_neighbor_list, write_neighbor_list, write_regions, InputRecord};
use vorograph::{
    resolve_region_vertices, Domain, Graph, Point, ReferencePoint, RegionVertex, TessellationBuilder,
    TessellationConfig,
};

const TETRAHEDRON: &str = r#"{
    "box_size": 100.0,
    "coordinates": [[40, 40, 40], [60, 40, 40], [50, 57.3, 40], [50, 45.8, 56.3]],
    "tasks": [0, 1, 2, 3]
}"#;

#[test]
fn test_tetrahedron_workflow() {
    let record = InputRecord::from_json(TETRAHEDRON).unwrap();
    let graph = TessellationBuilder::default()
        .build(&record.coordinates, &record.tasks, &record.domain())
        .unwrap();

    for cell in graph.cells() {
        assert_eq!(cell.neighbors().len(), 3, "Cell {} should touch all others", cell.id());
        assert_eq!(cell.owner(), cell.id() as u32);
    }
    assert_eq!(graph.edges().count(), 6);

    let mut buffer = Vec::new();
    write_neighbor_list(&graph, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(lines.len(), 4);
    for (i, line) in lines.iter().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(fields.len(), 5 + 3, "line {}: {:?}", i, line);
        assert_eq!(fields[0], i.to_string());
        assert_eq!(fields[1], i.to_string());
    }
    assert_eq!(lines[0].split_whitespace().nth(2), Some("40.0"));
    assert!(!text.ends_with('\n'));

    assert_eq!(read_neighbor_list(Cursor::new(text)).unwrap().edges().count(), 6);
}

#[test]
fn test_region_resolution_scenario() {
    let vertices = [RegionVertex::Finite(0), RegionVertex::Infinite, RegionVertex::Finite(1)];
    let positions = [[1.0, 1.0, 1.0], [2.0, 2.0, 2.0]];

    let resolved = resolve_region_vertices(&vertices, &positions, &Domain::cube(10.0));
    assert_eq!(resolved, vec![[1.0, 1.0, 1.0], [0.0, 0.0, 0.0], [2.0, 2.0, 2.0]]);
}

#[test]
fn test_tessellation_regions() {
    let record = InputRecord::from_json(TETRAHEDRON).unwrap();
    let domain = record.domain();
    let (_, tessellation) = TessellationBuilder::default()
        .build_with_tessellation(&record.coordinates, &record.tasks, &domain)
        .unwrap();

    for i in 0..4 {
        let region = tessellation.region(i).unwrap();
        // Four generators: every region is unbounded, the circumcenter is its one finite vertex.
        assert!(region.is_unbounded());
        assert_eq!(region.positions().len(), 1);
        assert_eq!(region.vertices().iter().filter(|v| **v == RegionVertex::Infinite).count(), 1);

        for p in region.resolve(&domain, ReferencePoint::FiniteVertexMean) {
            assert!(domain.contains(&p), "Region {} resolved outside the domain: {:?}", i, p);
        }
    }
    assert!(tessellation.region(4).is_none());
}

#[test]
fn test_write_regions() {
    let record = InputRecord::from_json(TETRAHEDRON).unwrap();
    let domain = record.domain();
    let (_, tessellation) = TessellationBuilder::default()
        .build_with_tessellation(&record.coordinates, &record.tasks, &domain)
        .unwrap();

    let mut buffer = Vec::new();
    write_regions(&tessellation, &domain, ReferencePoint::FiniteVertexSum, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    for (i, line) in lines.iter().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(fields[0], i.to_string());
        // id, then one finite vertex and one snapped vertex
        assert_eq!(fields.len(), 1 + 2 * 3);
    }
}

/// Two cells whose shared face lies hundreds of box lengths below the domain: B sits just
/// above the segment AC and shadows it, so A and C only meet around y = -500.
fn shadowed_segment() -> Vec<Point> {
    vec![
        [4.0, 5.0, 5.0],   // A
        [6.0, 5.0, 5.0],   // C
        [5.0, 5.001, 5.0], // B
        [5.0, 6.0, 6.0],   // D
        [5.0, 6.0, 4.0],   // E
    ]
}

fn sorted_edges(graph: &Graph) -> Vec<(usize, usize)> {
    let mut edges: Vec<_> = graph.edges().collect();
    edges.sort_unstable();
    edges
}

#[test]
fn test_far_ridge_is_found() {
    let points = shadowed_segment();
    let graph = TessellationBuilder::default()
        .build(&points, &[0, 1, 2, 3, 4], &Domain::cube(10.0))
        .unwrap();

    // (5, -600, 5) is closer to A and C than to any other point.
    let witness = [5.0, -600.0, 5.0];
    let d: Vec<f64> = points.iter().map(|p| (0..3).map(|a| (p[a] - witness[a]).powi(2)).sum()).collect();
    assert!(d[0] == d[1] && d[2..].iter().all(|&other| other > d[0]));

    assert!(graph.cell(0).unwrap().neighbors().contains(&1), "{}", graph);
    assert!(graph.cell(1).unwrap().neighbors().contains(&0), "{}", graph);
}

#[test]
fn test_padding_does_not_change_graph() {
    let points = shadowed_segment();
    let owners = [0; 5];
    let domain = Domain::cube(10.0);

    let loose = TessellationBuilder::default().build(&points, &owners, &domain).unwrap();
    for padding in [0.0, 0.5, 100.0] {
        let graph = TessellationBuilder::new(TessellationConfig { padding, ..Default::default() })
            .build(&points, &owners, &domain)
            .unwrap();
        assert_eq!(sorted_edges(&graph), sorted_edges(&loose), "padding {}", padding);
    }
}

// End-to-end creepage scenarios on hand-built boards
use creepage::{
    Board, CreepageGraph, CreepageRules, ItemShape, ParallelExecutor, Point,
};

fn copper_board() -> Board {
    let mut board = Board::new();
    board.add_layer("F.Cu", "SIGNAL");
    board.add_layer("Edge.Cuts", "BOARD_OUTLINE");
    board
}

fn rules(groove: f64) -> CreepageRules {
    CreepageRules {
        creepage_mm: 100.0,
        min_groove_width_mm: groove,
    }
}

#[test]
fn test_parallel_tracks_creepage_is_gap_width() {
    // Scenario: two parallel zero-width tracks 2.0 mm apart, different nets,
    // nothing in between
    let mut board = copper_board();
    board.add_item(
        1,
        "F.Cu",
        ItemShape::Segment {
            start: Point::new(0.0, 0.0),
            end: Point::new(10.0, 0.0),
            width: 0.0,
        },
    );
    board.add_item(
        2,
        "F.Cu",
        ItemShape::Segment {
            start: Point::new(0.0, 2.0),
            end: Point::new(10.0, 2.0),
            width: 0.0,
        },
    );

    let exec = ParallelExecutor::default();
    let mut graph = CreepageGraph::new();
    let a = graph.add_net_elements(&board, 1, "F.Cu").unwrap();
    let b = graph.add_net_elements(&board, 2, "F.Cu").unwrap();
    let added = graph
        .generate_paths(&board, &rules(0.0), "F.Cu", 5.0, &exec)
        .unwrap();
    assert!(added >= 1);

    let result = graph.solve(a, b);
    assert!((result.weight - 2.0).abs() < 1e-6);
}

#[test]
fn test_blocked_gap_has_no_direct_connection() {
    // Scenario: a circular pad and a point with a conductive bar spanning
    // the full gap in between. With zero groove width the direct path is
    // obstructed; the bar itself belongs to a net that is never added to
    // the graph, so the nets are unreachable.
    let mut board = copper_board();
    board.add_item(
        1,
        "F.Cu",
        ItemShape::Circle {
            center: Point::new(0.0, 0.0),
            radius: 0.5,
        },
    );
    board.add_item(
        2,
        "F.Cu",
        ItemShape::Circle {
            center: Point::new(10.0, 0.0),
            radius: 0.0,
        },
    );
    board.add_item(
        3,
        "F.Cu",
        ItemShape::Polygon {
            outline: vec![
                Point::new(4.0, -30.0),
                Point::new(4.5, -30.0),
                Point::new(4.5, 30.0),
                Point::new(4.0, 30.0),
            ],
        },
    );

    let exec = ParallelExecutor::default();
    let mut graph = CreepageGraph::new();
    let a = graph.add_net_elements(&board, 1, "F.Cu").unwrap();
    let b = graph.add_net_elements(&board, 2, "F.Cu").unwrap();
    graph
        .generate_paths(&board, &rules(0.0), "F.Cu", 100.0, &exec)
        .unwrap();
    assert!(graph.solve(a, b).weight.is_infinite());
}

#[test]
fn test_blocked_gap_routes_via_intervening_conductor() {
    // Same geometry, but the bar's net participates in the graph. The
    // direct pad-to-point path stays rejected; the query routes across the
    // bar instead, as the sum of the two air gaps.
    let mut board = copper_board();
    board.add_item(
        1,
        "F.Cu",
        ItemShape::Circle {
            center: Point::new(0.0, 0.0),
            radius: 0.5,
        },
    );
    board.add_item(
        2,
        "F.Cu",
        ItemShape::Circle {
            center: Point::new(10.0, 0.0),
            radius: 0.0,
        },
    );
    board.add_item(
        3,
        "F.Cu",
        ItemShape::Polygon {
            outline: vec![
                Point::new(4.0, -30.0),
                Point::new(4.5, -30.0),
                Point::new(4.5, 30.0),
                Point::new(4.0, 30.0),
            ],
        },
    );

    let exec = ParallelExecutor::default();
    let mut graph = CreepageGraph::new();
    let a = graph.add_net_elements(&board, 1, "F.Cu").unwrap();
    let b = graph.add_net_elements(&board, 2, "F.Cu").unwrap();
    graph.add_net_elements(&board, 3, "F.Cu").unwrap();
    graph
        .generate_paths(&board, &rules(0.0), "F.Cu", 100.0, &exec)
        .unwrap();

    let result = graph.solve(a, b);
    // Pad to bar: 4.0 - 0.5; bar to point: 10.0 - 4.5
    assert!((result.weight - 9.0).abs() < 1e-6);
    // At least two visible connections: no direct pad-to-point path exists
    let visible = result
        .connections
        .iter()
        .filter(|&&c| graph.connection(c).unwrap().path.show)
        .count();
    assert!(visible >= 2);
}

#[test]
fn test_duplicate_point_shapes_collapse() {
    // Scenario: two degenerate items at identical coordinates produce two
    // equivalent POINT shapes; duplicate removal keeps one
    let mut board = copper_board();
    board.add_item(
        1,
        "F.Cu",
        ItemShape::Circle {
            center: Point::new(3.0, 3.0),
            radius: 0.0,
        },
    );
    board.add_item(
        1,
        "F.Cu",
        ItemShape::Circle {
            center: Point::new(3.0, 3.0),
            radius: 0.0,
        },
    );

    let mut graph = CreepageGraph::new();
    graph.add_net_elements(&board, 1, "F.Cu").unwrap();
    assert_eq!(graph.live_shape_count(), 2);
    let removed = graph.remove_duplicated_shapes();
    assert_eq!(removed, 1);
    assert_eq!(graph.live_shape_count(), 1);
}

#[test]
fn test_arc_radial_and_endpoint_attachment() {
    // Scenario: arc spanning 10..170 degrees; a point at bearing 90 gets a
    // radial path, a point at bearing 200 connects to the nearer endpoint
    let mut board = copper_board();
    board.add_item(
        1,
        "F.Cu",
        ItemShape::Arc {
            center: Point::new(0.0, 0.0),
            radius: 2.0,
            start_angle: 10.0,
            end_angle: 170.0,
        },
    );
    board.add_item(
        2,
        "F.Cu",
        ItemShape::Circle {
            center: Point::new(0.0, 5.0),
            radius: 0.0,
        },
    );

    let exec = ParallelExecutor::default();
    let mut graph = CreepageGraph::new();
    let a = graph.add_net_elements(&board, 1, "F.Cu").unwrap();
    let b = graph.add_net_elements(&board, 2, "F.Cu").unwrap();
    graph
        .generate_paths(&board, &rules(0.0), "F.Cu", 100.0, &exec)
        .unwrap();
    let result = graph.solve(a, b);
    assert!((result.weight - 3.0).abs() < 1e-6);

    // Same arc, point at bearing 200 outside the span
    let mut board = copper_board();
    board.add_item(
        1,
        "F.Cu",
        ItemShape::Arc {
            center: Point::new(0.0, 0.0),
            radius: 2.0,
            start_angle: 10.0,
            end_angle: 170.0,
        },
    );
    let rad = 200.0f64.to_radians();
    let p = Point::new(5.0 * rad.cos(), 5.0 * rad.sin());
    board.add_item(
        2,
        "F.Cu",
        ItemShape::Circle {
            center: p,
            radius: 0.0,
        },
    );

    let mut graph = CreepageGraph::new();
    let a = graph.add_net_elements(&board, 1, "F.Cu").unwrap();
    let b = graph.add_net_elements(&board, 2, "F.Cu").unwrap();
    graph
        .generate_paths(&board, &rules(0.0), "F.Cu", 100.0, &exec)
        .unwrap();
    let result = graph.solve(a, b);

    let e170 = Point::new(2.0 * 170.0f64.to_radians().cos(), 2.0 * 170.0f64.to_radians().sin());
    assert!((result.weight - p.distance(e170)).abs() < 1e-6);
}

#[test]
fn test_same_net_items_generate_no_paths() {
    let mut board = copper_board();
    board.add_item(
        1,
        "F.Cu",
        ItemShape::Segment {
            start: Point::new(0.0, 0.0),
            end: Point::new(10.0, 0.0),
            width: 0.2,
        },
    );
    board.add_item(
        1,
        "F.Cu",
        ItemShape::Segment {
            start: Point::new(0.0, 1.0),
            end: Point::new(10.0, 1.0),
            width: 0.2,
        },
    );

    let exec = ParallelExecutor::default();
    let mut graph = CreepageGraph::new();
    graph.add_net_elements(&board, 1, "F.Cu").unwrap();
    let added = graph
        .generate_paths(&board, &rules(0.0), "F.Cu", 100.0, &exec)
        .unwrap();
    assert_eq!(added, 0);
}

#[test]
fn test_trim_removes_overweight_connections() {
    let mut board = copper_board();
    board.add_item(
        1,
        "F.Cu",
        ItemShape::Circle {
            center: Point::new(0.0, 0.0),
            radius: 0.0,
        },
    );
    board.add_item(
        2,
        "F.Cu",
        ItemShape::Circle {
            center: Point::new(3.0, 0.0),
            radius: 0.0,
        },
    );

    let exec = ParallelExecutor::default();
    let mut graph = CreepageGraph::new();
    let a = graph.add_net_elements(&board, 1, "F.Cu").unwrap();
    let b = graph.add_net_elements(&board, 2, "F.Cu").unwrap();
    graph
        .generate_paths(&board, &rules(0.0), "F.Cu", 100.0, &exec)
        .unwrap();
    assert!((graph.solve(a, b).weight - 3.0).abs() < 1e-9);

    let removed = graph.trim(1.0);
    assert!(removed >= 1);
    assert!(graph.solve(a, b).weight.is_infinite());
}

#[test]
fn test_drawables_serialize() {
    let mut board = copper_board();
    board.add_item(
        1,
        "F.Cu",
        ItemShape::Circle {
            center: Point::new(0.0, 0.0),
            radius: 0.5,
        },
    );
    board.add_item(
        2,
        "F.Cu",
        ItemShape::Circle {
            center: Point::new(4.0, 0.0),
            radius: 0.5,
        },
    );

    let exec = ParallelExecutor::default();
    let mut graph = CreepageGraph::new();
    graph.add_net_elements(&board, 1, "F.Cu").unwrap();
    graph.add_net_elements(&board, 2, "F.Cu").unwrap();
    graph
        .generate_paths(&board, &rules(0.0), "F.Cu", 100.0, &exec)
        .unwrap();

    let drawables = graph.path_drawables();
    assert!(!drawables.is_empty());
    let json = serde_json::to_string(&drawables).unwrap();
    assert!(json.contains("weight_mm"));
}

// Engine-level tests: parallel/sequential equivalence, board-edge
// obstruction, and conductor-to-edge path generation
use creepage::{
    Board, CreepageGraph, CreepageRules, ItemShape, ParallelExecutor, Point,
};

fn board_with_layers() -> Board {
    let mut board = Board::new();
    board.add_layer("F.Cu", "SIGNAL");
    board.add_layer("Edge.Cuts", "BOARD_OUTLINE");
    board
}

fn rules() -> CreepageRules {
    CreepageRules {
        creepage_mm: 100.0,
        min_groove_width_mm: 0.0,
    }
}

/// A row of pads on distinct nets, enough items to trip the parallel
/// threshold
fn pad_row_board(count: usize) -> Board {
    let mut board = board_with_layers();
    for i in 0..count {
        board.add_item(
            i as i32 + 1,
            "F.Cu",
            ItemShape::Circle {
                center: Point::new(i as f64 * 3.0, 0.0),
                radius: 0.4,
            },
        );
    }
    board
}

fn build_graph(board: &Board, nets: i32, exec: &ParallelExecutor) -> (CreepageGraph, Vec<creepage::NodeId>) {
    let mut graph = CreepageGraph::new();
    let mut roots = Vec::new();
    for net in 1..=nets {
        roots.push(graph.add_net_elements(board, net, "F.Cu").unwrap());
    }
    graph
        .generate_paths(board, &rules(), "F.Cu", 10.0, exec)
        .unwrap();
    (graph, roots)
}

#[test]
fn test_parallel_and_sequential_builds_agree() {
    let board = pad_row_board(12);
    let parallel = ParallelExecutor::new(1);
    let sequential = ParallelExecutor::new(usize::MAX);

    let (g1, roots1) = build_graph(&board, 12, &parallel);
    let (g2, roots2) = build_graph(&board, 12, &sequential);

    assert_eq!(g1.live_connection_count(), g2.live_connection_count());

    let w1 = g1.solve(roots1[0], roots1[3]).weight;
    let w2 = g2.solve(roots2[0], roots2[3]).weight;
    assert!((w1 - w2).abs() < 1e-9);
    assert!(w1.is_finite());
}

#[test]
fn test_solver_is_deterministic() {
    let board = pad_row_board(6);
    let exec = ParallelExecutor::default();
    let (graph, roots) = build_graph(&board, 6, &exec);

    let first = graph.solve(roots[0], roots[5]);
    for _ in 0..3 {
        let again = graph.solve(roots[0], roots[5]);
        assert_eq!(first.connections, again.connections);
        assert!((first.weight - again.weight).abs() < 1e-12);
    }
}

#[test]
fn test_board_edge_slot_obstructs() {
    // A routed slot in the board outline between two pads. The edge items
    // obstruct by their presence on the board; they do not need to be part
    // of the graph.
    let mut board = board_with_layers();
    board.add_item(
        1,
        "F.Cu",
        ItemShape::Circle {
            center: Point::new(0.0, 0.0),
            radius: 0.4,
        },
    );
    board.add_item(
        2,
        "F.Cu",
        ItemShape::Circle {
            center: Point::new(6.0, 0.0),
            radius: 0.4,
        },
    );
    board.add_item(
        0,
        "Edge.Cuts",
        ItemShape::Polygon {
            outline: vec![
                Point::new(2.8, -50.0),
                Point::new(3.2, -50.0),
                Point::new(3.2, 50.0),
                Point::new(2.8, 50.0),
            ],
        },
    );

    let exec = ParallelExecutor::default();
    let mut graph = CreepageGraph::new();
    let a = graph.add_net_elements(&board, 1, "F.Cu").unwrap();
    let b = graph.add_net_elements(&board, 2, "F.Cu").unwrap();
    graph
        .generate_paths(&board, &rules(), "F.Cu", 100.0, &exec)
        .unwrap();
    assert!(graph.solve(a, b).weight.is_infinite());

    // The same board without the slot yields the tangent distance
    let mut board = board_with_layers();
    board.add_item(
        1,
        "F.Cu",
        ItemShape::Circle {
            center: Point::new(0.0, 0.0),
            radius: 0.4,
        },
    );
    board.add_item(
        2,
        "F.Cu",
        ItemShape::Circle {
            center: Point::new(6.0, 0.0),
            radius: 0.4,
        },
    );
    let mut graph = CreepageGraph::new();
    let a = graph.add_net_elements(&board, 1, "F.Cu").unwrap();
    let b = graph.add_net_elements(&board, 2, "F.Cu").unwrap();
    graph
        .generate_paths(&board, &rules(), "F.Cu", 100.0, &exec)
        .unwrap();
    let result = graph.solve(a, b);
    assert!(result.weight.is_finite());
    assert!(result.weight > 0.0);
}

#[test]
fn test_conductor_to_edge_paths_generate() {
    // Conductive-vs-edge pairs are searched even though edge shapes carry
    // no net of their own
    let mut board = board_with_layers();
    board.add_item(
        1,
        "F.Cu",
        ItemShape::Circle {
            center: Point::new(0.0, 0.0),
            radius: 0.4,
        },
    );
    board.add_item(
        0,
        "Edge.Cuts",
        ItemShape::Segment {
            start: Point::new(-3.0, -2.0),
            end: Point::new(3.0, -2.0),
            width: 0.0,
        },
    );

    let exec = ParallelExecutor::default();
    let mut graph = CreepageGraph::new();
    graph.add_net_elements(&board, 1, "F.Cu").unwrap();
    graph.add_net_elements(&board, 0, "Edge.Cuts").unwrap();
    let added = graph
        .generate_paths(&board, &rules(), "F.Cu", 100.0, &exec)
        .unwrap();
    assert!(added >= 1);

    // The pad-to-edge gap is 2.0 - 0.4
    let drawables = graph.path_drawables();
    assert!(drawables
        .iter()
        .any(|d| (d.weight_mm - 1.6).abs() < 1e-6));
}

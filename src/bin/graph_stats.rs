//! CLI tool for inspecting creepage graph construction without a caller
//!
//! Builds a small demonstration board (two pads, a track, and a board
//! outline), runs the full engine, and prints graph statistics and the
//! resulting creepage distance.
//!
//! Usage:
//!   cargo run --release --bin graph_stats -- [options]
//!
//! Options:
//!   --creepage <mm>   Creepage cutoff (default 20.0)
//!   --groove <mm>     Minimum groove width (default 0.25)
//!   --verbose         Print every visible connection

use std::env;

use creepage::{
    Board, CreepageGraph, CreepageRules, ItemShape, ParallelExecutor, Point,
};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut rules = CreepageRules {
        creepage_mm: 20.0,
        min_groove_width_mm: 0.25,
    };
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--creepage" => {
                i += 1;
                if i < args.len() {
                    rules.creepage_mm = args[i].parse()?;
                }
            }
            "--groove" => {
                i += 1;
                if i < args.len() {
                    rules.min_groove_width_mm = args[i].parse()?;
                }
            }
            "--verbose" => verbose = true,
            other => {
                eprintln!("Unknown option: {other}");
                eprintln!("Options: --creepage <mm> --groove <mm> --verbose");
                return Ok(());
            }
        }
        i += 1;
    }

    let mut board = Board::new();
    board.add_layer("F.Cu", "SIGNAL");
    board.add_layer("Edge.Cuts", "BOARD_OUTLINE");

    // Two pads on different nets with a grounded track between them
    board.add_item(
        1,
        "F.Cu",
        ItemShape::Circle {
            center: Point::new(0.0, 0.0),
            radius: 0.8,
        },
    );
    board.add_item(
        2,
        "F.Cu",
        ItemShape::Circle {
            center: Point::new(12.0, 0.0),
            radius: 0.8,
        },
    );
    board.add_item(
        3,
        "F.Cu",
        ItemShape::Segment {
            start: Point::new(6.0, -4.0),
            end: Point::new(6.0, 4.0),
            width: 0.3,
        },
    );
    // Board outline
    board.add_item(
        0,
        "Edge.Cuts",
        ItemShape::Polygon {
            outline: vec![
                Point::new(-5.0, -8.0),
                Point::new(17.0, -8.0),
                Point::new(17.0, 8.0),
                Point::new(-5.0, 8.0),
            ],
        },
    );

    let executor = ParallelExecutor::default();
    let mut graph = CreepageGraph::new();
    let net_a = graph.add_net_elements(&board, 1, "F.Cu")?;
    let net_b = graph.add_net_elements(&board, 2, "F.Cu")?;
    graph.add_net_elements(&board, 3, "F.Cu")?;
    graph.remove_duplicated_shapes();
    graph.generate_paths(&board, &rules, "F.Cu", rules.creepage_mm, &executor)?;
    graph.trim(rules.creepage_mm);

    println!("shapes:      {}", graph.live_shape_count());
    println!("nodes:       {}", graph.live_node_count());
    println!("connections: {}", graph.live_connection_count());

    let result = graph.solve(net_a, net_b);
    if result.weight.is_infinite() {
        println!("creepage:    unreachable");
    } else {
        println!(
            "creepage:    {:.4} mm over {} connections",
            result.weight,
            result.connections.len()
        );
    }

    if verbose {
        for d in graph.path_drawables() {
            println!(
                "  ({:.3}, {:.3}) -> ({:.3}, {:.3})  {:.4} mm{}",
                d.start.x,
                d.start.y,
                d.end.x,
                d.end.y,
                d.weight_mm,
                if d.straight { "  [straight]" } else { "" }
            );
        }
    }

    Ok(())
}

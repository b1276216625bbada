//! Simple routing example: build a small board in code, route its one
//! unconnected net, and print the resulting patch as JSON.
//! Run with: cargo run --example route_simple

use boardpatch::geometry::schema::*;
use boardpatch::prelude::*;

fn terminal(id: &str, reference: &str, x: f64, y: f64, net: u32) -> Footprint {
    Footprint {
        id: id.to_string(),
        reference: reference.to_string(),
        value: String::new(),
        layer: "F.Cu".to_string(),
        position: Point::new(x, y),
        rotation: 0.0,
        pads: vec![Pad {
            number: "1".to_string(),
            position: Point::new(x, y),
            size: Size {
                width: 1.0,
                height: 1.0,
            },
            drill: None,
            net: Some(net),
        }],
    }
}

fn main() -> Result<(), EngineError> {
    let board = GeometrySnapshot {
        artifact_id: "example-board".to_string(),
        version: 1,
        outline: vec![
            Point::new(-10.0, -10.0),
            Point::new(20.0, -10.0),
            Point::new(20.0, 10.0),
            Point::new(-10.0, 10.0),
        ],
        layers: vec![Layer {
            name: "F.Cu".to_string(),
            kind: LayerKind::Signal,
        }],
        setup: BoardSetup::default(),
        nets: vec![Net {
            id: 1,
            name: "N1".to_string(),
        }],
        footprints: vec![
            terminal("fp-a", "J1", 0.0, 0.0, 1),
            terminal("fp-b", "J2", 10.0, 0.0, 1),
            // A footprint in the way, forcing the route off the x axis.
            Footprint {
                id: "fp-u1".to_string(),
                reference: "U1".to_string(),
                value: String::new(),
                layer: "F.Cu".to_string(),
                position: Point::new(5.0, 0.0),
                rotation: 0.0,
                pads: vec![Pad {
                    number: "1".to_string(),
                    position: Point::new(5.0, 1.7),
                    size: Size {
                        width: 1.0,
                        height: 1.0,
                    },
                    drill: None,
                    net: None,
                }],
            },
        ],
        tracks: vec![],
        vias: vec![],
    };

    let options = EngineOptions::default();
    let report = BoardPatchCore::route_unconnected_nets(&board, &options, None)?;

    println!("Routed {} net(s)", report.stats.routed);
    for patch in &report.patches {
        println!("{}", serde_json::to_string_pretty(patch).unwrap());
    }

    if report.patches.is_empty() {
        println!("No suggestions produced.");
    }
    Ok(())
}

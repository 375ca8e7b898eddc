#![forbid(unsafe_code)]

//! Headless force-directed graph layout engine.
//!
//! `selkie` runs a d3-force style simulation over a node/edge descriptor:
//! centering, pairwise repulsion, and edge springs, with optional cluster
//! and radial variants, damped Euler integration inside a padded region,
//! and a geometric cooling schedule. It is runtime-agnostic: callers drive
//! the step loop themselves (or call [`layout`] to run to rest) and draw
//! the resulting positions however they like.

pub mod error;
pub mod graph;
pub mod options;
mod rng;
pub mod sim;

pub use error::{Error, Result};
pub use graph::{Bounds, Edge, Graph, LayoutResult, Node, Point};
pub use options::{InitialPlacement, Mode, SimulationOptions};
pub use sim::{Outcome, Phase, Simulation};

/// One-shot layout entry point: build a run, step it to rest, return the
/// settled positions.
pub fn layout(graph: &Graph, bounds: Bounds, options: SimulationOptions) -> Result<LayoutResult> {
    let mut sim = Simulation::new(graph, bounds, options)?;
    sim.run();
    Ok(LayoutResult {
        positions: sim.positions(),
    })
}

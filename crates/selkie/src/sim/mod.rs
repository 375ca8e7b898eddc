//! The simulation driver: per-node state, force scheduling, integration,
//! and the interactive hooks.
//!
//! A [`Simulation`] owns one run over an immutable node set. The caller's
//! step loop is the schedule (nothing is spawned, no timers): each
//! [`Simulation::step`] call performs one accumulate/integrate/cool round
//! and reports the phase, so embedders can interleave stepping with
//! whatever frame cadence they like, or just call [`Simulation::run`].

mod forces;

use std::collections::BTreeMap;

use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::Result;
use crate::graph::{Bounds, Graph, Point};
use crate::options::{InitialPlacement, Mode, SimulationOptions};
use crate::rng::XorShift64Star;

/// Where the driver currently is. `Idle` always carries an [`Outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Running,
    Paused,
    Idle,
}

/// Why a run settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The temperature fell below `alpha_min`.
    Converged,
    /// The configured iteration cap was reached first.
    Capped,
}

pub(crate) struct SimNode {
    pub(crate) id: String,
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) vx: f64,
    pub(crate) vy: f64,
    pub(crate) fx: f64,
    pub(crate) fy: f64,
    pub(crate) fixed: bool,
    pub(crate) cluster: Option<usize>,
}

pub(crate) struct SimEdge {
    pub(crate) a: usize,
    pub(crate) b: usize,
}

/// Radial-mode geometry, resolved once at construction.
pub(crate) struct RadialTargets {
    pub(crate) hub: usize,
    pub(crate) adjacent: Vec<bool>,
    pub(crate) inner: f64,
    pub(crate) outer: f64,
}

pub struct Simulation {
    bounds: Bounds,
    options: SimulationOptions,
    mode: Mode,
    nodes: Vec<SimNode>,
    edges: Vec<SimEdge>,
    index: FxHashMap<String, usize>,
    anchors: Vec<Point>,
    radial: Option<RadialTargets>,
    skipped_edges: usize,
    alpha: f64,
    steps: usize,
    phase: Phase,
    outcome: Option<Outcome>,
}

impl Simulation {
    /// Builds a run from a graph descriptor: validates the options, interns
    /// node ids, resolves edges, places nodes, and precomputes the cluster
    /// and radial geometry.
    ///
    /// Edges with an unknown endpoint and self-loops are dropped here, not
    /// reported as errors. The node set of a run never changes, so resolving
    /// once is equivalent to looking ids up on every step.
    pub fn new(graph: &Graph, bounds: Bounds, options: SimulationOptions) -> Result<Self> {
        options.validate(&bounds)?;

        let mut index: FxHashMap<String, usize> = FxHashMap::default();
        let mut clusters: IndexSet<String> = IndexSet::new();
        let mut nodes: Vec<SimNode> = Vec::with_capacity(graph.nodes.len());
        let mut explicit: Vec<Option<(f64, f64)>> = Vec::with_capacity(graph.nodes.len());
        for n in &graph.nodes {
            if index.contains_key(n.id.as_str()) {
                trace!(id = %n.id, "duplicate node id ignored");
                continue;
            }
            let cluster = n
                .cluster
                .as_ref()
                .map(|tag| clusters.insert_full(tag.clone()).0);
            index.insert(n.id.clone(), nodes.len());
            explicit.push(match (n.x, n.y) {
                (Some(x), Some(y)) => Some((x, y)),
                _ => None,
            });
            nodes.push(SimNode {
                id: n.id.clone(),
                x: 0.0,
                y: 0.0,
                vx: 0.0,
                vy: 0.0,
                fx: 0.0,
                fy: 0.0,
                fixed: false,
                cluster,
            });
        }

        place_nodes(&mut nodes, &explicit, &bounds, &options);

        let mut edges: Vec<SimEdge> = Vec::with_capacity(graph.edges.len());
        let mut skipped_edges = 0usize;
        for e in &graph.edges {
            match (index.get(e.source.as_str()), index.get(e.target.as_str())) {
                (Some(&a), Some(&b)) if a != b => edges.push(SimEdge { a, b }),
                _ => {
                    skipped_edges += 1;
                    trace!(source = %e.source, target = %e.target, "edge dropped: unresolved endpoint or self-loop");
                }
            }
        }

        let radial = pick_hub(nodes.len(), &edges).map(|hub| {
            let mut adjacent = vec![false; nodes.len()];
            for e in &edges {
                if e.a == hub {
                    adjacent[e.b] = true;
                }
                if e.b == hub {
                    adjacent[e.a] = true;
                }
            }
            RadialTargets {
                hub,
                adjacent,
                inner: options.radial_inner_radius_for(&bounds),
                outer: options.radial_outer_radius_for(&bounds),
            }
        });

        let center = bounds.center();
        let anchor_radius = options.cluster_radius_for(&bounds);
        let anchors: Vec<Point> = (0..clusters.len())
            .map(|k| {
                let angle = 2.0 * std::f64::consts::PI * (k as f64) / (clusters.len() as f64);
                Point {
                    x: center.x + anchor_radius * angle.cos(),
                    y: center.y + anchor_radius * angle.sin(),
                }
            })
            .collect();

        let mode = options.mode;
        let mut sim = Self {
            bounds,
            options,
            mode,
            nodes,
            edges,
            index,
            anchors,
            radial,
            skipped_edges,
            alpha: 1.0,
            steps: 0,
            phase: Phase::Running,
            outcome: None,
        };
        debug!(
            nodes = sim.nodes.len(),
            edges = sim.edges.len(),
            skipped = sim.skipped_edges,
            mode = ?sim.mode,
            "simulation ready"
        );
        if sim.nodes.is_empty() {
            sim.settle(Outcome::Converged);
        }
        Ok(sim)
    }

    /// One driver round: accumulate forces, integrate, cool, then check the
    /// termination policies. A no-op unless the run is `Running`.
    ///
    /// The temperature check wins over the iteration cap when a single step
    /// satisfies both.
    pub fn step(&mut self) -> Phase {
        if self.phase != Phase::Running {
            return self.phase;
        }
        if self.nodes.is_empty() {
            self.settle(Outcome::Converged);
            return self.phase;
        }
        self.accumulate();
        self.integrate();
        self.alpha *= 1.0 - self.options.alpha_decay;
        self.steps += 1;
        if self.alpha < self.options.alpha_min {
            self.settle(Outcome::Converged);
        } else if self.options.iteration_cap.is_some_and(|cap| self.steps >= cap) {
            self.settle(Outcome::Capped);
        }
        self.phase
    }

    /// Steps until the run leaves `Running` (settles, or was already paused).
    pub fn run(&mut self) -> &mut Self {
        while self.phase == Phase::Running {
            self.step();
        }
        self
    }

    /// Freezes a running run; positions stay put until `resume` or `reheat`.
    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
        }
    }

    /// Continues a paused run at its current temperature. Never resets alpha.
    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
        }
    }

    /// Restarts the annealing schedule from any phase: full temperature,
    /// cleared outcome, fresh step budget. Positions are kept, so the run
    /// re-settles from wherever the nodes currently are. This is the only
    /// operation that raises the temperature.
    pub fn reheat(&mut self) {
        self.alpha = 1.0;
        self.steps = 0;
        self.outcome = None;
        self.phase = Phase::Running;
        debug!("simulation reheated");
    }

    /// Switches the active force variant mid-run. Cluster anchors and the
    /// radial hub were resolved at construction, so this only redirects the
    /// accumulator from the next step on.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Fixes a node under the pointer: forces stop moving it, but it keeps
    /// repelling others and anchoring its springs. Returns `false` for an
    /// unknown id.
    pub fn begin_drag(&mut self, id: &str) -> bool {
        match self.index.get(id) {
            Some(&i) => {
                self.nodes[i].fixed = true;
                true
            }
            None => false,
        }
    }

    /// Moves a fixed node directly. The position is written as given, even
    /// outside the padded region; the clamp re-applies on the first
    /// integration after release. Returns `false` when the id is unknown or
    /// the node is not currently fixed.
    pub fn update_drag_position(&mut self, id: &str, x: f64, y: f64) -> bool {
        match self.index.get(id) {
            Some(&i) if self.nodes[i].fixed => {
                self.nodes[i].x = x;
                self.nodes[i].y = y;
                true
            }
            _ => false,
        }
    }

    /// Releases a fixed node back to the forces. Its velocity is zeroed so
    /// the release does not inherit a stale impulse. Returns `false` when the
    /// id is unknown or the node was not fixed.
    pub fn end_drag(&mut self, id: &str) -> bool {
        match self.index.get(id) {
            Some(&i) if self.nodes[i].fixed => {
                let n = &mut self.nodes[i];
                n.fixed = false;
                n.vx = 0.0;
                n.vy = 0.0;
                true
            }
            _ => false,
        }
    }

    /// Current position of every node, keyed by id.
    pub fn positions(&self) -> BTreeMap<String, Point> {
        self.nodes
            .iter()
            .map(|n| (n.id.clone(), Point { x: n.x, y: n.y }))
            .collect()
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.index
            .get(id)
            .map(|&i| Point { x: self.nodes[i].x, y: self.nodes[i].y })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Steps executed since construction or the last `reheat`.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Edges dropped at construction (unresolved endpoint or self-loop).
    pub fn skipped_edges(&self) -> usize {
        self.skipped_edges
    }

    fn accumulate(&mut self) {
        for n in &mut self.nodes {
            n.fx = 0.0;
            n.fy = 0.0;
        }
        let alpha = self.alpha;
        let center = self.bounds.center();
        forces::apply_centering(&mut self.nodes, center, self.options.center_strength, alpha);
        forces::apply_repulsion(
            &mut self.nodes,
            self.options.repulsion_strength,
            self.options.cluster_repulsion_scale,
            alpha,
        );
        forces::apply_springs(
            &mut self.nodes,
            &self.edges,
            self.options.rest_length,
            self.options.link_strength,
            alpha,
        );
        match self.mode {
            Mode::Default => {}
            Mode::Cluster => forces::apply_cluster_anchors(
                &mut self.nodes,
                &self.anchors,
                self.options.cluster_pull,
                alpha,
            ),
            Mode::Radial => {
                if let Some(radial) = &self.radial {
                    forces::apply_radial(
                        &mut self.nodes,
                        radial,
                        self.options.radial_pull,
                        self.options.hub_pull,
                        center,
                        alpha,
                    );
                }
            }
        }
    }

    /// Damped Euler move with a hard clamp to the padded region. Fixed nodes
    /// are skipped entirely; their accumulated scratch is discarded.
    fn integrate(&mut self) {
        let damping = self.options.damping;
        let min_x = self.options.padding;
        let max_x = self.bounds.width - self.options.padding;
        let min_y = self.options.padding;
        let max_y = self.bounds.height - self.options.padding;
        for n in &mut self.nodes {
            if n.fixed {
                continue;
            }
            n.vx = (n.vx + n.fx) * damping;
            n.vy = (n.vy + n.fy) * damping;
            n.x = (n.x + n.vx).clamp(min_x, max_x);
            n.y = (n.y + n.vy).clamp(min_y, max_y);
        }
    }

    fn settle(&mut self, outcome: Outcome) {
        self.phase = Phase::Idle;
        self.outcome = Some(outcome);
        debug!(
            outcome = ?outcome,
            steps = self.steps,
            alpha = self.alpha,
            "simulation settled"
        );
    }
}

fn place_nodes(
    nodes: &mut [SimNode],
    explicit: &[Option<(f64, f64)>],
    bounds: &Bounds,
    options: &SimulationOptions,
) {
    let count = nodes.len();
    let center = bounds.center();
    let ring_radius = bounds.min_side() / 4.0;
    let mut rng = XorShift64Star::new(options.random_seed);
    for (i, n) in nodes.iter_mut().enumerate() {
        if let Some((x, y)) = explicit[i] {
            n.x = x;
            n.y = y;
            continue;
        }
        match options.placement {
            InitialPlacement::Circle => {
                let angle = 2.0 * std::f64::consts::PI * (i as f64) / (count as f64);
                n.x = center.x + ring_radius * angle.cos();
                n.y = center.y + ring_radius * angle.sin();
            }
            InitialPlacement::Random => {
                n.x = rng.next_f64_range(options.padding, bounds.width - options.padding);
                n.y = rng.next_f64_range(options.padding, bounds.height - options.padding);
            }
        }
    }
}

/// Highest total degree over the resolved edges; ties keep the node that was
/// inserted first. `None` only for an empty node set.
fn pick_hub(node_count: usize, edges: &[SimEdge]) -> Option<usize> {
    if node_count == 0 {
        return None;
    }
    let mut degree = vec![0usize; node_count];
    for e in edges {
        degree[e.a] += 1;
        degree[e.b] += 1;
    }
    let mut best = 0;
    for (i, &d) in degree.iter().enumerate() {
        if d > degree[best] {
            best = i;
        }
    }
    Some(best)
}

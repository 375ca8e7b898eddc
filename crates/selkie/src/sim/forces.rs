//! Force accumulation passes. Each pass adds its contribution to the
//! per-node scratch vector; the integrator consumes the sum.
//!
//! Every magnitude is scaled by the current temperature `alpha`, so the
//! whole field fades together as the run cools.

use crate::graph::Point;

use super::{RadialTargets, SimEdge, SimNode};

/// Unit vector from `(ax, ay)` toward `(bx, by)` plus the clamped center
/// distance. Distances under 1 are treated as 1 so the inverse-square and
/// spring terms stay bounded; exactly coincident points separate along +x,
/// which keeps runs deterministic without consulting a generator.
fn separation(ax: f64, ay: f64, bx: f64, by: f64) -> (f64, f64, f64) {
    let dx = bx - ax;
    let dy = by - ay;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist == 0.0 {
        return (1.0, 0.0, 1.0);
    }
    (dx / dist, dy / dist, dist.max(1.0))
}

/// Weak pull of every node toward the region center.
pub(crate) fn apply_centering(nodes: &mut [SimNode], center: Point, strength: f64, alpha: f64) {
    for n in nodes {
        n.fx += strength * alpha * (center.x - n.x);
        n.fy += strength * alpha * (center.y - n.y);
    }
}

/// Inverse-square repulsion between every unordered node pair. Pairs that
/// share a cluster tag are scaled by `same_cluster_scale` so tagged groups
/// can pack tighter than strangers.
pub(crate) fn apply_repulsion(
    nodes: &mut [SimNode],
    strength: f64,
    same_cluster_scale: f64,
    alpha: f64,
) {
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let (ux, uy, dist) = separation(nodes[i].x, nodes[i].y, nodes[j].x, nodes[j].y);
            let mut magnitude = strength * alpha / (dist * dist);
            if let (Some(a), Some(b)) = (nodes[i].cluster, nodes[j].cluster) {
                if a == b {
                    magnitude *= same_cluster_scale;
                }
            }
            nodes[i].fx -= magnitude * ux;
            nodes[i].fy -= magnitude * uy;
            nodes[j].fx += magnitude * ux;
            nodes[j].fy += magnitude * uy;
        }
    }
}

/// Spring attraction along every resolved edge: stretched edges pull the
/// endpoints together, compressed edges push them apart.
pub(crate) fn apply_springs(
    nodes: &mut [SimNode],
    edges: &[SimEdge],
    rest_length: f64,
    strength: f64,
    alpha: f64,
) {
    for e in edges {
        let (ux, uy, dist) = separation(nodes[e.a].x, nodes[e.a].y, nodes[e.b].x, nodes[e.b].y);
        let magnitude = (dist - rest_length) * strength * alpha;
        nodes[e.a].fx += magnitude * ux;
        nodes[e.a].fy += magnitude * uy;
        nodes[e.b].fx -= magnitude * ux;
        nodes[e.b].fy -= magnitude * uy;
    }
}

/// Cluster mode: tagged nodes drift toward their tag's ring anchor.
/// Untagged nodes only feel the shared base forces.
pub(crate) fn apply_cluster_anchors(
    nodes: &mut [SimNode],
    anchors: &[Point],
    pull: f64,
    alpha: f64,
) {
    for n in nodes {
        if let Some(tag) = n.cluster {
            let anchor = anchors[tag];
            n.fx += pull * alpha * (anchor.x - n.x);
            n.fy += pull * alpha * (anchor.y - n.y);
        }
    }
}

/// Radial mode: non-hub nodes are nudged onto their target ring around the
/// hub, and the hub itself is held near the region center.
pub(crate) fn apply_radial(
    nodes: &mut [SimNode],
    targets: &RadialTargets,
    pull: f64,
    hub_pull: f64,
    center: Point,
    alpha: f64,
) {
    let (hx, hy) = (nodes[targets.hub].x, nodes[targets.hub].y);
    for (idx, n) in nodes.iter_mut().enumerate() {
        if idx == targets.hub {
            n.fx += hub_pull * alpha * (center.x - n.x);
            n.fy += hub_pull * alpha * (center.y - n.y);
            continue;
        }
        let target = if targets.adjacent[idx] {
            targets.inner
        } else {
            targets.outer
        };
        let (ux, uy, dist) = separation(hx, hy, n.x, n.y);
        let magnitude = (dist - target) * pull * alpha;
        n.fx -= magnitude * ux;
        n.fy -= magnitude * uy;
    }
}

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::Bounds;

/// Which force variant the accumulator runs on top of the shared base set
/// (centering, pairwise repulsion, edge springs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Default,
    Cluster,
    Radial,
}

/// How nodes are positioned before the first step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialPlacement {
    /// Evenly spaced on a ring around the region center. Seed-free and reproducible.
    #[default]
    Circle,
    /// Uniform draws inside the padded region, driven by `random_seed`.
    Random,
}

/// Tuning constants for one simulation run. Every term in the force and
/// integration laws is exposed here; the defaults are mid-range values that
/// settle a few hundred nodes without tweaking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationOptions {
    /// Pull toward the region center, per unit distance.
    pub center_strength: f64,
    /// Numerator of the inverse-square pair repulsion.
    pub repulsion_strength: f64,
    /// Spring constant of the edge attraction.
    pub link_strength: f64,
    /// Rest length of every edge spring.
    pub rest_length: f64,
    /// Velocity kept per step; the rest bleeds off as friction.
    pub damping: f64,
    /// Fraction of the temperature lost per step (geometric schedule).
    pub alpha_decay: f64,
    /// Temperature below which the run settles as converged.
    pub alpha_min: f64,
    pub mode: Mode,
    /// Inset of the clamp region from the bounds edge.
    pub padding: f64,
    /// Scale applied to repulsion between nodes sharing a cluster tag.
    pub cluster_repulsion_scale: f64,
    /// Pull toward the per-tag anchor in cluster mode.
    pub cluster_pull: f64,
    /// Radius of the anchor ring in cluster mode; `None` derives min(w,h)/4.
    pub cluster_radius: Option<f64>,
    /// Pull toward the target ring in radial mode.
    pub radial_pull: f64,
    /// Pull of the hub toward the region center in radial mode.
    pub hub_pull: f64,
    /// Target radius for hub-adjacent nodes; `None` derives min(w,h)/6.
    pub radial_inner_radius: Option<f64>,
    /// Target radius for the remaining nodes; `None` derives min(w,h)/3.
    pub radial_outer_radius: Option<f64>,
    /// Hard step limit; `None` runs until the temperature threshold alone.
    pub iteration_cap: Option<usize>,
    pub placement: InitialPlacement,
    /// Seed for `placement: random`. Same seed, same run.
    pub random_seed: u64,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            center_strength: 0.005,
            repulsion_strength: 1000.0,
            link_strength: 0.05,
            rest_length: 80.0,
            damping: 0.6,
            alpha_decay: 0.02,
            alpha_min: 0.001,
            mode: Mode::Default,
            padding: 50.0,
            cluster_repulsion_scale: 0.8,
            cluster_pull: 0.05,
            cluster_radius: None,
            radial_pull: 0.05,
            hub_pull: 0.1,
            radial_inner_radius: None,
            radial_outer_radius: None,
            iteration_cap: None,
            placement: InitialPlacement::Circle,
            random_seed: 0,
        }
    }
}

impl SimulationOptions {
    /// Checks every option against its legal range. Runs refuse to start on
    /// bad tuning values instead of clamping them behind the caller's back.
    pub fn validate(&self, bounds: &Bounds) -> Result<()> {
        unit_interval("damping", self.damping)?;
        unit_interval("alphaDecay", self.alpha_decay)?;
        unit_interval("alphaMin", self.alpha_min)?;
        nonnegative("centerStrength", self.center_strength)?;
        nonnegative("repulsionStrength", self.repulsion_strength)?;
        nonnegative("linkStrength", self.link_strength)?;
        nonnegative("clusterPull", self.cluster_pull)?;
        nonnegative("radialPull", self.radial_pull)?;
        nonnegative("hubPull", self.hub_pull)?;
        nonnegative("clusterRepulsionScale", self.cluster_repulsion_scale)?;
        nonnegative("padding", self.padding)?;
        positive("restLength", self.rest_length)?;
        if let Some(r) = self.cluster_radius {
            positive("clusterRadius", r)?;
        }
        if let Some(r) = self.radial_inner_radius {
            positive("radialInnerRadius", r)?;
        }
        if let Some(r) = self.radial_outer_radius {
            positive("radialOuterRadius", r)?;
        }
        if self.iteration_cap == Some(0) {
            return Err(Error::InvalidOption {
                option: "iterationCap",
                message: "must be at least 1".to_string(),
            });
        }
        let inner_w = bounds.width - 2.0 * self.padding;
        let inner_h = bounds.height - 2.0 * self.padding;
        if !(inner_w > 0.0 && inner_h > 0.0) {
            return Err(Error::DegenerateBounds {
                width: bounds.width,
                height: bounds.height,
                padding: self.padding,
            });
        }
        Ok(())
    }

    pub(crate) fn cluster_radius_for(&self, bounds: &Bounds) -> f64 {
        self.cluster_radius.unwrap_or_else(|| bounds.min_side() / 4.0)
    }

    pub(crate) fn radial_inner_radius_for(&self, bounds: &Bounds) -> f64 {
        self.radial_inner_radius
            .unwrap_or_else(|| bounds.min_side() / 6.0)
    }

    pub(crate) fn radial_outer_radius_for(&self, bounds: &Bounds) -> f64 {
        self.radial_outer_radius
            .unwrap_or_else(|| bounds.min_side() / 3.0)
    }
}

fn unit_interval(option: &'static str, v: f64) -> Result<()> {
    if v > 0.0 && v < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidOption {
            option,
            message: format!("must be within (0, 1), got {v}"),
        })
    }
}

fn nonnegative(option: &'static str, v: f64) -> Result<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidOption {
            option,
            message: format!("must be a finite number >= 0, got {v}"),
        })
    }
}

fn positive(option: &'static str, v: f64) -> Result<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidOption {
            option,
            message: format!("must be a finite number > 0, got {v}"),
        })
    }
}

mod forces;
mod quadtree;

use eframe::egui::Vec2;
use tracing::{debug, trace};

use forces::{accumulate_charge_for_node, pull_towards};
use quadtree::QuadNode;

/// Tuning for the cooling force layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Multiplier applied to alpha at the start of every tick.
    pub alpha_decay: f32,
    /// Alpha below which the layout stops.
    pub alpha_min: f32,
    /// Fraction of the implicit velocity kept per tick.
    pub friction: f32,
    /// Attraction toward the canvas center, scaled by alpha.
    pub gravity: f32,
    pub theta: f32,
    /// Base pull toward the active layout anchor, scaled by alpha.
    pub target_strength: f32,
    /// Extra pull applied toward per-category anchors.
    pub split_boost: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            alpha_decay: 0.99,
            alpha_min: 0.005,
            friction: 0.9,
            gravity: 0.01,
            theta: 0.8,
            target_strength: 0.1,
            split_boost: 1.1,
        }
    }
}

/// Where each bubble is pulled on every tick.
#[derive(Clone, Debug, PartialEq)]
pub enum TargetForce {
    /// Every bubble heads for one anchor.
    Shared(Vec2),
    /// One anchor per bubble, with the pull scaled by `boost`.
    PerNode { anchors: Vec<Vec2>, boost: f32 },
}

impl TargetForce {
    fn anchor(&self, index: usize) -> Option<(Vec2, f32)> {
        match self {
            Self::Shared(anchor) => Some((*anchor, 1.0)),
            Self::PerNode { anchors, boost } => anchors.get(index).map(|anchor| (*anchor, *boost)),
        }
    }
}

/// Position-Verlet force layout: velocity is implicit in `positions - previous`.
///
/// Each tick cools alpha, pulls toward the canvas center, applies pairwise charge
/// through a Barnes-Hut tree, integrates with friction, then pulls each bubble
/// toward its layout anchor.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    canvas_center: Vec2,
    positions: Vec<Vec2>,
    previous: Vec<Vec2>,
    charges: Vec<f32>,
    target: TargetForce,
    alpha: f32,
    running: bool,
    restarts: usize,
    ticks: usize,
    scratch: Vec<Vec2>,
}

impl Simulation {
    pub fn new(
        config: SimulationConfig,
        canvas_center: Vec2,
        positions: Vec<Vec2>,
        charges: Vec<f32>,
        target: TargetForce,
    ) -> Self {
        assert_eq!(
            positions.len(),
            charges.len(),
            "one charge per bubble position"
        );

        Self {
            config,
            canvas_center,
            previous: positions.clone(),
            positions,
            charges,
            target,
            alpha: 0.0,
            running: false,
            restarts: 0,
            ticks: 0,
            scratch: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn charges(&self) -> &[f32] {
        &self.charges
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// How many times the layout has been (re)heated.
    pub fn restarts(&self) -> usize {
        self.restarts
    }

    /// Reheat to full energy from the current positions.
    pub fn start(&mut self) {
        self.alpha = 1.0;
        self.running = true;
        self.restarts += 1;
        self.ticks = 0;
        debug!(nodes = self.len(), restarts = self.restarts, "layout restarted");
    }

    pub fn stop(&mut self) {
        self.alpha = 0.0;
        self.running = false;
    }

    pub fn set_charges(&mut self, charges: Vec<f32>) {
        assert_eq!(charges.len(), self.len(), "one charge per bubble");
        self.charges = charges;
        self.start();
    }

    pub fn set_target(&mut self, target: TargetForce) {
        self.target = target;
        self.start();
    }

    /// Advance one tick. Returns `false` once the layout has cooled (or was never started).
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.alpha *= self.config.alpha_decay;
        if self.alpha < self.config.alpha_min || self.is_empty() {
            self.stop();
            debug!(ticks = self.ticks, restarts = self.restarts, "layout cooled");
            return false;
        }

        let alpha = self.alpha;

        let gravity = alpha * self.config.gravity;
        for position in &mut self.positions {
            pull_towards(position, self.canvas_center, gravity);
        }

        if let Some(tree) = QuadNode::build(&self.positions, &self.charges) {
            for (index, previous) in self.previous.iter_mut().enumerate() {
                accumulate_charge_for_node(
                    &tree,
                    index,
                    &self.positions,
                    &self.charges,
                    alpha,
                    self.config.theta,
                    previous,
                );
            }
        }

        self.scratch.clear();
        self.scratch.extend_from_slice(&self.positions);
        for ((position, previous), current) in self
            .positions
            .iter_mut()
            .zip(&mut self.previous)
            .zip(&self.scratch)
        {
            let velocity = *current - *previous;
            *previous = *current;
            *position += velocity * self.config.friction;
        }

        let pull = self.config.target_strength * alpha;
        for (index, position) in self.positions.iter_mut().enumerate() {
            if let Some((anchor, boost)) = self.target.anchor(index) {
                pull_towards(position, anchor, pull * boost);
            }
        }

        self.ticks += 1;
        trace!(alpha, tick = self.ticks, "layout tick");
        true
    }

    /// Tick until cooled or `max_ticks` is reached; returns the ticks that moved bubbles.
    pub fn run_to_convergence(&mut self, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while ticks < max_ticks && self.tick() {
            ticks += 1;
        }
        ticks
    }
}

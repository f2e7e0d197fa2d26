//! Particle state and the classical PSO velocity/position update
//! (`v <- w*v + c1*r1*(pbest-x) + c2*r2*(gbest-x)`, `x <- clip(x+v, lb, ub)`).

use rand::Rng;
use uuid::Uuid;

use bmp_core::Objectives;

/// Cost decomposition carried alongside a particle's last-evaluated
/// objectives, needed by the ε-constraint driver's parent-selection step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostComponents {
    pub ef_cost: f64,
    pub lc_cost: f64,
    pub animal_cost: f64,
    pub manure_cost: f64,
}

impl CostComponents {
    pub fn total(&self) -> f64 {
        self.ef_cost + self.lc_cost + self.animal_cost + self.manure_cost
    }
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub uuid: Uuid,
    pub x: Vec<f64>,
    pub v: Vec<f64>,
    pub objectives: Objectives,
    pub cost: CostComponents,
    pub personal_best_x: Vec<f64>,
    pub personal_best_objectives: Objectives,
}

impl Particle {
    pub fn new(x: Vec<f64>, nobjs: usize) -> Self {
        let v = vec![0.0; x.len()];
        let personal_best_x = x.clone();
        Self {
            uuid: Uuid::new_v4(),
            x,
            v,
            objectives: Objectives::sentinel(nobjs),
            cost: CostComponents::default(),
            personal_best_x,
            personal_best_objectives: Objectives::sentinel(nobjs),
        }
    }

    /// Overwrites the personal best when the new objectives are
    /// non-dominated by the prior personal best (step 3).
    pub fn update_personal_best(&mut self) {
        if !self.personal_best_objectives.dominates(&self.objectives) {
            self.personal_best_x = self.x.clone();
            self.personal_best_objectives = self.objectives.clone();
        }
    }

    /// Classical PSO move (step 5). `gbest` is the position of the
    /// iteration's randomly chosen archive member.
    pub fn mv(&mut self, gbest: &[f64], w: f64, c1: f64, c2: f64, lb: f64, ub: f64, rng: &mut impl Rng) {
        for i in 0..self.x.len() {
            let r1: f64 = rng.gen_range(0.0..1.0);
            let r2: f64 = rng.gen_range(0.0..1.0);
            self.v[i] = w * self.v[i]
                + c1 * r1 * (self.personal_best_x[i] - self.x[i])
                + c2 * r2 * (gbest[i] - self.x[i]);
            self.x[i] = (self.x[i] + self.v[i]).clamp(lb, ub);
        }
    }
}

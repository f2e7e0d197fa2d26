//! Exterior penalty method with L-BFGS, mirroring the pattern used for the
//! teacher's AC-OPF solver: wrap the constrained problem in a
//! [`PenaltyProblem`] implementing `argmin`'s `CostFunction` + `Gradient`
//! via finite differences, then run an outer penalty-increase loop around
//! an inner `LBFGS` + `MoreThuenteLineSearch` executor.
//!
//! Constraints here: the pollutant-reduction ceiling `residual_load(x) ≤
//! epsilon`, and box bounds `lb ≤ x ≤ ub`. The per-group share-sum ≤ 1
//! constraint (invariant 2) is structurally guaranteed by slack
//! normalization and needs no penalty term.

use argmin::core::{CostFunction, Executor, Gradient, State};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::LBFGS;

use bmp_catalog::{Pollutant, ReferenceCatalog};
use bmp_encode::EncodingLayout;

use crate::objective::{efficiency_cost, residual_load};

pub struct EpsilonTarget<'a> {
    pub catalog: &'a ReferenceCatalog,
    pub layout: &'a EncodingLayout,
    pub pollutant: Pollutant,
    pub epsilon: f64,
    pub lb: f64,
    pub ub: f64,
}

struct PenaltyProblem<'a> {
    target: &'a EpsilonTarget<'a>,
    penalty: f64,
}

impl<'a> CostFunction for PenaltyProblem<'a> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        let mut cost = efficiency_cost(self.target.layout, self.target.catalog, x);

        let load = residual_load(self.target.layout, self.target.catalog, x, self.target.pollutant);
        let violation = (load - self.target.epsilon).max(0.0);
        cost += self.penalty * violation * violation;

        for &xi in x {
            if xi < self.target.lb {
                let v = self.target.lb - xi;
                cost += self.penalty * v * v;
            }
            if xi > self.target.ub {
                let v = xi - self.target.ub;
                cost += self.penalty * v * v;
            }
        }

        Ok(cost)
    }
}

impl<'a> Gradient for PenaltyProblem<'a> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, x: &Self::Param) -> Result<Self::Gradient, argmin::core::Error> {
        let eps = 1e-7;
        let f0 = self.cost(x)?;
        let mut grad = vec![0.0; x.len()];
        for i in 0..x.len() {
            let mut x_plus = x.clone();
            x_plus[i] += eps;
            let f_plus = self.cost(&x_plus)?;
            grad[i] = (f_plus - f0) / eps;
        }
        Ok(grad)
    }
}

/// Solves one ε-constraint step. Always returns a best-effort `x`
/// (identical to `x0` if the solver never improves on it); solver failure
/// (error taxonomy case 5) is logged and treated as "use the incoming
/// point" rather than propagated.
pub fn solve(target: &EpsilonTarget<'_>, x0: Vec<f64>, max_iterations: u64) -> Vec<f64> {
    let max_penalty_iters: u64 = 5;
    let mut penalty = 1000.0;
    let mut x = x0;

    for _ in 0..max_penalty_iters {
        let problem = PenaltyProblem { target, penalty };
        let linesearch = MoreThuenteLineSearch::new();
        let solver = LBFGS::new(linesearch, 7);
        let inner_max_iter = (max_iterations / max_penalty_iters).max(1);

        let executor = Executor::new(problem, solver).configure(|state| {
            state.param(x.clone()).max_iters(inner_max_iter).target_cost(0.0)
        });

        match executor.run() {
            Ok(result) => {
                if let Some(best) = result.state().get_best_param() {
                    x = best.clone();
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "epsilon-constraint L-BFGS step failed; keeping prior point");
            }
        }

        let load = residual_load(target.layout, target.catalog, &x, target.pollutant);
        if load <= target.epsilon {
            break;
        }
        penalty *= 10.0;
    }

    for xi in &mut x {
        *xi = xi.clamp(target.lb, target.ub);
    }
    x
}

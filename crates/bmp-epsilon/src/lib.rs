//! The ε-Constraint Driver: a nonlinear-program post-processor that
//! refines a parent PSO-archive member by stepping a pollutant-reduction
//! target. The NLP is solved with the exterior penalty method and L-BFGS.

pub mod driver;
pub mod objective;
pub mod problem;

pub use driver::{run_sweep, step_targets, write_dispatch_and_score, EpsilonStep, EpsilonSweepConfig};
pub use objective::{efficiency_cost, residual_load};
pub use problem::{solve, EpsilonTarget};

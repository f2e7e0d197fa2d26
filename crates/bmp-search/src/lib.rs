//! The PSO Driver: swarm search over the full decision-variable space with
//! an external non-dominated archive. Each generation fans out through an
//! [`Evaluate`] implementation — the production one (`evaluator::batch`)
//! decodes, writes scenario files, and dispatches to the simulator fleet;
//! the driver loop itself is agnostic to how evaluation happens.

pub mod archive;
pub mod driver;
pub mod evaluator;
pub mod particle;

pub use archive::Archive;
pub use driver::{PsoConfig, PsoDriver};
pub use evaluator::{batch::BatchEvaluator, Evaluate, EvaluatedCandidate};
pub use particle::{CostComponents, Particle};

//! Candidate solutions, objective vectors, and the dominance relation shared
//! by the PSO and ε-constraint drivers.
//!
//! The objective count is parameterized via
//! [`Objectives`], a small vector type, while still defaulting to the
//! `(total_cost, residual_load)` pair used by default.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A very large objective value used to mark a failed candidate so it always
/// loses dominance comparisons.
pub const SENTINEL_OBJECTIVE: f64 = 1e13;

/// An objective vector of arbitrary arity; lower is better in every
/// component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objectives(pub Vec<f64>);

impl Objectives {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn sentinel(nobjs: usize) -> Self {
        Self(vec![SENTINEL_OBJECTIVE; nobjs])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_sentinel(&self) -> bool {
        self.0.iter().all(|v| *v >= SENTINEL_OBJECTIVE)
    }

    /// `a` dominates `b` iff `a[i] <= b[i]` for all `i` and `a[i] < b[i]` for
    /// at least one `i`. Exact-equal vectors are NOT dominating.
    pub fn dominates(&self, other: &Objectives) -> bool {
        assert_eq!(self.0.len(), other.0.len(), "objective arity mismatch");
        let mut strictly_better = false;
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            if a > b {
                return false;
            }
            if a < b {
                strictly_better = true;
            }
        }
        strictly_better
    }
}

/// A decision vector plus its correlation token and last-evaluated objectives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSolution {
    pub uuid: Uuid,
    pub x: Vec<f64>,
    pub objectives: Objectives,
}

impl CandidateSolution {
    pub fn new(x: Vec<f64>, nobjs: usize) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            x,
            objectives: Objectives::sentinel(nobjs),
        }
    }
}

/// A candidate plus its objective value, stored in the non-dominated archive.
/// Immutable once inserted; removed only when a newly accepted entry
/// dominates it (lifecycle).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub uuid: Uuid,
    pub x: Vec<f64>,
    pub objectives: Objectives,
    pub ef_cost: f64,
    pub lc_cost: f64,
    pub animal_cost: f64,
    pub manure_cost: f64,
}

impl ArchiveEntry {
    pub fn total_cost(&self) -> f64 {
        self.ef_cost + self.lc_cost + self.animal_cost + self.manure_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominance_is_strict_on_equal_vectors() {
        let a = Objectives::new(vec![5.0, 5.0]);
        let b = Objectives::new(vec![5.0, 5.0]);
        assert!(!a.dominates(&b));
        assert!(!b.dominates(&a));
    }

    #[test]
    fn dominance_requires_no_worse_component() {
        let a = Objectives::new(vec![5.0, 10.0]);
        let b = Objectives::new(vec![6.0, 9.0]);
        assert!(!a.dominates(&b));
        assert!(!b.dominates(&a));
    }

    #[test]
    fn dominance_basic_case() {
        let a = Objectives::new(vec![4.0, 4.0]);
        let b = Objectives::new(vec![5.0, 5.0]);
        assert!(a.dominates(&b));
        assert!(!b.dominates(&a));
    }

    #[test]
    fn sentinel_objective_is_detected() {
        let sentinel = Objectives::sentinel(2);
        assert!(sentinel.is_sentinel());
        let real = Objectives::new(vec![1.0, 2.0]);
        assert!(!real.is_sentinel());
    }
}

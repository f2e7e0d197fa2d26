//! The PSO Driver's per-generation loop: initialize, evaluate, update
//! personal bests, update the archive, move.

use rand::Rng;
use uuid::Uuid;

use bmp_core::{ArchiveEntry, Objectives};

use crate::archive::Archive;
use crate::evaluator::Evaluate;
use crate::particle::Particle;

#[derive(Debug, Clone, Copy)]
pub struct PsoConfig {
    pub nparts: usize,
    pub nobjs: usize,
    pub max_iter: usize,
    pub w: f64,
    pub c1: f64,
    pub c2: f64,
    pub lb: f64,
    pub ub: f64,
}

impl Default for PsoConfig {
    fn default() -> Self {
        Self {
            nparts: 20,
            nobjs: 2,
            max_iter: 20,
            w: 0.7,
            c1: 1.4,
            c2: 1.4,
            lb: 0.0,
            ub: 1.0,
        }
    }
}

pub struct PsoDriver {
    pub config: PsoConfig,
    pub particles: Vec<Particle>,
    pub archive: Archive,
}

impl PsoDriver {
    /// Initializes `nparts` particles from a supplied per-particle decision
    /// vector factory (step 1). The factory typically calls
    /// `bmp_encode::initialize` against a shared `EncodingLayout`.
    pub fn initialize(config: PsoConfig, mut make_x: impl FnMut(&mut dyn rand::RngCore) -> Vec<f64>, rng: &mut impl Rng) -> Self {
        let particles = (0..config.nparts)
            .map(|_| Particle::new(make_x(rng), config.nobjs))
            .collect();
        Self {
            config,
            particles,
            archive: Archive::new(),
        }
    }

    /// Runs the full `max_iter`-generation loop, calling `evaluator` once
    /// per generation for the whole swarm.
    pub fn run(&mut self, evaluator: &mut impl Evaluate, rng: &mut impl Rng) -> anyhow::Result<()> {
        for _ in 0..self.config.max_iter {
            self.step(evaluator, rng)?;
        }
        Ok(())
    }

    /// Runs one generation (evaluate, personal-best update, archive update,
    /// move), exposed separately so tests can assert on intermediate state
    /// (S4 checks archive/personal-best state after exactly one iteration).
    pub fn step(&mut self, evaluator: &mut impl Evaluate, rng: &mut impl Rng) -> anyhow::Result<()> {
        let batch: Vec<(Uuid, Vec<f64>)> = self.particles.iter().map(|p| (p.uuid, p.x.clone())).collect();
        let results = evaluator.evaluate_batch(&batch)?;

        for particle in &mut self.particles {
            match results.get(&particle.uuid) {
                Some(evaluated) => {
                    particle.objectives = evaluated.objectives.clone();
                    particle.cost = evaluated.cost;
                }
                None => {
                    particle.objectives = Objectives::sentinel(self.config.nobjs);
                }
            }
            particle.update_personal_best();
        }

        for particle in &self.particles {
            if particle.objectives.is_sentinel() {
                continue;
            }
            self.archive.update(ArchiveEntry {
                uuid: particle.uuid,
                x: particle.x.clone(),
                objectives: particle.objectives.clone(),
                ef_cost: particle.cost.ef_cost,
                lc_cost: particle.cost.lc_cost,
                animal_cost: particle.cost.animal_cost,
                manure_cost: particle.cost.manure_cost,
            });
        }

        let fallback_gbest: Vec<f64> = vec![0.0; self.particles.first().map(|p| p.x.len()).unwrap_or(0)];
        for particle in &mut self.particles {
            let gbest = self
                .archive
                .random_member(rng)
                .map(|e| e.x.clone())
                .unwrap_or_else(|| fallback_gbest.clone());
            particle.mv(&gbest, self.config.w, self.config.c1, self.config.c2, self.config.lb, self.config.ub, rng);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::tests::ConstantEvaluator;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn scenario_s4_one_iteration_personal_bests_equal_evaluated_objectives() {
        let config = PsoConfig {
            nparts: 2,
            nobjs: 2,
            max_iter: 1,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let mut driver = PsoDriver::initialize(config, |rng| vec![rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)], &mut rng);

        let mut evaluator = ConstantEvaluator;
        driver.step(&mut evaluator, &mut rng).unwrap();

        for particle in &driver.particles {
            assert_eq!(particle.personal_best_objectives, particle.objectives);
        }
        assert!(driver.archive.len() <= 2);

        let members = driver.archive.entries();
        for a in members {
            for b in members {
                if a.uuid != b.uuid {
                    assert!(!a.objectives.dominates(&b.objectives));
                }
            }
        }
    }
}

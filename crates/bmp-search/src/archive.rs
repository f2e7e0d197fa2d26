//! External non-dominated archive shared by the PSO Driver and consulted
//! by the ε-Constraint Driver for parent selection.

use uuid::Uuid;

use bmp_core::ArchiveEntry;

#[derive(Debug, Default)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sweeps the archive against `candidate` (step 4): entries the
    /// candidate dominates are dropped, then the candidate is added iff no
    /// remaining entry dominates it. An exact-equal objective vector
    /// already present counts as dominating, so the new copy is discarded.
    pub fn update(&mut self, candidate: ArchiveEntry) {
        self.entries.retain(|existing| !candidate.objectives.dominates(&existing.objectives));

        let dominated_by_existing = self
            .entries
            .iter()
            .any(|existing| existing.objectives.dominates(&candidate.objectives) || existing.objectives == candidate.objectives);

        if !dominated_by_existing {
            self.entries.push(candidate);
        }
    }

    /// Picks one member uniformly at random as the iteration's global-best
    /// reference (step 5).
    pub fn random_member(&self, rng: &mut impl rand::Rng) -> Option<&ArchiveEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.entries.len());
        self.entries.get(index)
    }

    pub fn find(&self, uuid: Uuid) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.uuid == uuid)
    }

    /// The minimum-, median-, and maximum-total-cost members, used by the
    /// ε-Constraint Driver's three parent selections. Returns `None` when
    /// the archive is empty.
    pub fn min_median_max_by_cost(&self) -> Option<(&ArchiveEntry, &ArchiveEntry, &ArchiveEntry)> {
        if self.entries.is_empty() {
            return None;
        }
        let mut by_cost: Vec<&ArchiveEntry> = self.entries.iter().collect();
        by_cost.sort_by(|a, b| a.total_cost().partial_cmp(&b.total_cost()).unwrap());
        let min = by_cost[0];
        let max = by_cost[by_cost.len() - 1];
        let median = by_cost[by_cost.len() / 2];
        Some((min, median, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmp_core::Objectives;

    fn entry(objectives: [f64; 2]) -> ArchiveEntry {
        ArchiveEntry {
            uuid: Uuid::new_v4(),
            x: vec![],
            objectives: Objectives::new(objectives.to_vec()),
            ef_cost: 0.0,
            lc_cost: objectives[0],
            animal_cost: 0.0,
            manure_cost: 0.0,
        }
    }

    #[test]
    fn dominance_idempotence() {
        let mut archive = Archive::new();
        let e = entry([10.0, 5.0]);
        archive.update(e.clone());
        archive.update(e);
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn archive_anti_dominance_holds_after_updates() {
        let mut archive = Archive::new();
        for obj in [[10.0, 5.0], [8.0, 8.0], [5.0, 10.0], [7.0, 7.0]] {
            archive.update(entry(obj));
        }
        let members = archive.entries();
        for a in members {
            for b in members {
                if a.uuid != b.uuid {
                    assert!(!a.objectives.dominates(&b.objectives) || !b.objectives.dominates(&a.objectives));
                }
            }
        }
    }

    #[test]
    fn scenario_s3_matches_expected_survivor_set() {
        let mut archive = Archive::new();
        for obj in [[10.0, 5.0], [8.0, 8.0], [5.0, 10.0], [7.0, 7.0]] {
            archive.update(entry(obj));
        }
        let mut survivors: Vec<Vec<f64>> = archive.entries().iter().map(|e| e.objectives.0.clone()).collect();
        survivors.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let mut expected = vec![vec![10.0, 5.0], vec![7.0, 7.0], vec![5.0, 10.0]];
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(survivors, expected);
    }

    #[test]
    fn min_median_max_by_cost_orders_correctly() {
        let mut archive = Archive::new();
        archive.update(entry([100.0, 50.0]));
        archive.update(entry([80.0, 60.0]));
        archive.update(entry([120.0, 40.0]));
        let (min, median, max) = archive.min_median_max_by_cost().unwrap();
        assert_eq!(min.total_cost(), 80.0);
        assert_eq!(median.total_cost(), 100.0);
        assert_eq!(max.total_cost(), 120.0);
    }
}

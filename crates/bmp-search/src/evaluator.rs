//! The evaluate step (step 2): decode each particle, write its scenario
//! files, dispatch to the simulator fleet, await replies, and fill each
//! particle's objectives and cost decomposition.
//!
//! Abstracted behind a trait so the driver loop can be exercised (S4) with
//! a constant evaluator that never touches the filesystem or a message
//! bus.

use uuid::Uuid;

use bmp_core::Objectives;

use crate::particle::CostComponents;

#[derive(Debug, Clone)]
pub struct EvaluatedCandidate {
    pub objectives: Objectives,
    pub cost: CostComponents,
}

pub trait Evaluate {
    /// Evaluates one generation's worth of positions, keyed by the UUID the
    /// caller assigned to each. Implementations that cannot produce a
    /// result for a UUID (encoding produced no assignments, dispatch
    /// failure, await timeout) simply omit it from the returned map; the
    /// driver assigns the sentinel objective to any UUID left unevaluated.
    fn evaluate_batch(
        &mut self,
        positions: &[(Uuid, Vec<f64>)],
    ) -> anyhow::Result<std::collections::HashMap<Uuid, EvaluatedCandidate>>;

    fn nobjs(&self) -> usize;
}

pub mod batch {
    //! The production [`Evaluate`](super::Evaluate) implementation: decode
    //! via `bmp-encode`, write via `bmp-io`, dispatch via `bmp-dispatch`.

    use std::collections::HashMap;
    use std::time::Duration;

    use anyhow::Result;
    use uuid::Uuid;

    use bmp_catalog::ReferenceCatalog;
    use bmp_core::{CategoriesEnabled, Objectives};
    use bmp_dispatch::{DispatchClient, MessageBus, RunSession};
    use bmp_encode::{decode_candidate, EncodingLayout};
    use bmp_io::{read_reportloads, ScenarioWriter};

    use super::{Evaluate, EvaluatedCandidate};
    use crate::particle::CostComponents;

    pub struct BatchEvaluator<'a, B: MessageBus> {
        pub catalog: &'a ReferenceCatalog,
        pub layout: &'a EncodingLayout,
        pub categories: CategoriesEnabled,
        pub writer: ScenarioWriter,
        pub session: &'a mut RunSession<B>,
        pub batch_timeout: Duration,
        pub scenario_descriptor: String,
    }

    impl<'a, B: MessageBus> Evaluate for BatchEvaluator<'a, B> {
        fn nobjs(&self) -> usize {
            2
        }

        fn evaluate_batch(
            &mut self,
            positions: &[(Uuid, Vec<f64>)],
        ) -> Result<HashMap<Uuid, EvaluatedCandidate>> {
            let mut cost_by_uuid = HashMap::with_capacity(positions.len());
            let mut dispatchable = Vec::with_capacity(positions.len());

            for (uuid, x) in positions {
                let tables = decode_candidate(self.layout, self.catalog, x);
                if tables.any_category_empty(&self.categories) {
                    tracing::warn!(%uuid, "encoding produced no assignments; excluding from dispatch");
                    continue;
                }
                let cost = CostComponents {
                    ef_cost: tables.ef_cost,
                    lc_cost: tables.lc_cost,
                    animal_cost: tables.animal_cost,
                    manure_cost: tables.manure_cost,
                };
                match self.writer.write(*uuid, &tables) {
                    Ok(_) => {
                        cost_by_uuid.insert(*uuid, cost);
                        dispatchable.push(*uuid);
                    }
                    Err(err) => {
                        tracing::warn!(%uuid, error = %err, "scenario write failed; excluding from dispatch");
                    }
                }
            }

            let submitted = DispatchClient::submit(self.session, &dispatchable, &self.scenario_descriptor)?;
            let replies = DispatchClient::await_all(self.session, &submitted, self.batch_timeout)?;

            let sel_pollutant = self.catalog.sel_pollutant.index();
            let mut results = HashMap::with_capacity(replies.len());
            for (uuid, cost) in cost_by_uuid {
                let Some(_reply) = replies.get(&uuid) else {
                    continue;
                };
                let reportloads_path = self.writer.reportloads_path(uuid);
                let residual_load = match read_reportloads(&reportloads_path) {
                    Ok(loads) => loads.eos[sel_pollutant],
                    Err(err) => {
                        tracing::warn!(%uuid, error = %err, "could not read simulator reportloads");
                        continue;
                    }
                };
                let objectives = Objectives::new(vec![cost.total(), residual_load]);
                results.insert(uuid, EvaluatedCandidate { objectives, cost });
            }
            Ok(results)
        }
    }
}

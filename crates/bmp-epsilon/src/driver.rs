//! Orchestrates an ε-constraint sweep of `N` steps atop one parent archive
//! member: for each step, solve the NLP at a stepped reduction target,
//! merge the result with the parent's other-category rows, and write a
//! fresh candidate.

use std::time::Duration;

use uuid::Uuid;

use bmp_catalog::{Pollutant, ReferenceCatalog};
use bmp_core::{ArchiveEntry, DecodedTables, Objectives};
use bmp_dispatch::{DispatchClient, MessageBus, RunSession};
use bmp_encode::{decode_candidate, efficiency_rows_as_land, EncodingLayout};
use bmp_io::{read_reportloads, ScenarioWriter};

use crate::problem::{solve, EpsilonTarget};

#[derive(Debug, Clone, Copy)]
pub struct EpsilonSweepConfig {
    pub rho: f64,
    pub n: usize,
    /// Requested NLP iterations per step; the design notes a maximum of
    /// 1000.
    pub max_iterations: u64,
    pub lb: f64,
    pub ub: f64,
}

impl Default for EpsilonSweepConfig {
    fn default() -> Self {
        Self {
            rho: 0.8,
            n: 4,
            max_iterations: 1000,
            lb: 0.0,
            ub: 1.0,
        }
    }
}

pub struct EpsilonStep {
    pub uuid: Uuid,
    pub tables: DecodedTables,
}

/// One sweep step's reduction target `ρ_i = ρ·(i+1)/N` and the pollutant
/// ceiling it implies, `ε_i = (1-ρ_i)·sum_load_valid[pollutant]` (S5).
pub fn step_targets(catalog: &ReferenceCatalog, config: &EpsilonSweepConfig) -> Vec<(f64, f64)> {
    let baseline = catalog.sum_load_valid.get(&catalog.sel_pollutant).copied().unwrap_or(0.0);
    (0..config.n)
        .map(|i| {
            let rho_i = config.rho * (i as f64 + 1.0) / config.n as f64;
            (rho_i, (1.0 - rho_i) * baseline)
        })
        .collect()
}

/// Runs the full sweep for one parent, producing `N` new candidates. The
/// parent's animal and manure rows and costs are copied verbatim into
/// every step. The NLP solves efficiency-share variables, but those are
/// serialized through the land-BMP file, the same one land-conversion rows
/// use — there is no separate efficiency file on the wire — so each
/// step's land-conversion table is the solver's solved rows for this
/// step's `ρ_i` appended to the parent's own land-conversion rows, and
/// `ef_cost` (not `lc_cost`) is what the solve replaces.
pub fn run_sweep(
    catalog: &ReferenceCatalog,
    full_layout: &EncodingLayout,
    efficiency_layout: &EncodingLayout,
    parent: &ArchiveEntry,
    config: &EpsilonSweepConfig,
) -> Vec<EpsilonStep> {
    let parent_tables = decode_candidate(full_layout, catalog, &parent.x);
    let x0: Vec<f64> = parent
        .x
        .iter()
        .take(efficiency_layout.nvars)
        .copied()
        .collect();
    let x0 = if x0.len() == efficiency_layout.nvars {
        x0
    } else {
        vec![config.lb.max(0.0); efficiency_layout.nvars]
    };

    step_targets(catalog, config)
        .into_iter()
        .map(|(_, epsilon)| {
            let target = EpsilonTarget {
                catalog,
                layout: efficiency_layout,
                pollutant: catalog.sel_pollutant,
                epsilon,
                lb: config.lb,
                ub: config.ub,
            };
            let x_star = solve(&target, x0.clone(), config.max_iterations);
            let solved_rows = efficiency_rows_as_land(efficiency_layout, catalog, &x_star);
            let ef_cost = crate::objective::efficiency_cost(efficiency_layout, catalog, &x_star);

            let mut land_conversion = solved_rows;
            land_conversion.extend(parent_tables.land_conversion.iter().cloned());

            let tables = DecodedTables {
                efficiency: parent_tables.efficiency.clone(),
                land_conversion,
                animal: parent_tables.animal.clone(),
                manure: parent_tables.manure.clone(),
                ef_cost,
                lc_cost: parent_tables.lc_cost,
                animal_cost: parent_tables.animal_cost,
                manure_cost: parent_tables.manure_cost,
            };
            EpsilonStep { uuid: Uuid::new_v4(), tables }
        })
        .collect()
}

/// Writes every step's scenario files, dispatches them together, and
/// blocks for the batch timeout before scoring each surviving UUID's
/// `(total_cost, residual_load)` objectives from the simulator's reply.
pub fn write_dispatch_and_score<B: MessageBus>(
    writer: &ScenarioWriter,
    session: &mut RunSession<B>,
    steps: &[EpsilonStep],
    scenario_descriptor: &str,
    batch_timeout: Duration,
    pollutant: Pollutant,
) -> anyhow::Result<Vec<ArchiveEntry>> {
    let mut uuids = Vec::with_capacity(steps.len());
    for step in steps {
        if let Err(err) = writer.write(step.uuid, &step.tables) {
            tracing::warn!(uuid = %step.uuid, error = %err, "epsilon scenario write failed");
            continue;
        }
        uuids.push(step.uuid);
    }

    let submitted = DispatchClient::submit(session, &uuids, scenario_descriptor)?;
    let replies = DispatchClient::await_all(session, &submitted, batch_timeout)?;

    let sel_pollutant = pollutant.index();
    let mut entries = Vec::with_capacity(steps.len());
    for step in steps {
        if !replies.contains_key(&step.uuid) {
            continue;
        }
        let reportloads_path = writer.reportloads_path(step.uuid);
        let residual_load = match read_reportloads(&reportloads_path) {
            Ok(loads) => loads.eos[sel_pollutant],
            Err(err) => {
                tracing::warn!(uuid = %step.uuid, error = %err, "could not read epsilon-step reportloads");
                continue;
            }
        };
        entries.push(ArchiveEntry {
            uuid: step.uuid,
            x: Vec::new(),
            objectives: Objectives::new(vec![step.tables.total_cost(), residual_load]),
            ef_cost: step.tables.ef_cost,
            lc_cost: step.tables.lc_cost,
            animal_cost: step.tables.animal_cost,
            manure_cost: step.tables.manure_cost,
        });
    }
    Ok(entries)
}

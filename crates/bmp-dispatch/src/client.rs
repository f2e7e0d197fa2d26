//! Submits candidate evaluation requests and blocks waiting for correlated
//! replies. A mandatory per-batch timeout bounds the await loop — the
//! fire-and-wait pattern of the original protocol had no such bound.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::bus::MessageBus;
use crate::session::RunSession;

const EXECUTION_QUEUE: &str = "opt4cast_execution";
const POLL_INTERVAL: Duration = Duration::from_secs(1);

fn emo_data_key(uuid: Uuid) -> String {
    format!("emo_data:{uuid}")
}

fn solution_key(uuid: Uuid) -> String {
    format!("solution_to_execute_dict:{uuid}")
}

fn executed_results_key(uuid: Uuid) -> String {
    format!("executed_results:{uuid}")
}

fn run_queue(run_uuid: Uuid) -> String {
    format!("{EXECUTION_QUEUE}:{run_uuid}")
}

/// Parses the worker's `"loadN_loadP_loadS_..."` reply into its constituent
/// doubles.
pub fn parse_sim_result(body: &str) -> Result<Vec<f64>> {
    body.split('_')
        .map(|part| {
            part.parse::<f64>()
                .with_context(|| format!("parsing simulator reply component '{part}'"))
        })
        .collect()
}

pub struct DispatchClient;

impl DispatchClient {
    /// Publishes one request per UUID. A UUID whose publish fails is
    /// logged and excluded from the returned submitted set rather than
    /// aborting the whole batch.
    pub fn submit<B: MessageBus>(
        session: &mut RunSession<B>,
        uuids: &[Uuid],
        scenario_descriptor: &str,
    ) -> Result<Vec<Uuid>> {
        let mut submitted = Vec::with_capacity(uuids.len());
        for (index, &uuid) in uuids.iter().enumerate() {
            let scenario_id = format!("{}_{}", session.run_uuid, index);
            let result = (|| -> Result<()> {
                session.bus.kv_set(&emo_data_key(uuid), scenario_descriptor)?;
                session.bus.kv_set(&solution_key(uuid), &scenario_id)?;
                session.bus.queue_push(&run_queue(session.run_uuid), &uuid.to_string())?;
                Ok(())
            })();
            match result {
                Ok(()) => submitted.push(uuid),
                Err(err) => {
                    tracing::warn!(%uuid, error = %err, "dispatch submit failed; excluding from await set");
                }
            }
        }
        Ok(submitted)
    }

    /// Blocks until every submitted UUID has replied or `batch_timeout`
    /// elapses. Candidates absent from the returned map timed out or never
    /// produced a valid reply; the caller assigns the sentinel objective.
    pub fn await_all<B: MessageBus>(
        session: &mut RunSession<B>,
        submitted: &[Uuid],
        batch_timeout: Duration,
    ) -> Result<HashMap<Uuid, Vec<f64>>> {
        let mut pending: HashSet<Uuid> = submitted.iter().copied().collect();
        let mut results = HashMap::with_capacity(submitted.len());
        let deadline = Instant::now() + batch_timeout;
        let queue = run_queue(session.run_uuid);

        while !pending.is_empty() && Instant::now() < deadline {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let poll = remaining.min(POLL_INTERVAL);
            if poll.is_zero() {
                break;
            }

            let Some(body) = session.bus.queue_blocking_pop(&queue, poll)? else {
                continue;
            };
            let Ok(uuid) = body.parse::<Uuid>() else {
                tracing::warn!(body, "dispatch await received a non-UUID message body");
                continue;
            };
            if !pending.remove(&uuid) {
                continue;
            }

            let raw = session
                .bus
                .kv_get(&executed_results_key(uuid))?
                .unwrap_or_default();
            session.bus.kv_del(&emo_data_key(uuid))?;
            session.bus.kv_del(&executed_results_key(uuid))?;

            match parse_sim_result(&raw) {
                Ok(loads) => {
                    results.insert(uuid, loads);
                }
                Err(err) => {
                    tracing::warn!(%uuid, error = %err, "could not parse simulator reply");
                }
            }
        }

        for uuid in pending {
            tracing::warn!(%uuid, "dispatch await timed out");
        }

        Ok(results)
    }
}

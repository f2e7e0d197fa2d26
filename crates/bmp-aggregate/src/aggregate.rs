//! Result Aggregator: reads each candidate's `<UUID>_costs.json` and
//! sibling `<UUID>_reportloads.parquet`, fuses them into the run's two
//! configured objective columns, filters to the Pareto-non-dominated
//! subset, and writes the final front.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use uuid::Uuid;

use bmp_core::Objectives;
use bmp_io::{read_costs, read_reportloads};

/// One candidate's file set in the run directory, at its original
/// (pre-filtering) solution index.
#[derive(Debug, Clone)]
pub struct CandidateFiles {
    pub index: usize,
    pub uuid: Uuid,
    pub costs_path: PathBuf,
    pub reportloads_path: PathBuf,
    /// Every other per-candidate file (land/animal/manure parquet+json)
    /// that must be copied verbatim alongside the front's surviving entries.
    pub sibling_files: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub index: usize,
    pub uuid: Uuid,
    pub objectives: Objectives,
}

/// The default objective pair: total cost and EoS load for the configured
/// pollutant. `eos_index` selects which of the simulator's three EoS
/// columns (N, P, S) is the second objective.
pub fn score_candidate(files: &CandidateFiles, eos_index: usize) -> Result<ScoredCandidate> {
    let costs = read_costs(&files.costs_path)
        .with_context(|| format!("reading costs for candidate {}", files.uuid))?;
    let loads = read_reportloads(&files.reportloads_path)
        .with_context(|| format!("reading reportloads for candidate {}", files.uuid))?;
    Ok(ScoredCandidate {
        index: files.index,
        uuid: files.uuid,
        objectives: Objectives::new(vec![costs.cost, loads.eos[eos_index]]),
    })
}

/// Filters to the Pareto-non-dominated subset, in no particular order.
pub fn pareto_filter(scored: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    scored
        .iter()
        .filter(|candidate| {
            !scored
                .iter()
                .any(|other| other.uuid != candidate.uuid && other.objectives.dominates(&candidate.objectives))
        })
        .cloned()
        .collect()
}

/// Writes `pareto_front.txt` (CSV, sorted by original index) and copies
/// every surviving candidate's files into `front_dir`, renamed to a
/// contiguous `0..K-1` index in that same sorted order.
pub fn write_front(
    front_dir: &Path,
    survivors: &[ScoredCandidate],
    files_by_uuid: &std::collections::HashMap<Uuid, CandidateFiles>,
) -> Result<PathBuf> {
    std::fs::create_dir_all(front_dir)
        .with_context(|| format!("creating front directory {}", front_dir.display()))?;

    let mut sorted: Vec<&ScoredCandidate> = survivors.iter().collect();
    sorted.sort_by_key(|c| c.index);

    let mut csv = String::from("index,cost,load\n");
    for (new_index, candidate) in sorted.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{}\n",
            candidate.index, candidate.objectives.0[0], candidate.objectives.0[1]
        ));

        let Some(files) = files_by_uuid.get(&candidate.uuid) else {
            continue;
        };
        copy_renamed(&files.costs_path, front_dir, new_index, "costs.json")?;
        copy_renamed(&files.reportloads_path, front_dir, new_index, "reportloads.parquet")?;
        for sibling in &files.sibling_files {
            let Some(suffix) = sibling.file_name().and_then(|n| n.to_str()).and_then(|n| n.split_once('_')).map(|(_, rest)| rest) else {
                continue;
            };
            copy_renamed(sibling, front_dir, new_index, suffix)?;
        }
    }

    let csv_path = front_dir.join("pareto_front.txt");
    let tmp_path = csv_path.with_extension("txt.tmp");
    std::fs::write(&tmp_path, csv).with_context(|| format!("writing {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, &csv_path)
        .with_context(|| format!("renaming {} -> {}", tmp_path.display(), csv_path.display()))?;
    Ok(csv_path)
}

fn copy_renamed(src: &Path, front_dir: &Path, new_index: usize, suffix: &str) -> Result<()> {
    let dest = front_dir.join(format!("{new_index}_{suffix}"));
    std::fs::copy(src, &dest)
        .with_context(|| format!("copying {} -> {}", src.display(), dest.display()))?;
    Ok(())
}

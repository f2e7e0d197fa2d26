use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use bmp_aggregate::{pareto_filter, score_candidate, write_front, CandidateFiles};
use bmp_catalog::{CatalogPaths, ReferenceCatalog};
use bmp_core::{ArchiveEntry, CategoriesEnabled};
use bmp_dispatch::RunSession;
use bmp_encode::{initialize, EncodingLayout};
use bmp_epsilon::{run_sweep, write_dispatch_and_score, EpsilonSweepConfig};
use bmp_io::ScenarioWriter;
use bmp_search::{Archive, BatchEvaluator, PsoConfig, PsoDriver};

use bmp_cli::{config::RunConfig, load_run_config, Cli, Commands};

fn load_catalog(config: &RunConfig) -> Result<ReferenceCatalog> {
    ReferenceCatalog::load(CatalogPaths {
        base_scenario: &config.catalog.base_scenario,
        scenario_selection: &config.catalog.scenario_selection,
        county_adjacency: config.catalog.county_adjacency.as_deref(),
        manure_nutrients: config.catalog.manure_nutrients.as_deref(),
    })
    .context("loading reference catalog")
}

fn costs_path(working_dir: &std::path::Path, uuid: Uuid) -> PathBuf {
    working_dir.join(format!("{uuid}_costs.json"))
}

/// Runs the PSO search stage to convergence, returning its final archive.
fn run_search_stage(
    config: &RunConfig,
    catalog: &ReferenceCatalog,
    layout: &EncodingLayout,
    categories: CategoriesEnabled,
    session: &mut RunSession<bmp_dispatch::RedisBus>,
    working_dir: &std::path::Path,
) -> Result<Archive> {
    let mut rng = rand::rngs::StdRng::from_entropy();
    let pso_config = PsoConfig {
        nparts: config.search.nparts,
        nobjs: 2,
        max_iter: config.search.max_iter,
        w: config.search.w,
        c1: config.search.c1,
        c2: config.search.c2,
        lb: 0.0,
        ub: 1.0,
    };

    let nvars = layout.nvars;
    let mut driver = PsoDriver::initialize(
        pso_config,
        |rng| {
            let mut x = vec![0.0; nvars];
            initialize(layout, &mut x, rng);
            x
        },
        &mut rng,
    );

    let mut evaluator = BatchEvaluator {
        catalog,
        layout,
        categories,
        writer: ScenarioWriter::new(working_dir),
        session,
        batch_timeout: Duration::from_secs(config.dispatch.batch_timeout_secs),
        scenario_descriptor: catalog.scenario_descriptor.clone(),
    };

    driver.run(&mut evaluator, &mut rng)?;
    info!(generations = config.search.max_iter, archive_size = driver.archive.len(), "PSO search complete");
    Ok(driver.archive)
}

/// Refines the archive's minimum-, median-, and maximum-cost members
/// through the ε-constraint sweep, returning the union of the full PSO
/// archive and the sweep's `3×N` new candidates. The PSO archive already
/// holds only the run's non-dominated candidates, so there is no need to
/// carry forward every dominated per-generation evaluation just to have
/// the Aggregator's Pareto filter discard it again.
fn run_epsilon_stage(
    config: &RunConfig,
    catalog: &ReferenceCatalog,
    full_layout: &EncodingLayout,
    archive: &Archive,
    session: &mut RunSession<bmp_dispatch::RedisBus>,
    working_dir: &std::path::Path,
) -> Result<Vec<ArchiveEntry>> {
    let efficiency_only = CategoriesEnabled {
        efficiency: true,
        land_conversion: false,
        animal: false,
        manure: false,
    };
    let efficiency_layout = EncodingLayout::build(catalog, &efficiency_only);
    let sweep_config = EpsilonSweepConfig {
        rho: config.epsilon.rho,
        n: config.epsilon.n,
        max_iterations: config.epsilon.max_iterations,
        lb: 0.0,
        ub: 1.0,
    };
    let writer = ScenarioWriter::new(working_dir);
    let batch_timeout = Duration::from_secs(config.dispatch.batch_timeout_secs);

    let mut all: Vec<ArchiveEntry> = archive.entries().to_vec();
    let Some((min, median, max)) = archive.min_median_max_by_cost() else {
        return Ok(all);
    };
    for parent in [min, median, max] {
        let steps = run_sweep(catalog, full_layout, &efficiency_layout, parent, &sweep_config);
        match write_dispatch_and_score(
            &writer,
            session,
            &steps,
            &catalog.scenario_descriptor,
            batch_timeout,
            catalog.sel_pollutant,
        ) {
            Ok(refined) => all.extend(refined),
            Err(err) => tracing::warn!(parent = %parent.uuid, error = %err, "epsilon sweep failed for parent"),
        }
    }
    info!(total_candidates = all.len(), "epsilon-constraint refinement complete");
    Ok(all)
}

fn aggregate_and_write(entries: &[ArchiveEntry], working_dir: &std::path::Path, out_dir: &std::path::Path) -> Result<()> {
    let writer = ScenarioWriter::new(working_dir);
    let mut files_by_uuid = HashMap::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        files_by_uuid.insert(
            entry.uuid,
            CandidateFiles {
                index,
                uuid: entry.uuid,
                costs_path: costs_path(working_dir, entry.uuid),
                reportloads_path: writer.reportloads_path(entry.uuid),
                sibling_files: writer.sibling_paths(entry.uuid),
            },
        );
    }

    let scored: Vec<_> = files_by_uuid
        .values()
        .filter_map(|files| match score_candidate(files, 0) {
            Ok(scored) => Some(scored),
            Err(err) => {
                tracing::warn!(uuid = %files.uuid, error = %err, "dropping candidate missing simulator output");
                None
            }
        })
        .collect();

    let survivors = pareto_filter(scored);
    let csv_path = write_front(out_dir, &survivors, &files_by_uuid)?;
    info!(front_size = survivors.len(), path = %csv_path.display(), "Pareto front written");
    Ok(())
}

fn run_pipeline(config_path: &std::path::Path, out_dir: &std::path::Path) -> Result<()> {
    let config = load_run_config(config_path)?;
    let catalog = load_catalog(&config)?;
    let categories: CategoriesEnabled = config.categories.into();
    let layout = EncodingLayout::build(&catalog, &categories);

    let mut session = RunSession::connect(&config.dispatch.redis_url, Uuid::new_v4(), &config.working_dir)
        .context("connecting to dispatch message bus")?;

    let archive = run_search_stage(&config, &catalog, &layout, categories, &mut session, &config.working_dir)?;
    let refined = run_epsilon_stage(&config, &catalog, &layout, &archive, &mut session, &config.working_dir)?;
    aggregate_and_write(&refined, &config.working_dir, out_dir)
}

fn doctor() {
    println!("bmp-cli {}", env!("CARGO_PKG_VERSION"));
    let _ = rand::rngs::StdRng::from_entropy();
    println!("rng: ok");
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder().with_max_level(cli.log_level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    match &cli.command {
        Commands::Run { config, out } => run_pipeline(config, out),
        Commands::Search { config, out } => {
            let config = load_run_config(config)?;
            let catalog = load_catalog(&config)?;
            let categories: CategoriesEnabled = config.categories.into();
            let layout = EncodingLayout::build(&catalog, &categories);
            let mut session =
                RunSession::connect(&config.dispatch.redis_url, Uuid::new_v4(), &config.working_dir)?;
            let archive = run_search_stage(&config, &catalog, &layout, categories, &mut session, &config.working_dir)?;
            std::fs::create_dir_all(out)?;
            let json = serde_json::to_string_pretty(archive.entries())?;
            std::fs::write(out.join("archive.json"), json)?;
            Ok(())
        }
        Commands::Doctor {} => {
            doctor();
            Ok(())
        }
    }
}

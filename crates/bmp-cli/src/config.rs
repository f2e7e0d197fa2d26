//! Run configuration: the paths into the Reference Catalog's input files
//! plus the search and dispatch parameters, loaded from a TOML document.
//!
//! Per the design note on "Catalog loaded into process-global scope",
//! which category of BMP is enabled is an explicit run configuration
//! input here rather than something derived implicitly inside the
//! catalog loader.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use bmp_core::CategoriesEnabled;

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub base_scenario: PathBuf,
    pub scenario_selection: PathBuf,
    pub county_adjacency: Option<PathBuf>,
    pub manure_nutrients: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Categories {
    pub efficiency: bool,
    pub land_conversion: bool,
    pub animal: bool,
    pub manure: bool,
}

impl Default for Categories {
    fn default() -> Self {
        Self {
            efficiency: true,
            land_conversion: true,
            animal: true,
            manure: true,
        }
    }
}

impl From<Categories> for CategoriesEnabled {
    fn from(categories: Categories) -> Self {
        Self {
            efficiency: categories.efficiency,
            land_conversion: categories.land_conversion,
            animal: categories.animal,
            manure: categories.manure,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub nparts: usize,
    pub max_iter: usize,
    pub w: f64,
    pub c1: f64,
    pub c2: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            nparts: 20,
            max_iter: 20,
            w: 0.7,
            c1: 1.4,
            c2: 1.4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EpsilonConfig {
    pub rho: f64,
    pub n: usize,
    pub max_iterations: u64,
}

impl Default for EpsilonConfig {
    fn default() -> Self {
        Self {
            rho: 0.8,
            n: 4,
            max_iterations: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    pub redis_url: String,
    pub batch_timeout_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1/".to_string(),
            batch_timeout_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub categories: Categories,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub epsilon: EpsilonConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    pub working_dir: PathBuf,
}

pub fn load_run_config(path: &Path) -> Result<RunConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading run configuration {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing run configuration {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_minimal_run_config() {
        let toml = r#"
            working_dir = "/tmp/run"

            [catalog]
            base_scenario = "base.json"
            scenario_selection = "selection.json"

            [dispatch]
            redis_url = "redis://localhost/"
            batch_timeout_secs = 60
        "#;
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), toml).unwrap();

        let config = load_run_config(file.path()).unwrap();
        assert_eq!(config.search.nparts, 20);
        assert!(config.categories.efficiency);
        assert_eq!(config.dispatch.batch_timeout_secs, 60);
    }
}

//! Parses the scenario-selection JSON document: the user-chosen
//! BMP subset, optional cost overrides, and the reduction-target parameters
//! consumed by the ε-constraint driver.

use anyhow::{Context, Result};
use bmp_core::{BmpId, CostKey, CountyId, StateId};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::pollutant::Pollutant;

#[derive(Debug, Deserialize)]
pub struct ScenarioSelectionWire {
    pub selected_bmps: Vec<BmpId>,
    #[serde(default)]
    pub bmp_cost: Vec<CostOverrideEntry>,
    pub selected_reduction_target: f64,
    pub sel_pollutant: Pollutant,
    pub target_pct: f64,
    #[serde(default)]
    pub manure_counties: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CostOverrideEntry {
    pub state: StateId,
    pub bmp: BmpId,
    pub cost: f64,
}

pub struct ScenarioSelection {
    pub selected_bmps: HashSet<BmpId>,
    pub cost_overrides: HashMap<CostKey, f64>,
    pub selected_reduction_target: f64,
    pub sel_pollutant: Pollutant,
    pub target_pct: f64,
    pub manure_counties: HashSet<CountyId>,
}

pub fn load_scenario_selection(path: &Path) -> Result<ScenarioSelection> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario selection document '{}'", path.display()))?;
    let wire: ScenarioSelectionWire = serde_json::from_str(&text)
        .with_context(|| format!("parsing scenario selection document '{}'", path.display()))?;
    Ok(ScenarioSelection {
            selected_bmps: wire.selected_bmps.into_iter().collect(),
            cost_overrides: wire
                .bmp_cost
                .iter()
                .map(|e| (CostKey::new(e.state, e.bmp), e.cost))
                .collect(),
            selected_reduction_target: wire.selected_reduction_target,
            sel_pollutant: wire.sel_pollutant,
            target_pct: wire.target_pct,
            manure_counties: wire
                .manure_counties
                .iter()
                .filter_map(|s| s.trim().parse::<i32>().ok())
                .map(CountyId)
                .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn manure_counties_parse_from_strings() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
            "selected_bmps": [7, 9],
            "bmp_cost": [],
            "selected_reduction_target": 0.8,
            "sel_pollutant": "nitrogen",
            "target_pct": 80.0,
            "manure_counties": ["43"]
    }}"#
)
    .unwrap();
let selection = load_scenario_selection(file.path()).unwrap();
assert!(selection.manure_counties.contains(&CountyId(43)));
assert_eq!(selection.selected_bmps.len(), 2);
}
}

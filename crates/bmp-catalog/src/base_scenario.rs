//! Parses the base-scenario JSON document into intermediate
//! per-field maps. [`crate::catalog::ReferenceCatalog::load`] assembles these
//! into the derived catalog; nothing here applies selection filtering.

use anyhow::{Context, Result};
use bmp_core::{
    AgencyId, AnimalKey, BmpId, CostKey, CountyId, GeographyId, LoadSourceGroupId, LoadSourceId,
    LrsegId, ParcelKey, StateId,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::pollutant::Pollutant;

/// One destination a land-conversion BMP may move acreage to.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LandConversionDest {
    pub bmp: BmpId,
    pub dest_load_source: LoadSourceId,
}

/// Applicable fips/state/county/geography mapping for a parcel.
#[derive(Debug, Clone, Deserialize)]
pub struct ParcelGeo {
    pub fips: String,
    pub state: StateId,
    pub county: CountyId,
    pub geography: GeographyId,
}

/// Raw wire format of the base scenario JSON document. Field names mirror
/// the keys required by exactly so the document round-trips without a
/// translation layer.
#[derive(Debug, Deserialize)]
pub struct BaseScenarioWire {
    pub amount: Vec<AmountEntry>,
    pub bmp_cost: Vec<CostEntry>,
    pub animal_unit: Vec<AnimalUnitEntry>,
    pub animal_complete: Vec<AnimalCompleteEntry>,
    pub lrseg: Vec<LrsegEntry>,
    pub scenario_data_str: String,
    pub u_u_group: Vec<LoadSourceGroupEntry>,
    pub counties: Vec<CountyEntry>,
    pub counties2: Vec<CountyStateEntry>,
    pub efficiency: Vec<EfficiencyEntry>,
    pub phi: Vec<PhiEntry>,
    pub land_conversion_to: Vec<LandConversionEntry>,
    pub pct_by_valid_load: Vec<PctByValidLoadEntry>,
}

#[derive(Debug, Deserialize)]
pub struct AmountEntry {
    pub lrseg: LrsegId,
    pub agency: AgencyId,
    pub load_source: LoadSourceId,
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct CostEntry {
    pub state: StateId,
    pub bmp: BmpId,
    pub cost: f64,
}

#[derive(Debug, Deserialize)]
pub struct AnimalUnitEntry {
    pub base_condition: i32,
    pub county: CountyId,
    pub load_source: LoadSourceId,
    pub animal_id: bmp_core::AnimalId,
    pub count: f64,
}

/// The full animal-BMP catalog: which BMPs may be applied to which
/// load-source / animal combination.
#[derive(Debug, Deserialize)]
pub struct AnimalCompleteEntry {
    pub load_source: LoadSourceId,
    pub bmp: BmpId,
}

#[derive(Debug, Deserialize)]
pub struct LrsegEntry {
    pub lrseg: LrsegId,
    pub fips: String,
    pub state: StateId,
    pub county: CountyId,
    pub geography: GeographyId,
}

#[derive(Debug, Deserialize)]
pub struct LoadSourceGroupEntry {
    pub load_source: LoadSourceId,
    pub group: LoadSourceGroupId,
}

#[derive(Debug, Deserialize)]
pub struct CountyEntry {
    pub county: CountyId,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CountyStateEntry {
    pub county: CountyId,
    pub state: StateId,
}

#[derive(Debug, Deserialize)]
pub struct EfficiencyEntry {
    pub lrseg: LrsegId,
    pub agency: AgencyId,
    pub load_source: LoadSourceId,
    /// Each inner vec is one competing BMP group.
    pub groups: Vec<Vec<BmpId>>,
}

#[derive(Debug, Deserialize)]
pub struct PhiEntry {
    pub lrseg: LrsegId,
    pub agency: AgencyId,
    pub load_source: LoadSourceId,
    pub pollutant: Pollutant,
    pub phi: f64,
}

#[derive(Debug, Deserialize)]
pub struct LandConversionEntry {
    pub load_source: LoadSourceId,
    pub destinations: Vec<LandConversionDest>,
}

#[derive(Debug, Deserialize)]
pub struct PctByValidLoadEntry {
    pub lrseg: LrsegId,
    pub agency: AgencyId,
    pub load_source: LoadSourceId,
    pub pct: f64,
}

pub fn load_base_scenario(path: &Path) -> Result<BaseScenarioWire> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading base scenario document '{}'", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing base scenario document '{}'", path.display()))
}

/// Assembled lookup maps built once from the wire format; kept separate from
/// `ReferenceCatalog` so selection-filtering stays in `catalog.rs`.
pub struct BaseScenarioMaps {
    pub amount: HashMap<ParcelKey, f64>,
    pub bmp_cost: HashMap<CostKey, f64>,
    pub animal_unit: HashMap<AnimalKey, f64>,
    pub animal_bmps: HashMap<LoadSourceId, Vec<BmpId>>,
    pub scenario_descriptor: String,
    pub load_source_group: HashMap<LoadSourceId, LoadSourceGroupId>,
    pub county_names: HashMap<CountyId, String>,
    pub county_state: HashMap<CountyId, StateId>,
    pub efficiency_groups: HashMap<ParcelKey, Vec<Vec<BmpId>>>,
    pub phi: HashMap<(ParcelKey, Pollutant), f64>,
    pub land_conversion_to: HashMap<LoadSourceId, Vec<LandConversionDest>>,
    pub pct_by_valid_load: HashMap<ParcelKey, f64>,
    pub parcel_geo: HashMap<ParcelKey, ParcelGeo>,
}

impl From<BaseScenarioWire> for BaseScenarioMaps {
    fn from(wire: BaseScenarioWire) -> Self {
        let amount = wire
            .amount
            .iter()
            .map(|e| (ParcelKey::new(e.lrseg, e.agency, e.load_source), e.amount))
            .collect();
        let bmp_cost = wire
            .bmp_cost
            .iter()
            .map(|e| (CostKey::new(e.state, e.bmp), e.cost))
            .collect();
        let animal_unit = wire
            .animal_unit
            .iter()
            .map(|e| {
                (
                    AnimalKey {
                        base_condition: e.base_condition,
                        county: e.county,
                        load_source: e.load_source,
                        animal_id: e.animal_id,
                    },
                    e.count,
                )
        })
            .collect();
        let mut animal_bmps: HashMap<LoadSourceId, Vec<BmpId>> = HashMap::new();
        for entry in &wire.animal_complete {
            animal_bmps.entry(entry.load_source).or_default().push(entry.bmp);
        }
        let load_source_group = wire
            .u_u_group
            .iter()
            .map(|e| (e.load_source, e.group))
            .collect();
        let county_names = wire
            .counties
            .iter()
            .map(|e| (e.county, e.name.clone()))
            .collect();
        let county_state = wire
            .counties2
            .iter()
            .map(|e| (e.county, e.state))
            .collect();
        let efficiency_groups = wire
            .efficiency
            .iter()
            .map(|e| {
                (
                    ParcelKey::new(e.lrseg, e.agency, e.load_source),
                    e.groups.clone(),
                )
        })
            .collect();
        let phi = wire
            .phi
            .iter()
            .map(|e| {
                (
                    (ParcelKey::new(e.lrseg, e.agency, e.load_source), e.pollutant),
                    e.phi,
                )
        })
            .collect();
        let mut land_conversion_to: HashMap<LoadSourceId, Vec<LandConversionDest>> = HashMap::new();
        for entry in &wire.land_conversion_to {
            land_conversion_to
                .entry(entry.load_source)
                .or_default()
                .extend(entry.destinations.iter().copied());
        }
        let pct_by_valid_load = wire
            .pct_by_valid_load
            .iter()
            .map(|e| (ParcelKey::new(e.lrseg, e.agency, e.load_source), e.pct))
            .collect();
        let parcel_geo = wire
            .lrseg
            .iter()
            .flat_map(|lrseg_entry| {
                // Geography is attached per lrseg; every (agency, load_source) sharing
                // that lrseg inherits the same fips/state/county/geography tuple.
                wire.amount
                    .iter()
                    .filter(move |a| a.lrseg == lrseg_entry.lrseg)
                    .map(move |a| {
                        (
                            ParcelKey::new(a.lrseg, a.agency, a.load_source),
                            ParcelGeo {
                                fips: lrseg_entry.fips.clone(),
                                state: lrseg_entry.state,
                                county: lrseg_entry.county,
                                geography: lrseg_entry.geography,
                            },
                        )
                })
        })
            .collect();

        Self {
            amount,
            bmp_cost,
            animal_unit,
            animal_bmps,
            scenario_descriptor: wire.scenario_data_str,
            load_source_group,
            county_names,
            county_state,
            efficiency_groups,
            phi,
            land_conversion_to,
            pct_by_valid_load,
            parcel_geo,
        }
    }
}

//! Assembles the Reference Catalog: loads the base-scenario and
//! scenario-selection documents (plus county-adjacency and manure-nutrients
//! when manure is enabled) and derives the valid/invalid efficiency-key
//! split, the filtered land-conversion key set, and the manure inventory.
//!
//! The catalog is loaded once at process start and is immutable thereafter
//! (lifecycle); per the REDESIGN note on "Catalog loaded into
//! process-global scope", it is an explicitly-passed value rather than a
//! global static.

use anyhow::{Context, Result};
use bmp_core::{
    AnimalKey, BmpId, CostKey, CountyId, GeographyId, LoadSourceGroupId, LoadSourceId, LrsegId,
    ManureKey, ParcelKey, StateId,
};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::base_scenario::{load_base_scenario, BaseScenarioMaps, LandConversionDest, ParcelGeo};
use crate::manure::{build_manure_inventory, load_manure_nutrients, ManureEntry};
use crate::pollutant::Pollutant;
use crate::selection::{load_scenario_selection, ScenarioSelection};
use crate::adjacency::load_county_adjacency;

/// Minimum fractional parcel-area contribution for a land-conversion key to
/// be retained.
pub const LAND_CONVERSION_MIN_PCT: f64 = 0.10;

pub struct ReferenceCatalog {
    pub scenario_descriptor: String,
    pub amount: HashMap<ParcelKey, f64>,
    pub phi: HashMap<(ParcelKey, Pollutant), f64>,
    pub bmp_cost: HashMap<CostKey, f64>,
    pub load_source_group: HashMap<LoadSourceId, LoadSourceGroupId>,
    pub parcel_geo: HashMap<ParcelKey, ParcelGeo>,
    pub county_names: HashMap<CountyId, String>,
    pub county_state: HashMap<CountyId, StateId>,
    /// Derived from `parcel_geo`: the geography id of an arbitrary parcel in
    /// the county. Animal and manure rows are keyed by county, not by
    /// parcel, but still need a geography id for their output schema.
    pub county_geography: HashMap<CountyId, GeographyId>,
    /// Derived from `parcel_geo` the same way as `county_geography`.
    pub county_fips: HashMap<CountyId, String>,

    /// Efficiency keys whose BMP groups still intersect the selected set.
    pub valid_efficiency_keys: HashMap<ParcelKey, Vec<Vec<BmpId>>>,
    /// Efficiency keys with no remaining applicable group.
    pub invalid_efficiency_keys: HashSet<ParcelKey>,
    /// Fixed baseline load contributed by invalid keys, unaffected by any decision variable.
    pub sum_load_invalid: HashMap<Pollutant, f64>,
    /// Baseline (fully unreduced) load across valid keys; the ε-constraint scale.
    pub sum_load_valid: HashMap<Pollutant, f64>,

    pub land_conversion_to: HashMap<LoadSourceId, Vec<LandConversionDest>>,
    pub valid_land_conversion_keys: Vec<ParcelKey>,

    pub animal_unit: HashMap<AnimalKey, f64>,
    pub animal_bmps: HashMap<LoadSourceId, Vec<BmpId>>,

    pub manure_enabled: bool,
    pub manure_counties: HashSet<CountyId>,
    pub manure_inventory: HashMap<ManureKey, ManureEntry>,
    pub county_adjacency: HashMap<CountyId, Vec<CountyId>>,

    pub selected_bmps: HashSet<BmpId>,
    pub selected_reduction_target: f64,
    pub sel_pollutant: Pollutant,
    pub target_pct: f64,
}

pub struct CatalogPaths<'a> {
    pub base_scenario: &'a Path,
    pub scenario_selection: &'a Path,
    pub county_adjacency: Option<&'a Path>,
    pub manure_nutrients: Option<&'a Path>,
}

impl ReferenceCatalog {
    pub fn load(paths: CatalogPaths<'_>) -> Result<Self> {
        let base_wire = load_base_scenario(paths.base_scenario)?;
        let selection = load_scenario_selection(paths.scenario_selection)?;
        let lrseg_county: HashMap<LrsegId, CountyId> = base_wire
            .lrseg
            .iter()
            .map(|e| (e.lrseg, e.county))
            .collect();
        let maps: BaseScenarioMaps = base_wire.into();

        let manure_enabled = !selection.manure_counties.is_empty();
        let (county_adjacency, manure_inventory) = if manure_enabled {
            let adjacency_path = paths
                .county_adjacency
                .context("manure is enabled but no county-adjacency file was provided")?;
            let manure_path = paths
                .manure_nutrients
                .context("manure is enabled but no manure-nutrients file was provided")?;
            let adjacency = load_county_adjacency(adjacency_path)?;
            let rows = load_manure_nutrients(manure_path)?;
            let inventory = build_manure_inventory(
                &rows,
                &lrseg_county,
                &selection.manure_counties,
                &adjacency,
            );
            (adjacency, inventory)
        } else {
            (HashMap::new(), HashMap::new())
        };

        let (valid_efficiency_keys, invalid_efficiency_keys) =
            split_efficiency_keys(&maps.efficiency_groups, &selection.selected_bmps);

        let (sum_load_invalid, sum_load_valid) = baseline_loads(
            &maps.amount,
            &maps.phi,
            &valid_efficiency_keys,
            &invalid_efficiency_keys,
        );

        let valid_land_conversion_keys = filter_land_conversion_keys(
            &maps.amount,
            &maps.land_conversion_to,
            &maps.pct_by_valid_load,
        );

        let mut bmp_cost = maps.bmp_cost;
        bmp_cost.extend(selection.cost_overrides.iter().map(|(k, v)| (*k, *v)));

        let mut county_geography = HashMap::new();
        let mut county_fips = HashMap::new();
        for geo in maps.parcel_geo.values() {
            county_geography.entry(geo.county).or_insert(geo.geography);
            county_fips.entry(geo.county).or_insert_with(|| geo.fips.clone());
        }

        Ok(Self {
            scenario_descriptor: maps.scenario_descriptor,
            amount: maps.amount,
            phi: maps.phi,
            bmp_cost,
            load_source_group: maps.load_source_group,
            parcel_geo: maps.parcel_geo,
            county_names: maps.county_names,
            county_state: maps.county_state,
            county_geography,
            county_fips,
            valid_efficiency_keys,
            invalid_efficiency_keys,
            sum_load_invalid,
            sum_load_valid,
            land_conversion_to: maps.land_conversion_to,
            valid_land_conversion_keys,
            animal_unit: maps.animal_unit,
            animal_bmps: maps.animal_bmps,
            manure_enabled,
            manure_counties: selection.manure_counties,
            manure_inventory,
            county_adjacency,
            selected_bmps: selection.selected_bmps,
            selected_reduction_target: selection.selected_reduction_target,
            sel_pollutant: selection.sel_pollutant,
            target_pct: selection.target_pct,
        })
    }
}

fn split_efficiency_keys(
    efficiency_groups: &HashMap<ParcelKey, Vec<Vec<BmpId>>>,
    selected_bmps: &HashSet<BmpId>,
) -> (HashMap<ParcelKey, Vec<Vec<BmpId>>>, HashSet<ParcelKey>) {
    let mut valid = HashMap::new();
    let mut invalid = HashSet::new();
    for (key, groups) in efficiency_groups {
        let filtered: Vec<Vec<BmpId>> = groups
            .iter()
            .filter_map(|group| {
                let kept: Vec<BmpId> = group
                    .iter()
                    .copied()
                    .filter(|bmp| selected_bmps.contains(bmp))
                    .collect();
                if kept.is_empty() {
                    None
                } else {
                    Some(kept)
                }
            })
            .collect();
        if filtered.is_empty() {
            invalid.insert(*key);
        } else {
            valid.insert(*key, filtered);
        }
    }
    (valid, invalid)
}

fn baseline_loads(
    amount: &HashMap<ParcelKey, f64>,
    phi: &HashMap<(ParcelKey, Pollutant), f64>,
    valid_keys: &HashMap<ParcelKey, Vec<Vec<BmpId>>>,
    invalid_keys: &HashSet<ParcelKey>,
) -> (HashMap<Pollutant, f64>, HashMap<Pollutant, f64>) {
    let mut sum_invalid = HashMap::new();
    let mut sum_valid = HashMap::new();
    for pollutant in Pollutant::ALL {
        let mut invalid_total = 0.0;
        let mut valid_total = 0.0;
        for (key, amt) in amount {
            let Some(&phi_value) = phi.get(&(*key, pollutant)) else {
                continue;
            };
            let load = amt * phi_value;
            if invalid_keys.contains(key) {
                invalid_total += load;
            } else if valid_keys.contains_key(key) {
                valid_total += load;
            }
        }
        sum_invalid.insert(pollutant, invalid_total);
        sum_valid.insert(pollutant, valid_total);
    }
    (sum_invalid, sum_valid)
}

fn filter_land_conversion_keys(
    amount: &HashMap<ParcelKey, f64>,
    land_conversion_to: &HashMap<LoadSourceId, Vec<LandConversionDest>>,
    pct_by_valid_load: &HashMap<ParcelKey, f64>,
) -> Vec<ParcelKey> {
    let mut keys: Vec<ParcelKey> = amount
        .keys()
        .filter(|key| land_conversion_to.contains_key(&key.load_source))
        .filter(|key| {
            pct_by_valid_load
                .get(key)
                .map(|pct| *pct > LAND_CONVERSION_MIN_PCT)
                .unwrap_or(false)
        })
        .copied()
        .collect();
    keys.sort();
    keys
}

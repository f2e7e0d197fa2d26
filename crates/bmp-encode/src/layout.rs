//! Decision-vector layout: the four blocks
//! (efficiency, land-conversion, animal, manure) occupy fixed contiguous
//! ranges in a fixed order, derived deterministically from the Reference
//! Catalog and the run's enabled-categories configuration.
//!
//! Within each block, one group occupies one slack variable followed by one
//! variable per candidate item (invariant 2). The layout is built once per
//! run and shared by `initialize` and every `normalize_*` call so that a
//! given index in `x` always means the same thing.

use bmp_catalog::ReferenceCatalog;
use bmp_core::{AnimalKey, BmpId, CategoriesEnabled, CountyId, LoadSourceId, ManureKey, ParcelKey};

pub struct EfficiencyGroupSlot {
    pub key: ParcelKey,
    pub group_index: usize,
    pub bmps: Vec<BmpId>,
    pub offset: usize,
}

pub struct LandConversionSlot {
    pub key: ParcelKey,
    /// `(bmp, destination load source)` options, crossed over the land
    /// source's configured destinations and filtered to selected BMPs.
    pub destinations: Vec<(BmpId, LoadSourceId)>,
    pub offset: usize,
}

pub struct AnimalSlot {
    pub key: AnimalKey,
    pub bmps: Vec<BmpId>,
    pub offset: usize,
}

pub struct ManureSlot {
    pub key: ManureKey,
    /// `(destination county, bmp)` options, crossed over the source's
    /// neighbor counties and the load source's selected animal BMPs.
    pub destinations: Vec<(CountyId, BmpId)>,
    pub offset: usize,
}

#[derive(Default)]
pub struct EncodingLayout {
    pub efficiency: Vec<EfficiencyGroupSlot>,
    pub land_conversion: Vec<LandConversionSlot>,
    pub animal: Vec<AnimalSlot>,
    pub manure: Vec<ManureSlot>,
    pub nvars: usize,
}

impl EncodingLayout {
    pub fn build(catalog: &ReferenceCatalog, categories: &CategoriesEnabled) -> Self {
        let mut offset = 0usize;
        let mut efficiency = Vec::new();
        if categories.efficiency {
            let mut keys: Vec<ParcelKey> = catalog.valid_efficiency_keys.keys().copied().collect();
            keys.sort();
            for key in keys {
                let groups = &catalog.valid_efficiency_keys[&key];
                for (group_index, bmps) in groups.iter().enumerate() {
                    efficiency.push(EfficiencyGroupSlot {
                            key,
                            group_index,
                            bmps: bmps.clone(),
                            offset,
                    });
                    offset += 1 + bmps.len();
                }
            }
        }

        let mut land_conversion = Vec::new();
        if categories.land_conversion {
            for key in &catalog.valid_land_conversion_keys {
                let destinations: Vec<(BmpId, LoadSourceId)> = catalog
                    .land_conversion_to
                    .get(&key.load_source)
                    .map(|dests| {
                        dests
                            .iter()
                            .filter(|d| catalog.selected_bmps.contains(&d.bmp))
                            .map(|d| (d.bmp, d.dest_load_source))
                            .collect()
                })
                    .unwrap_or_default();
                if destinations.is_empty() {
                    continue;
                }
                let size = destinations.len();
                land_conversion.push(LandConversionSlot {
                        key: *key,
                        destinations,
                        offset,
                });
                offset += 1 + size;
            }
        }

        let mut animal = Vec::new();
        if categories.animal {
            let mut keys: Vec<AnimalKey> = catalog.animal_unit.keys().copied().collect();
            keys.sort();
            for key in keys {
                let bmps = selected_bmps_for(catalog, key.load_source);
                if bmps.is_empty() {
                    continue;
                }
                let size = bmps.len();
                animal.push(AnimalSlot { key, bmps, offset });
                offset += 1 + size;
            }
        }

        let mut manure = Vec::new();
        if categories.manure {
            let mut keys: Vec<ManureKey> = catalog.manure_inventory.keys().copied().collect();
            keys.sort();
            for key in keys {
                let entry = &catalog.manure_inventory[&key];
                let bmps = selected_bmps_for(catalog, key.load_source);
                let destinations: Vec<(CountyId, BmpId)> = entry
                    .neighbors
                    .iter()
                    .flat_map(|county| bmps.iter().map(move |bmp| (*county, *bmp)))
                    .collect();
                if destinations.is_empty() {
                    continue;
                }
                let size = destinations.len();
                manure.push(ManureSlot {
                        key,
                        destinations,
                        offset,
                });
                offset += 1 + size;
            }
        }

        Self {
            efficiency,
            land_conversion,
            animal,
            manure,
            nvars: offset,
        }
    }
}

fn selected_bmps_for(catalog: &ReferenceCatalog, load_source: LoadSourceId) -> Vec<BmpId> {
    catalog
        .animal_bmps
        .get(&load_source)
        .map(|list| {
            list.iter()
                .copied()
                .filter(|bmp| catalog.selected_bmps.contains(bmp))
                .collect()
    })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn empty_catalog_with(selected: HashSet<BmpId>) -> ReferenceCatalog {
        // Lightweight manual construction mirroring `ReferenceCatalog::load`'s
        // output shape, avoiding the need for fixture files in a layout test.
        ReferenceCatalog {
            scenario_descriptor: String::new(),
            amount: Default::default(),
            phi: Default::default(),
            bmp_cost: Default::default(),
            load_source_group: Default::default(),
            parcel_geo: Default::default(),
            county_names: Default::default(),
            county_state: Default::default(),
            county_geography: Default::default(),
            county_fips: Default::default(),
            valid_efficiency_keys: Default::default(),
            invalid_efficiency_keys: Default::default(),
            sum_load_invalid: Default::default(),
            sum_load_valid: Default::default(),
            land_conversion_to: Default::default(),
            valid_land_conversion_keys: Vec::new(),
            animal_unit: Default::default(),
            animal_bmps: Default::default(),
            manure_enabled: false,
            manure_counties: Default::default(),
            manure_inventory: Default::default(),
            county_adjacency: Default::default(),
            selected_bmps: selected,
            selected_reduction_target: 0.0,
            sel_pollutant: bmp_catalog::Pollutant::Nitrogen,
            target_pct: 0.0,
        }
    }

    #[test]
    fn nvars_zero_when_no_categories_enabled() {
        let catalog = empty_catalog_with(HashSet::new());
        let categories = CategoriesEnabled {
            efficiency: false,
            land_conversion: false,
            animal: false,
            manure: false,
        };
        let layout = EncodingLayout::build(&catalog, &categories);
        assert_eq!(layout.nvars, 0);
    }
}

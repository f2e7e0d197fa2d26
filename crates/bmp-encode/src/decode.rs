//! Assembles all four `normalize_*` outputs into one [`DecodedTables`] per
//! candidate. All four tables are always produced, even when empty.

use bmp_catalog::ReferenceCatalog;
use bmp_core::DecodedTables;

use crate::animal::normalize_animal;
use crate::efficiency::normalize_efficiency;
use crate::land_conversion::normalize_land_conversion;
use crate::layout::EncodingLayout;
use crate::manure::normalize_manure;

pub fn decode_candidate(layout: &EncodingLayout, catalog: &ReferenceCatalog, x: &[f64]) -> DecodedTables {
    let efficiency = normalize_efficiency(layout, x);
    let land = normalize_land_conversion(layout, catalog, x);
    let animal = normalize_animal(layout, catalog, x);
    let manure = normalize_manure(layout, catalog, x);

    DecodedTables {
        efficiency,
        land_conversion: land.rows,
        animal: animal.rows,
        manure: manure.rows,
        ef_cost: 0.0,
        lc_cost: land.cost,
        animal_cost: animal.cost,
        manure_cost: manure.cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmp_core::CategoriesEnabled;
    use std::collections::HashSet;

    fn test_catalog() -> ReferenceCatalog {
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
            selected_bmps: HashSet::new(),
            selected_reduction_target: 0.0,
            sel_pollutant: bmp_catalog::Pollutant::Nitrogen,
            target_pct: 0.0,
        }
    }

    #[test]
    fn empty_catalog_yields_empty_tables_with_zero_cost() {
        let catalog = test_catalog();
        let categories = CategoriesEnabled {
            efficiency: true,
            land_conversion: false,
            animal: false,
            manure: false,
        };
        let layout = EncodingLayout::build(&catalog, &categories);
        let x: Vec<f64> = vec![];
        let tables = decode_candidate(&layout, &catalog, &x);
        assert!(tables.efficiency.is_empty());
        assert_eq!(tables.total_cost(), 0.0);
    }
}

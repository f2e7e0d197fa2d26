//! `normalize_animal(x) -> (table, cost)`. Per-BMP cap `0.30`,
//! analogous to land-conversion.
//!
//! OPEN QUESTION (not resolved here, see `DESIGN.md`): cost is computed as a
//! flat `Σ unit_cost[state, bmp]` per emitted row, not multiplied by
//! `amount`, unlike land and manure cost. This is reproduced exactly rather
//! than silently corrected.

use bmp_catalog::ReferenceCatalog;
use bmp_core::{AnimalRow, CostKey, LoadSourceGroupId};

use crate::layout::EncodingLayout;
use crate::share::normalized_shares;

pub const CATEGORY_CAP: f64 = 0.30;
pub const EMIT_THRESHOLD: f64 = 1.0;

pub struct AnimalOutput {
    pub rows: Vec<AnimalRow>,
    pub cost: f64,
}

pub fn normalize_animal(layout: &EncodingLayout, catalog: &ReferenceCatalog, x: &[f64]) -> AnimalOutput {
    let mut rows = Vec::new();
    let mut cost = 0.0;

    for slot in &layout.animal {
        let Some(&state) = catalog.county_state.get(&slot.key.county) else {
            continue;
        };
        let geography = catalog
            .county_geography
            .get(&slot.key.county)
            .copied()
            .unwrap_or(bmp_core::GeographyId(0));
        let baseline = catalog.animal_unit.get(&slot.key).copied().unwrap_or(0.0);
        let shares = normalized_shares(x, slot.offset, slot.bmps.len());

        for (bmp, share) in slot.bmps.iter().zip(shares) {
            let amount = share * CATEGORY_CAP * baseline;
            if amount <= EMIT_THRESHOLD {
                continue;
            }

            let unit_cost = catalog
                .bmp_cost
                .get(&CostKey::new(state, *bmp))
                .copied()
                .unwrap_or(0.0);
            // Reproduces the source's flat per-row cost:
            // amount is intentionally not a factor here.
            cost += unit_cost;

            let row_index = rows.len() as i32;
            rows.push(AnimalRow {
                    bmp_submitted_id: row_index,
                    agency_id: bmp_core::AgencyId(0),
                    state_unique_identifier: String::new(),
                    state_id: state,
                    bmp_id: *bmp,
                    geography_id: geography,
                    load_source_group_id: catalog
                        .load_source_group
                        .get(&slot.key.load_source)
                        .copied()
                        .unwrap_or(LoadSourceGroupId(0)),
                    unit_id: 1,
                    amount,
                    is_valid: true,
                    error_message: String::new(),
                    row_index,
                    animal_group_id: slot.key.base_condition,
                    n_reduction_fraction: 0.0,
                    p_reduction_fraction: 0.0,
                    county: slot.key.county,
                    load_source: slot.key.load_source,
                    animal_id: slot.key.animal_id,
            });
        }
    }

    AnimalOutput { rows, cost }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::AnimalSlot;
    use bmp_core::{AnimalId, AnimalKey, BmpId, CountyId, LoadSourceId, StateId};
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
    fn cost_is_flat_per_row_not_scaled_by_amount() {
        let key = AnimalKey {
            base_condition: 1,
            county: CountyId(43),
            load_source: LoadSourceId(17),
            animal_id: AnimalId(1),
        };
        let mut catalog = test_catalog();
        catalog.animal_unit.insert(key, 1000.0);
        catalog.county_state.insert(CountyId(43), StateId(1));
        catalog
            .bmp_cost
            .insert(CostKey::new(StateId(1), BmpId(9)), 5.0);

        let layout = EncodingLayout {
            animal: vec![AnimalSlot {
                    key,
                    bmps: vec![BmpId(9)],
                    offset: 0,
            }],
            nvars: 2,
            ..Default::default()
        };
        // slack=0, bmp=1 -> share=1, amount = 1 * 0.30 * 1000 = 300
        let x = vec![0.0, 1.0];
        let out = normalize_animal(&layout, &catalog, &x);
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].amount, 300.0);
        // cost is the flat unit cost, NOT amount * unit_cost (300 * 5 = 1500)
        assert_eq!(out.cost, 5.0);
    }
}

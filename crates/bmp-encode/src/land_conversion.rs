//! `normalize_land_conversion(x) -> (table, amount_minus, amount_plus, cost)`.
//! Per-BMP cap `0.30`; a row is emitted only when its amount
//! strictly exceeds 1 unit (invariant 5); acreage removed from the source
//! parcel and added to each destination parcel is tracked for the
//! conservation check (invariant 4).

use std::collections::HashMap;

use bmp_catalog::ReferenceCatalog;
use bmp_core::{CostKey, LandConversionRow, LoadSourceGroupId, ParcelKey};

use crate::layout::EncodingLayout;
use crate::share::normalized_shares;

pub const CATEGORY_CAP: f64 = 0.30;
pub const EMIT_THRESHOLD: f64 = 1.0;

pub struct LandConversionOutput {
    pub rows: Vec<LandConversionRow>,
    pub amount_minus: HashMap<ParcelKey, f64>,
    pub amount_plus: HashMap<ParcelKey, f64>,
    pub cost: f64,
}

pub fn normalize_land_conversion(
    layout: &EncodingLayout,
    catalog: &ReferenceCatalog,
    x: &[f64],
) -> LandConversionOutput {
    let mut rows = Vec::new();
    let mut amount_minus: HashMap<ParcelKey, f64> = HashMap::new();
    let mut amount_plus: HashMap<ParcelKey, f64> = HashMap::new();
    let mut cost = 0.0;

    for slot in &layout.land_conversion {
        let Some(geo) = catalog.parcel_geo.get(&slot.key) else {
            continue;
        };
        let baseline = catalog.amount.get(&slot.key).copied().unwrap_or(0.0);
        let shares = normalized_shares(x, slot.offset, slot.destinations.len());

        for ((bmp, dest_load_source), share) in slot.destinations.iter().zip(shares) {
            let amount = share * CATEGORY_CAP * baseline;
            if amount <= EMIT_THRESHOLD {
                continue;
            }

            let unit_cost = catalog
                .bmp_cost
                .get(&CostKey::new(geo.state, *bmp))
                .copied()
                .unwrap_or(0.0);
            cost += amount * unit_cost;

            *amount_minus.entry(slot.key).or_insert(0.0) += amount;
            let dest_key = ParcelKey::new(slot.key.lrseg, slot.key.agency, *dest_load_source);
            *amount_plus.entry(dest_key).or_insert(0.0) += amount;

            let row_index = rows.len() as i32;
            rows.push(LandConversionRow {
                    bmp_submitted_id: row_index,
                    agency_id: slot.key.agency,
                    state_unique_identifier: geo.fips.clone(),
                    state_id: geo.state,
                    bmp_id: *bmp,
                    geography_id: geo.geography,
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
                    lrseg: slot.key.lrseg.value(),
                    load_source: slot.key.load_source,
            });
        }
    }

    LandConversionOutput {
        rows,
        amount_minus,
        amount_plus,
        cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LandConversionSlot;
    use bmp_catalog::base_scenario::ParcelGeo;
    use bmp_core::{AgencyId, BmpId, GeographyId, LoadSourceId, LrsegId, StateId};
    use std::collections::HashSet;

    fn sample_catalog_and_layout() -> (ReferenceCatalog, EncodingLayout) {
        let key = ParcelKey::new(LrsegId(1), AgencyId(2), LoadSourceId(17));
        let mut catalog = test_catalog();
        catalog.amount.insert(key, 100.0);
        catalog.parcel_geo.insert(
            key,
            ParcelGeo {
                fips: "51001".into(),
                state: StateId(1),
                county: bmp_core::CountyId(43),
                geography: GeographyId(9),
            },
        );
        catalog
            .bmp_cost
            .insert(CostKey::new(StateId(1), BmpId(7)), 2.0);

        let layout = EncodingLayout {
            land_conversion: vec![LandConversionSlot {
                    key,
                    destinations: vec![(BmpId(7), LoadSourceId(20))],
                    offset: 0,
            }],
            nvars: 2,
            ..Default::default()
        };
        (catalog, layout)
    }

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
    fn emits_row_and_balances_minus_plus_above_threshold() {
        let (catalog, layout) = sample_catalog_and_layout();
        // slack=0, bmp=1.0 -> share=1.0, amount = 1.0 * 0.30 * 100 = 30
        let x = vec![0.0, 1.0];
        let out = normalize_land_conversion(&layout, &catalog, &x);
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].amount, 30.0);
        assert_eq!(out.cost, 60.0); // 30 * unit_cost(2.0)

        let minus_total: f64 = out.amount_minus.values().sum();
        let plus_total: f64 = out.amount_plus.values().sum();
        assert_eq!(minus_total, plus_total);
    }

    #[test]
    fn suppresses_rows_at_or_below_threshold() {
        let (catalog, layout) = sample_catalog_and_layout();
        // amount = share * 0.30 * 100; share small enough to stay <= 1
        let x = vec![100.0, 0.01];
        let out = normalize_land_conversion(&layout, &catalog, &x);
        assert!(out.rows.is_empty());
        assert!(out.amount_minus.is_empty());
    }
}

//! `normalize_efficiency(x) -> table`. No cost is attached here;
//! efficiency shares feed the pollutant model only.

use bmp_catalog::ReferenceCatalog;
use bmp_core::{EfficiencyShare, LandConversionRow, LoadSourceGroupId};

use crate::layout::EncodingLayout;
use crate::share::normalized_shares;

pub const EMIT_THRESHOLD: f64 = 1.0;

/// `((lrseg, agency, load_source), group_index, per-bmp shares)`, matching
/// the shape `bmp_core::DecodedTables::efficiency` expects.
pub type EfficiencyTable = Vec<((i32, i32, i32), i32, Vec<EfficiencyShare>)>;

pub fn normalize_efficiency(layout: &EncodingLayout, x: &[f64]) -> EfficiencyTable {
    layout
        .efficiency
        .iter()
        .map(|slot| {
            let shares = normalized_shares(x, slot.offset, slot.bmps.len());
            let entries = slot
                .bmps
                .iter()
                .zip(shares)
                .map(|(bmp, share)| EfficiencyShare {
                    bmp_id: *bmp,
                    share,
            })
                .collect();
            (
                (
                    slot.key.lrseg.value(),
                    slot.key.agency.value(),
                    slot.key.load_source.value(),
                ),
                slot.group_index as i32,
                entries,
            )
    })
        .collect()
}

/// Converts solved efficiency shares into land-BMP rows: on the wire, an
/// efficiency assignment is serialized through the same
/// `impbmpsubmittedland` file normal land-conversion rows use, not through
/// a separate efficiency file. A row is emitted only when its amount
/// strictly exceeds 1 unit (invariant 5); efficiency carries no per-BMP
/// cap (invariant 3 names only land-conversion, animal, and manure).
pub fn efficiency_rows_as_land(
    layout: &EncodingLayout,
    catalog: &ReferenceCatalog,
    x: &[f64],
) -> Vec<LandConversionRow> {
    let mut rows = Vec::new();
    for slot in &layout.efficiency {
        let Some(geo) = catalog.parcel_geo.get(&slot.key) else {
            continue;
        };
        let baseline = catalog.amount.get(&slot.key).copied().unwrap_or(0.0);
        let shares = normalized_shares(x, slot.offset, slot.bmps.len());

        for (bmp, share) in slot.bmps.iter().zip(shares) {
            let amount = share * baseline;
            if amount <= EMIT_THRESHOLD {
                continue;
            }

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
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::EfficiencyGroupSlot;
    use bmp_core::{AgencyId, BmpId, LoadSourceId, LrsegId, ParcelKey};

    #[test]
    fn shares_are_normalized_per_group() {
        let layout = EncodingLayout {
            efficiency: vec![EfficiencyGroupSlot {
                    key: ParcelKey::new(LrsegId(1), AgencyId(2), LoadSourceId(17)),
                    group_index: 0,
                    bmps: vec![BmpId(7), BmpId(9)],
                    offset: 0,
            }],
            nvars: 3,
            ..Default::default()
        };
        let x = vec![1.0, 1.0, 2.0]; // slack=1, bmp7=1, bmp9=2 -> denom=4
        let table = normalize_efficiency(&layout, &x);
        assert_eq!(table.len(), 1);
        let (key, group, shares) = &table[0];
        assert_eq!(*key, (1, 2, 17));
        assert_eq!(*group, 0);
        assert!((shares[0].share - 0.25).abs() < 1e-12);
        assert!((shares[1].share - 0.5).abs() < 1e-12);
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
            selected_bmps: Default::default(),
            selected_reduction_target: 0.0,
            sel_pollutant: bmp_catalog::Pollutant::Nitrogen,
            target_pct: 0.0,
        }
    }

    #[test]
    fn solved_shares_serialize_as_land_rows_above_threshold() {
        let key = ParcelKey::new(LrsegId(1), AgencyId(2), LoadSourceId(17));
        let mut catalog = test_catalog();
        catalog.amount.insert(key, 100.0);
        catalog.parcel_geo.insert(
            key,
            bmp_catalog::base_scenario::ParcelGeo {
                fips: "51001".into(),
                state: bmp_core::StateId(1),
                county: bmp_core::CountyId(43),
                geography: bmp_core::GeographyId(9),
            },
        );

        let layout = EncodingLayout {
            efficiency: vec![EfficiencyGroupSlot {
                key,
                group_index: 0,
                bmps: vec![BmpId(7), BmpId(9)],
                offset: 0,
            }],
            nvars: 3,
            ..Default::default()
        };
        // slack=0, bmp7=1.0 -> share=1.0 -> amount=100 (emitted); bmp9=0 -> amount=0 (suppressed)
        let x = vec![0.0, 1.0, 0.0];
        let rows = efficiency_rows_as_land(&layout, &catalog, &x);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].bmp_id, BmpId(7));
        assert_eq!(rows[0].amount, 100.0);
        assert_eq!(rows[0].state_id, bmp_core::StateId(1));
    }
}

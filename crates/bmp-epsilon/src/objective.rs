//! Cost and residual-load functions over the efficiency-BMP share
//! representation (the ε-Constraint Driver's decision variables).
//!
//! Efficiency normalization applies no category cap (unlike land/animal/
//! manure, invariant 3 only lists those three); cost here is
//! `Σ amount × unit_cost[state,bmp]` with `amount = baseline × share`,
//! mirroring the land-conversion cost formula without the 0.30 factor.
//!
//! Residual load per pollutant models each efficiency key's groups as
//! independent, multiplicatively stacking reductions: a key's remaining
//! load fraction is `Π_groups (1 - Σ shares in group)`. This is not
//! specified by the wire protocol (the simulator computes the real
//! number); it exists only to drive the NLP's constraint and objective
//! locally before dispatch confirms the true value.

use std::collections::HashMap;

use bmp_catalog::{Pollutant, ReferenceCatalog};
use bmp_core::{CostKey, ParcelKey};
use bmp_encode::{normalized_shares, EncodingLayout};

pub fn efficiency_cost(layout: &EncodingLayout, catalog: &ReferenceCatalog, x: &[f64]) -> f64 {
    let mut cost = 0.0;
    for slot in &layout.efficiency {
        let Some(geo) = catalog.parcel_geo.get(&slot.key) else {
            continue;
        };
        let baseline = catalog.amount.get(&slot.key).copied().unwrap_or(0.0);
        let shares = normalized_shares(x, slot.offset, slot.bmps.len());
        for (bmp, share) in slot.bmps.iter().zip(shares) {
            let amount = baseline * share;
            let unit_cost = catalog
                .bmp_cost
                .get(&CostKey::new(geo.state, *bmp))
                .copied()
                .unwrap_or(0.0);
            cost += amount * unit_cost;
        }
    }
    cost
}

pub fn residual_load(layout: &EncodingLayout, catalog: &ReferenceCatalog, x: &[f64], pollutant: Pollutant) -> f64 {
    let mut remaining_by_key: HashMap<ParcelKey, f64> = HashMap::new();
    for slot in &layout.efficiency {
        let shares = normalized_shares(x, slot.offset, slot.bmps.len());
        let group_share_sum: f64 = shares.iter().sum();
        let remaining_fraction = (1.0 - group_share_sum).max(0.0);
        *remaining_by_key.entry(slot.key).or_insert(1.0) *= remaining_fraction;
    }

    let mut load = catalog.sum_load_invalid.get(&pollutant).copied().unwrap_or(0.0);
    for (key, remaining_fraction) in remaining_by_key {
        let baseline = catalog.amount.get(&key).copied().unwrap_or(0.0);
        let phi = catalog.phi.get(&(key, pollutant)).copied().unwrap_or(0.0);
        load += baseline * phi * remaining_fraction;
    }
    load
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::tests::single_key_layout_and_catalog;

    #[test]
    fn full_adoption_drives_residual_toward_invalid_baseline() {
        let (catalog, layout) = single_key_layout_and_catalog();
        let x = vec![0.0, 1.0]; // slack=0, bmp share=1.0 -> full adoption
        let load = residual_load(&layout, &catalog, &x, Pollutant::Nitrogen);
        assert!((load - catalog.sum_load_invalid[&Pollutant::Nitrogen]).abs() < 1e-9);
    }

    #[test]
    fn zero_adoption_leaves_baseline_load_untouched() {
        let (catalog, layout) = single_key_layout_and_catalog();
        let x = vec![1.0, 0.0]; // slack=1, bmp share=0.0 -> no adoption
        let load = residual_load(&layout, &catalog, &x, Pollutant::Nitrogen);
        let expected = catalog.sum_load_invalid[&Pollutant::Nitrogen] + 100.0 * 0.5;
        assert!((load - expected).abs() < 1e-9);
    }

    #[test]
    fn cost_scales_with_baseline_and_unit_cost() {
        let (catalog, layout) = single_key_layout_and_catalog();
        let x = vec![0.0, 1.0];
        let cost = efficiency_cost(&layout, &catalog, &x);
        assert_eq!(cost, 100.0 * 2.0);
    }
}

//! Row types for the four BMP-assignment tables and the bit-exact Parquet
//! schemas they map onto. These are plain value structs; the Parquet and
//! JSON encodings live in `bmp-io` so this crate stays free of any I/O
//! dependency.

use crate::ids::{
    AgencyId, AnimalId, BmpId, CountyId, GeographyId, LoadSourceGroupId, LoadSourceId, StateId,
};
use serde::{Deserialize, Serialize};

/// A single land-conversion BMP assignment row.
///
/// Only emitted when `amount > 1` (invariant 5); the table as a whole is
/// still always produced, possibly empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandConversionRow {
    pub bmp_submitted_id: i32,
    pub agency_id: AgencyId,
    pub state_unique_identifier: String,
    pub state_id: StateId,
    pub bmp_id: BmpId,
    pub geography_id: GeographyId,
    pub load_source_group_id: LoadSourceGroupId,
    pub unit_id: i32,
    pub amount: f64,
    pub is_valid: bool,
    pub error_message: String,
    pub row_index: i32,
    /// Not part of the wire schema; carried for the writer's composite-key JSON shadow.
    pub lrseg: i32,
    pub load_source: LoadSourceId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalRow {
    pub bmp_submitted_id: i32,
    pub agency_id: AgencyId,
    pub state_unique_identifier: String,
    pub state_id: StateId,
    pub bmp_id: BmpId,
    pub geography_id: GeographyId,
    pub load_source_group_id: LoadSourceGroupId,
    pub unit_id: i32,
    pub amount: f64,
    pub is_valid: bool,
    pub error_message: String,
    pub row_index: i32,
    pub animal_group_id: i32,
    pub n_reduction_fraction: f64,
    pub p_reduction_fraction: f64,
    /// Not part of the wire schema; carried for the writer's composite-key JSON shadow.
    pub county: CountyId,
    pub load_source: LoadSourceId,
    pub animal_id: AnimalId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManureTransportRow {
    pub bmp_submitted_id: i32,
    pub agency_id: AgencyId,
    pub state_unique_identifier: String,
    pub state_id: StateId,
    pub bmp_id: BmpId,
    pub amount: f64,
    pub is_valid: bool,
    pub error_message: String,
    pub row_index: i32,
    pub has_state_reference: bool,
    pub county_id_from: CountyId,
    pub county_id_to: CountyId,
    pub fips_from: String,
    pub fips_to: String,
    /// Not part of the wire schema; carried for the writer's composite-key JSON shadow.
    pub load_source: LoadSourceId,
    pub animal_id: AnimalId,
}

/// Normalized share of one BMP within one group at one efficiency key.
///
/// Efficiency shares feed the pollutant model only; no cost is attached to
/// this table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyShare {
    pub bmp_id: BmpId,
    pub share: f64,
}

/// All four decoded tables for one candidate plus their cost decomposition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecodedTables {
    /// keyed by `(parcel_key, group_index)` -> per-bmp shares, see `bmp-encode`.
    /// Internal share representation only: there is no separate efficiency
    /// file on the wire, so this is never written by `ScenarioWriter`. A
    /// solved efficiency assignment is serialized by converting it into
    /// `LandConversionRow`s and merging it into `land_conversion` instead
    /// (see `bmp_encode::efficiency_rows_as_land`).
    pub efficiency: Vec<((i32, i32, i32), i32, Vec<EfficiencyShare>)>,
    pub land_conversion: Vec<LandConversionRow>,
    pub animal: Vec<AnimalRow>,
    pub manure: Vec<ManureTransportRow>,
    pub ef_cost: f64,
    pub lc_cost: f64,
    pub animal_cost: f64,
    pub manure_cost: f64,
}

impl DecodedTables {
    pub fn total_cost(&self) -> f64 {
        self.ef_cost + self.lc_cost + self.animal_cost + self.manure_cost
    }

    /// At least one required category produced zero rows — encoding error
    /// case 2 in the candidate's objective becomes the sentinel.
    pub fn any_category_empty(&self, categories_enabled: &CategoriesEnabled) -> bool {
        (categories_enabled.land_conversion && self.land_conversion.is_empty())
        || (categories_enabled.animal && self.animal.is_empty())
        || (categories_enabled.manure && self.manure.is_empty())
    }
}

/// Which of the four decision-variable blocks are active for this run,
/// derived from the Reference Catalog at load time (invariant 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoriesEnabled {
    pub efficiency: bool,
    pub land_conversion: bool,
    pub animal: bool,
    pub manure: bool,
}

impl Default for CategoriesEnabled {
    fn default() -> Self {
        Self {
            efficiency: true,
            land_conversion: false,
            animal: false,
            manure: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_cost_sums_components() {
        let tables = DecodedTables {
            ef_cost: 1.0,
            lc_cost: 2.0,
            animal_cost: 3.0,
            manure_cost: 4.0,
            ..Default::default()
        };
        assert_eq!(tables.total_cost(), 10.0);
    }

    #[test]
    fn empty_category_detection_respects_enabled_flags() {
        let tables = DecodedTables::default();
        let enabled = CategoriesEnabled {
            efficiency: true,
            land_conversion: true,
            animal: false,
            manure: false,
        };
        assert!(tables.any_category_empty(&enabled));

        let enabled_ef_only = CategoriesEnabled {
            efficiency: true,
            land_conversion: false,
            animal: false,
            manure: false,
        };
        assert!(!tables.any_category_empty(&enabled_ef_only));
    }
}

//! Loads and assembles the Reference Catalog: the immutable reference data
//! (costs, efficiencies, phi coefficients, land-conversion options, manure
//! inventory) plus the user's scenario selection, ready for the encoding
//! layer to normalize against.

pub mod adjacency;
pub mod base_scenario;
pub mod catalog;
pub mod manure;
pub mod pollutant;
pub mod selection;

pub use adjacency::load_county_adjacency;
pub use base_scenario::{
    AmountEntry, AnimalCompleteEntry, AnimalUnitEntry, BaseScenarioMaps, BaseScenarioWire,
    CostEntry, CountyEntry, CountyStateEntry, EfficiencyEntry, LandConversionDest,
    LandConversionEntry, LoadSourceGroupEntry, LrsegEntry, ParcelGeo, PctByValidLoadEntry,
    PhiEntry, load_base_scenario,
};
pub use catalog::{CatalogPaths, ReferenceCatalog, LAND_CONVERSION_MIN_PCT};
pub use manure::{build_manure_inventory, load_manure_nutrients, ManureEntry, ManureNutrientsRow};
pub use pollutant::Pollutant;
pub use selection::{load_scenario_selection, CostOverrideEntry, ScenarioSelection, ScenarioSelectionWire};

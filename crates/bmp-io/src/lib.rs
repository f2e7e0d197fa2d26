//! Scenario file I/O: Parquet wire tables, JSON shadow files, cost
//! documents, simulator report-load summaries, and the writer that ties
//! them together per candidate UUID.

pub mod costs;
pub mod json_shadow;
pub mod parquet_tables;
pub mod reportloads;
pub mod scenario_writer;

pub use costs::{read_costs, write_costs, CostsDocument};
pub use json_shadow::{
    animal_shadow, land_conversion_shadow, manure_shadow, read_shadow, write_shadow, Shadow,
};
pub use parquet_tables::{
    animal_to_df, land_conversion_to_df, manure_to_df, read_animal, read_land_conversion,
    read_manure, write_animal, write_land_conversion, write_manure,
};
pub use reportloads::{read_reportloads, ReportLoads};
pub use scenario_writer::{ScenarioFiles, ScenarioWriter};

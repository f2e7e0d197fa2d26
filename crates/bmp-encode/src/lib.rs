//! The decision-variable encoding & normalization layer: maps an
//! unconstrained real vector `x ∈ [0,1]^N` into the four BMP-assignment
//! tables, with share-normalization and cost accounting for each.

pub mod animal;
pub mod decode;
pub mod efficiency;
pub mod initialize;
pub mod land_conversion;
pub mod layout;
pub mod manure;
pub mod share;

pub use animal::{normalize_animal, AnimalOutput};
pub use decode::decode_candidate;
pub use efficiency::{efficiency_rows_as_land, normalize_efficiency, EfficiencyTable};
pub use initialize::initialize;
pub use land_conversion::{normalize_land_conversion, LandConversionOutput};
pub use layout::EncodingLayout;
pub use manure::{normalize_manure, ManureOutput};
pub use share::normalized_shares;

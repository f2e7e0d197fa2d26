//! # bmp-core: BMP Optimization Domain Model
//!
//! Shared domain types for the BMP multi-objective optimization engine:
//! typed reference-catalog identifiers, the four BMP-assignment table row
//! types, candidate solutions, and the dominance relation used by both
//! search drivers.
//!
//! Catalog loading (`bmp-catalog`), share-normalization (`bmp-encode`),
//! scenario I/O (`bmp-io`), and the search drivers (`bmp-search`,
//! `bmp-epsilon`) all depend on this crate rather than on each other's
//! internals.

pub mod candidate;
pub mod error;
pub mod ids;
pub mod tables;

pub use candidate::{ArchiveEntry, CandidateSolution, Objectives, SENTINEL_OBJECTIVE};
pub use error::{BmpError, BmpResult};
pub use ids::{
    AgencyId, AnimalId, AnimalKey, BmpId, CostKey, CountyId, GeographyId, LoadSourceGroupId,
    LoadSourceId, LrsegId, ManureKey, ParcelKey, StateId,
};
pub use tables::{
    AnimalRow, CategoriesEnabled, DecodedTables, EfficiencyShare, LandConversionRow,
    ManureTransportRow,
};

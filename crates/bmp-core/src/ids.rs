//! Newtype identifiers for the reference-catalog domain.
//!
//! Flat composite string keys (e.g. `"43_17_1"`) in the source system are
//! replaced here with small value structs carrying the typed fields, per the
//! REDESIGN note on flat composite-string keys. [`CompositeKey::to_canonical`]
//! on each key type is the single formatter used for bit-exact interchange
//! with the simulator and the JSON shadow files.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! newtype_id {
    ($name:ident, $inner:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl $name {
            #[inline]
            pub fn new(value: $inner) -> Self {
                Self(value)
            }
            #[inline]
            pub fn value(&self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }
    };
}

newtype_id!(LrsegId, i32);
newtype_id!(AgencyId, i32);
newtype_id!(LoadSourceId, i32);
newtype_id!(BmpId, i32);
newtype_id!(StateId, i32);
newtype_id!(CountyId, i32);
newtype_id!(AnimalId, i32);
newtype_id!(GeographyId, i32);
newtype_id!(LoadSourceGroupId, i32);

/// Composite identifier for a land parcel: `(lrseg, agency, load_source)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParcelKey {
    pub lrseg: LrsegId,
    pub agency: AgencyId,
    pub load_source: LoadSourceId,
}

impl ParcelKey {
    pub fn new(lrseg: LrsegId, agency: AgencyId, load_source: LoadSourceId) -> Self {
        Self {
            lrseg,
            agency,
            load_source,
        }
    }

    /// Flat `"lrseg_agency_loadsource"` form used by JSON shadow files.
    pub fn to_canonical(&self) -> String {
        format!("{}_{}_{}", self.lrseg, self.agency, self.load_source)
    }
}

impl fmt::Display for ParcelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical())
    }
}

/// `(base_condition, county, load_source, animal_id)` for an animal inventory row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AnimalKey {
    pub base_condition: i32,
    pub county: CountyId,
    pub load_source: LoadSourceId,
    pub animal_id: AnimalId,
}

impl AnimalKey {
    pub fn to_canonical(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.base_condition, self.county, self.load_source, self.animal_id
        )
    }
}

impl fmt::Display for AnimalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical())
    }
}

/// `(county_from, load_source, animal_id)` for a manure source row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ManureKey {
    pub county_from: CountyId,
    pub load_source: LoadSourceId,
    pub animal_id: AnimalId,
}

impl ManureKey {
    pub fn to_canonical(&self) -> String {
        format!("{}_{}_{}", self.county_from, self.load_source, self.animal_id)
    }
}

impl fmt::Display for ManureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical())
    }
}

/// Unit-cost lookup key: `(state, bmp)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CostKey {
    pub state: StateId,
    pub bmp: BmpId,
}

impl CostKey {
    pub fn new(state: StateId, bmp: BmpId) -> Self {
        Self { state, bmp }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parcel_key_canonical_form() {
        let key = ParcelKey::new(LrsegId(1), AgencyId(2), LoadSourceId(17));
        assert_eq!(key.to_canonical(), "1_2_17");
    }

    #[test]
    fn manure_key_canonical_form() {
        let key = ManureKey {
            county_from: CountyId(43),
            load_source: LoadSourceId(17),
            animal_id: AnimalId(1),
        };
        assert_eq!(key.to_canonical(), "43_17_1");
    }

    #[test]
    fn ids_round_trip_through_json() {
        let id = BmpId(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let back: BmpId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

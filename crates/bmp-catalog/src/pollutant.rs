use serde::{Deserialize, Serialize};

/// The three pollutants tracked by the reference data tables (nitrogen,
/// phosphorus, sediment). `phi` and the simulator's `loadN_loadP_loadS_...`
/// reply are both indexed in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Nitrogen,
    Phosphorus,
    Sediment,
}

impl Pollutant {
    pub const ALL: [Pollutant; 3] = [Pollutant::Nitrogen, Pollutant::Phosphorus, Pollutant::Sediment];

    pub fn index(&self) -> usize {
        match self {
            Pollutant::Nitrogen => 0,
            Pollutant::Phosphorus => 1,
            Pollutant::Sediment => 2,
        }
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }
}

impl std::fmt::Display for Pollutant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pollutant::Nitrogen => write!(f, "N"),
            Pollutant::Phosphorus => write!(f, "P"),
            Pollutant::Sediment => write!(f, "S"),
        }
    }
}

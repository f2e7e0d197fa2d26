//! `<UUID>_costs.json`: the four cost components plus their sum.

use std::path::Path;

use anyhow::{Context, Result};
use bmp_core::DecodedTables;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostsDocument {
    pub ef_cost: f64,
    pub lc_cost: f64,
    pub animal_cost: f64,
    pub manure_cost: f64,
    pub cost: f64,
}

impl From<&DecodedTables> for CostsDocument {
    fn from(tables: &DecodedTables) -> Self {
        Self {
            ef_cost: tables.ef_cost,
            lc_cost: tables.lc_cost,
            animal_cost: tables.animal_cost,
            manure_cost: tables.manure_cost,
            cost: tables.total_cost(),
        }
    }
}

pub fn write_costs(doc: &CostsDocument, path: &Path) -> Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(doc)
        .with_context(|| format!("serializing costs for {}", path.display()))?;
    std::fs::write(&tmp_path, json)
        .with_context(|| format!("writing costs {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))?;
    Ok(())
}

pub fn read_costs(path: &Path) -> Result<CostsDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading costs {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing costs {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn cost_document_sums_components() {
        let tables = DecodedTables {
            ef_cost: 1.0,
            lc_cost: 2.0,
            animal_cost: 3.0,
            manure_cost: 4.0,
            ..Default::default()
        };
        let doc: CostsDocument = (&tables).into();
        assert_eq!(doc.cost, 10.0);
    }

    #[test]
    fn costs_round_trip_through_disk() {
        let doc = CostsDocument {
            ef_cost: 1.0,
            lc_cost: 2.0,
            animal_cost: 3.0,
            manure_cost: 4.0,
            cost: 10.0,
        };
        let file = NamedTempFile::new().unwrap();
        write_costs(&doc, file.path()).unwrap();
        let read_back = read_costs(file.path()).unwrap();
        assert_eq!(read_back, doc);
    }
}

//! Manure-nutrients Parquet loader and the derived manure
//! inventory: rows filtered to nitrogen, configured manure counties,
//! and a strictly-positive stored amount.

use anyhow::{Context, Result};
use bmp_core::{AnimalId, CountyId, LoadSourceId, LrsegId, ManureKey};
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;

/// `NutrientId` for nitrogen in the manure-nutrients table. The source
/// schema enumerates nitrogen, phosphorus, and sediment analogously to
/// `Pollutant`, with nitrogen first.
pub const NITROGEN_NUTRIENT_ID: i32 = 1;

pub struct ManureNutrientsRow {
    pub lrseg: LrsegId,
    pub load_source: LoadSourceId,
    pub animal_id: AnimalId,
    pub nutrient_id: i32,
    pub stored_manure_dry_lbs: f64,
}

pub fn load_manure_nutrients(path: &Path) -> Result<Vec<ManureNutrientsRow>> {
    let mut file = File::open(path)
        .with_context(|| format!("opening manure-nutrients parquet '{}'", path.display()))?;
    let df = ParquetReader::new(&mut file)
        .finish()
        .with_context(|| format!("reading manure-nutrients parquet '{}'", path.display()))?;

    let lrseg = df.column("LrsegId")?.i32()?;
    let load_source = df.column("LoadSourceId")?.i32()?;
    let animal_id = df.column("AnimalId")?.i32()?;
    let nutrient_id = df.column("NutrientId")?.i32()?;
    let stored = df.column("StoredManureDryLbs")?.f64()?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        rows.push(ManureNutrientsRow {
                lrseg: LrsegId(lrseg.get(i).context("null LrsegId")?),
                load_source: LoadSourceId(load_source.get(i).context("null LoadSourceId")?),
                animal_id: AnimalId(animal_id.get(i).context("null AnimalId")?),
                nutrient_id: nutrient_id.get(i).context("null NutrientId")?,
                stored_manure_dry_lbs: stored.get(i).context("null StoredManureDryLbs")?,
        });
    }
    Ok(rows)
}

/// One surviving manure-source key: baseline dry-pound amount plus the
/// sorted list of neighbor counties it may transport to.
#[derive(Debug, Clone)]
pub struct ManureEntry {
    pub dry_lbs: f64,
    pub neighbors: Vec<CountyId>,
}

/// Build the manure inventory from raw rows, the lrseg->county map, the
/// configured manure counties, and the county-adjacency table.
pub fn build_manure_inventory(
    rows: &[ManureNutrientsRow],
    lrseg_county: &HashMap<LrsegId, CountyId>,
    manure_counties: &HashSet<CountyId>,
    adjacency: &HashMap<CountyId, Vec<CountyId>>,
) -> HashMap<ManureKey, ManureEntry> {
    let mut totals: HashMap<ManureKey, f64> = HashMap::new();
    for row in rows {
        if row.nutrient_id != NITROGEN_NUTRIENT_ID {
            continue;
        }
        if row.stored_manure_dry_lbs <= 0.0 {
            continue;
        }
        let Some(&county) = lrseg_county.get(&row.lrseg) else {
            continue;
        };
        if !manure_counties.contains(&county) {
            continue;
        }
        let key = ManureKey {
            county_from: county,
            load_source: row.load_source,
            animal_id: row.animal_id,
        };
        *totals.entry(key).or_insert(0.0) += row.stored_manure_dry_lbs;
    }

    totals
        .into_iter()
        .map(|(key, dry_lbs)| {
            let mut neighbors = adjacency.get(&key.county_from).cloned().unwrap_or_default();
            neighbors.sort();
            (key, ManureEntry { dry_lbs, neighbors })
    })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_to_nitrogen_manure_counties_and_positive_amount() {
        let rows = vec![
            ManureNutrientsRow {
                lrseg: LrsegId(1),
                load_source: LoadSourceId(17),
                animal_id: AnimalId(1),
                nutrient_id: NITROGEN_NUTRIENT_ID,
                stored_manure_dry_lbs: 4000.0,
            },
            ManureNutrientsRow {
                lrseg: LrsegId(1),
                load_source: LoadSourceId(17),
                animal_id: AnimalId(1),
                nutrient_id: 2, // phosphorus, excluded
                stored_manure_dry_lbs: 9999.0,
            },
            ManureNutrientsRow {
                lrseg: LrsegId(2),
                load_source: LoadSourceId(17),
                animal_id: AnimalId(1),
                nutrient_id: NITROGEN_NUTRIENT_ID,
                stored_manure_dry_lbs: 0.0, // not positive, excluded
            },
        ];
        let mut lrseg_county = HashMap::new();
        lrseg_county.insert(LrsegId(1), CountyId(43));
        lrseg_county.insert(LrsegId(2), CountyId(43));
        let mut manure_counties = HashSet::new();
        manure_counties.insert(CountyId(43));
        let adjacency = HashMap::new();

        let inventory = build_manure_inventory(&rows, &lrseg_county, &manure_counties, &adjacency);
        assert_eq!(inventory.len(), 1);
        let key = ManureKey {
            county_from: CountyId(43),
            load_source: LoadSourceId(17),
            animal_id: AnimalId(1),
        };
        assert_eq!(inventory.get(&key).unwrap().dry_lbs, 4000.0);
    }
}

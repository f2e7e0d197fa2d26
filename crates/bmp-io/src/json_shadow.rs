//! Flat JSON shadow files mirroring each Parquet table as `"f1_f2_..._fK" ->
//! amount`, used for cheap re-ingestion and for ε-constraint merging.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use bmp_core::{AnimalKey, LandConversionRow, ManureKey, AnimalRow, ManureTransportRow, ParcelKey};

pub type Shadow = BTreeMap<String, f64>;

pub fn land_conversion_shadow(rows: &[LandConversionRow]) -> Shadow {
    rows.iter()
        .map(|r| {
            let key = ParcelKey::new(
                bmp_core::LrsegId(r.lrseg),
                r.agency_id,
                r.load_source,
            );
            (format!("{}_{}", key.to_canonical(), r.bmp_id), r.amount)
    })
        .collect()
}

pub fn animal_shadow(rows: &[AnimalRow]) -> Shadow {
    rows.iter()
        .map(|r| {
            let key = AnimalKey {
                base_condition: r.animal_group_id,
                county: r.county,
                load_source: r.load_source,
                animal_id: r.animal_id,
            };
            (format!("{}_{}", key.to_canonical(), r.bmp_id), r.amount)
    })
        .collect()
}

pub fn manure_shadow(rows: &[ManureTransportRow]) -> Shadow {
    rows.iter()
        .map(|r| {
            let key = ManureKey {
                county_from: r.county_id_from,
                load_source: r.load_source,
                animal_id: r.animal_id,
            };
            (
                format!("{}_{}_{}", key.to_canonical(), r.county_id_to, r.bmp_id),
                r.amount,
            )
    })
        .collect()
}

pub fn write_shadow(shadow: &Shadow, path: &Path) -> Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(shadow)
        .with_context(|| format!("serializing shadow for {}", path.display()))?;
    std::fs::write(&tmp_path, json)
        .with_context(|| format!("writing shadow {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))?;
    Ok(())
}

pub fn read_shadow(path: &Path) -> Result<Shadow> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading shadow {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing shadow {}", path.display()))
}

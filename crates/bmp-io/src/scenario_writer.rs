//! Ties `parquet_tables`, `json_shadow`, and `costs` together into the
//! per-candidate-UUID write operation: each candidate's working directory
//! holds `<UUID>_impbmpsubmittedland.{parquet,json}`,
//! `<UUID>_impbmpsubmittedanimal.{parquet,json}`,
//! `<UUID>_impbmpsubmittedmanuretransport.{parquet,json}`, and
//! `<UUID>_costs.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bmp_core::DecodedTables;
use uuid::Uuid;

use crate::costs::{write_costs, CostsDocument};
use crate::json_shadow::{animal_shadow, land_conversion_shadow, manure_shadow, write_shadow};
use crate::parquet_tables::{write_animal, write_land_conversion, write_manure};

/// The set of file paths a [`ScenarioWriter::write`] call produced, for a
/// dispatcher that needs to hand them off to the simulator.
#[derive(Debug, Clone)]
pub struct ScenarioFiles {
    pub land_parquet: PathBuf,
    pub land_shadow: PathBuf,
    pub animal_parquet: PathBuf,
    pub animal_shadow: PathBuf,
    pub manure_parquet: PathBuf,
    pub manure_shadow: PathBuf,
    pub costs: PathBuf,
}

pub struct ScenarioWriter {
    working_dir: PathBuf,
}

impl ScenarioWriter {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    fn path_for(&self, uuid: Uuid, suffix: &str) -> PathBuf {
        self.working_dir.join(format!("{uuid}_{suffix}"))
    }

    pub fn write(&self, uuid: Uuid, tables: &DecodedTables) -> Result<ScenarioFiles> {
        std::fs::create_dir_all(&self.working_dir).with_context(|| {
            format!(
                "creating scenario working directory {}",
                self.working_dir.display()
            )
        })?;

        let land_parquet = self.path_for(uuid, "impbmpsubmittedland.parquet");
        let land_shadow = self.path_for(uuid, "impbmpsubmittedland.json");
        write_land_conversion(&tables.land_conversion, &land_parquet)?;
        write_shadow(&land_conversion_shadow(&tables.land_conversion), &land_shadow)?;

        let animal_parquet = self.path_for(uuid, "impbmpsubmittedanimal.parquet");
        let animal_shadow_path = self.path_for(uuid, "impbmpsubmittedanimal.json");
        write_animal(&tables.animal, &animal_parquet)?;
        write_shadow(&animal_shadow(&tables.animal), &animal_shadow_path)?;

        let manure_parquet = self.path_for(uuid, "impbmpsubmittedmanuretransport.parquet");
        let manure_shadow_path = self.path_for(uuid, "impbmpsubmittedmanuretransport.json");
        write_manure(&tables.manure, &manure_parquet)?;
        write_shadow(&manure_shadow(&tables.manure), &manure_shadow_path)?;

        let costs_path = self.path_for(uuid, "costs.json");
        let costs_doc: CostsDocument = tables.into();
        write_costs(&costs_doc, &costs_path)?;

        Ok(ScenarioFiles {
            land_parquet,
            land_shadow,
            animal_parquet,
            animal_shadow: animal_shadow_path,
            manure_parquet,
            manure_shadow: manure_shadow_path,
            costs: costs_path,
        })
    }

    pub fn reportloads_path(&self, uuid: Uuid) -> PathBuf {
        self.path_for(uuid, "reportloads.parquet")
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// The land/animal/manure Parquet+JSON file set `write` produces for
    /// `uuid`, for a caller that needs to copy them without re-writing
    /// (e.g. the Result Aggregator copying a surviving candidate's files
    /// into the front directory).
    pub fn sibling_paths(&self, uuid: Uuid) -> Vec<PathBuf> {
        vec![
            self.path_for(uuid, "impbmpsubmittedland.parquet"),
            self.path_for(uuid, "impbmpsubmittedland.json"),
            self.path_for(uuid, "impbmpsubmittedanimal.parquet"),
            self.path_for(uuid, "impbmpsubmittedanimal.json"),
            self.path_for(uuid, "impbmpsubmittedmanuretransport.parquet"),
            self.path_for(uuid, "impbmpsubmittedmanuretransport.json"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmp_core::LandConversionRow;
    use tempfile::TempDir;

    fn sample_tables() -> DecodedTables {
        DecodedTables {
            land_conversion: vec![LandConversionRow {
                bmp_submitted_id: 0,
                agency_id: bmp_core::AgencyId(2),
                state_unique_identifier: "51001".into(),
                state_id: bmp_core::StateId(1),
                bmp_id: bmp_core::BmpId(7),
                geography_id: bmp_core::GeographyId(9),
                load_source_group_id: bmp_core::LoadSourceGroupId(3),
                unit_id: 1,
                amount: 30.0,
                is_valid: true,
                error_message: String::new(),
                row_index: 0,
                lrseg: 1,
                load_source: bmp_core::LoadSourceId(17),
            }],
            lc_cost: 60.0,
            ..Default::default()
        }
    }

    #[test]
    fn write_produces_all_seven_files() {
        let dir = TempDir::new().unwrap();
        let writer = ScenarioWriter::new(dir.path());
        let uuid = Uuid::nil();
        let tables = sample_tables();

        let files = writer.write(uuid, &tables).unwrap();

        for path in [
            &files.land_parquet,
            &files.land_shadow,
            &files.animal_parquet,
            &files.animal_shadow,
            &files.manure_parquet,
            &files.manure_shadow,
            &files.costs,
        ] {
            assert!(path.exists(), "{} should exist", path.display());
        }
    }

    #[test]
    fn sibling_paths_matches_what_write_produces() {
        let dir = TempDir::new().unwrap();
        let writer = ScenarioWriter::new(dir.path());
        let uuid = Uuid::nil();
        let tables = sample_tables();

        let files = writer.write(uuid, &tables).unwrap();
        let siblings = writer.sibling_paths(uuid);
        assert_eq!(siblings.len(), 6);
        for expected in [
            &files.land_parquet,
            &files.land_shadow,
            &files.animal_parquet,
            &files.animal_shadow,
            &files.manure_parquet,
            &files.manure_shadow,
        ] {
            assert!(siblings.contains(expected), "missing {}", expected.display());
        }
    }

    #[test]
    fn written_costs_match_decoded_tables() {
        let dir = TempDir::new().unwrap();
        let writer = ScenarioWriter::new(dir.path());
        let uuid = Uuid::nil();
        let tables = sample_tables();

        let files = writer.write(uuid, &tables).unwrap();
        let doc = crate::costs::read_costs(&files.costs).unwrap();
        assert_eq!(doc.lc_cost, 60.0);
        assert_eq!(doc.cost, 60.0);
    }
}

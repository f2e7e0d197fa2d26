//! Converts the three BMP-assignment row types to/from their fixed,
//! bit-exact Parquet wire schemas, and writes/reads them atomically.
//!
//! The Parquet schema carries only the wire columns; `lrseg`/`load_source`/
//! `animal_id` etc. that `bmp-core`'s row structs additionally carry for the
//! JSON shadow are not written here — a reader recovers them from the
//! shadow file instead (see `json_shadow.rs`).

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use bmp_core::{
    AgencyId, AnimalId, AnimalRow, BmpId, CountyId, GeographyId, LandConversionRow,
    LoadSourceGroupId, LoadSourceId, ManureTransportRow, StateId,
};
use polars::prelude::*;

fn write_atomic(df: &mut DataFrame, path: &Path) -> Result<()> {
    let tmp_path = path.with_extension("parquet.tmp");
    {
        let mut file = File::create(&tmp_path)
            .with_context(|| format!("creating temp parquet file {}", tmp_path.display()))?;
        ParquetWriter::new(&mut file)
            .finish(df)
            .with_context(|| format!("writing parquet table {}", path.display()))?;
    }
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))?;
    Ok(())
}

pub fn write_land_conversion(rows: &[LandConversionRow], path: &Path) -> Result<()> {
    let mut df = land_conversion_to_df(rows)?;
    write_atomic(&mut df, path)
}

pub fn write_animal(rows: &[AnimalRow], path: &Path) -> Result<()> {
    let mut df = animal_to_df(rows)?;
    write_atomic(&mut df, path)
}

pub fn write_manure(rows: &[ManureTransportRow], path: &Path) -> Result<()> {
    let mut df = manure_to_df(rows)?;
    write_atomic(&mut df, path)
}

pub fn land_conversion_to_df(rows: &[LandConversionRow]) -> Result<DataFrame> {
    let df = DataFrame::new(vec![
            Series::new(
                "BmpSubmittedId",
                rows.iter().map(|r| r.bmp_submitted_id).collect::<Vec<_>>(),
            ),
            Series::new(
                "AgencyId",
                rows.iter().map(|r| r.agency_id.value()).collect::<Vec<_>>(),
            ),
            Series::new(
                "StateUniqueIdentifier",
                rows.iter().map(|r| r.state_unique_identifier.clone()).collect::<Vec<_>>(),
            ),
            Series::new("StateId", rows.iter().map(|r| r.state_id.value()).collect::<Vec<_>>()),
            Series::new("BmpId", rows.iter().map(|r| r.bmp_id.value()).collect::<Vec<_>>()),
            Series::new(
                "GeographyId",
                rows.iter().map(|r| r.geography_id.value()).collect::<Vec<_>>(),
            ),
            Series::new(
                "LoadSourceGroupId",
                rows.iter().map(|r| r.load_source_group_id.value()).collect::<Vec<_>>(),
            ),
            Series::new("UnitId", rows.iter().map(|r| r.unit_id).collect::<Vec<_>>()),
            Series::new("Amount", rows.iter().map(|r| r.amount).collect::<Vec<_>>()),
            Series::new("IsValid", rows.iter().map(|r| r.is_valid).collect::<Vec<_>>()),
            Series::new(
                "ErrorMessage",
                rows.iter().map(|r| r.error_message.clone()).collect::<Vec<_>>(),
            ),
            Series::new("RowIndex", rows.iter().map(|r| r.row_index).collect::<Vec<_>>()),
    ])?;
    Ok(df)
}

pub fn read_land_conversion(path: &Path) -> Result<Vec<LandConversionRow>> {
    let mut file = File::open(path)
        .with_context(|| format!("opening parquet {}", path.display()))?;
    let df = ParquetReader::new(&mut file).finish()?;
    let submitted = df.column("BmpSubmittedId")?.i32()?;
    let agency = df.column("AgencyId")?.i32()?;
    let state_uid = df.column("StateUniqueIdentifier")?.utf8()?;
    let state = df.column("StateId")?.i32()?;
    let bmp = df.column("BmpId")?.i32()?;
    let geography = df.column("GeographyId")?.i32()?;
    let lsg = df.column("LoadSourceGroupId")?.i32()?;
    let unit = df.column("UnitId")?.i32()?;
    let amount = df.column("Amount")?.f64()?;
    let is_valid = df.column("IsValid")?.bool()?;
    let error_message = df.column("ErrorMessage")?.utf8()?;
    let row_index = df.column("RowIndex")?.i32()?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        rows.push(LandConversionRow {
                bmp_submitted_id: submitted.get(i).context("null BmpSubmittedId")?,
                agency_id: AgencyId(agency.get(i).context("null AgencyId")?),
                state_unique_identifier: state_uid.get(i).unwrap_or_default().to_string(),
                state_id: StateId(state.get(i).context("null StateId")?),
                bmp_id: BmpId(bmp.get(i).context("null BmpId")?),
                geography_id: GeographyId(geography.get(i).context("null GeographyId")?),
                load_source_group_id: LoadSourceGroupId(lsg.get(i).context("null LoadSourceGroupId")?),
                unit_id: unit.get(i).context("null UnitId")?,
                amount: amount.get(i).context("null Amount")?,
                is_valid: is_valid.get(i).context("null IsValid")?,
                error_message: error_message.get(i).unwrap_or_default().to_string(),
                row_index: row_index.get(i).context("null RowIndex")?,
                // Not recoverable from the Parquet schema alone; callers
                // that need these read the JSON shadow instead.
                lrseg: 0,
                load_source: LoadSourceId(0),
        });
    }
    Ok(rows)
}

pub fn animal_to_df(rows: &[AnimalRow]) -> Result<DataFrame> {
    let df = DataFrame::new(vec![
            Series::new(
                "BmpSubmittedId",
                rows.iter().map(|r| r.bmp_submitted_id).collect::<Vec<_>>(),
            ),
            Series::new(
                "AgencyId",
                rows.iter().map(|r| r.agency_id.value()).collect::<Vec<_>>(),
            ),
            Series::new(
                "StateUniqueIdentifier",
                rows.iter().map(|r| r.state_unique_identifier.clone()).collect::<Vec<_>>(),
            ),
            Series::new("StateId", rows.iter().map(|r| r.state_id.value()).collect::<Vec<_>>()),
            Series::new("BmpId", rows.iter().map(|r| r.bmp_id.value()).collect::<Vec<_>>()),
            Series::new(
                "GeographyId",
                rows.iter().map(|r| r.geography_id.value()).collect::<Vec<_>>(),
            ),
            Series::new(
                "LoadSourceGroupId",
                rows.iter().map(|r| r.load_source_group_id.value()).collect::<Vec<_>>(),
            ),
            Series::new("UnitId", rows.iter().map(|r| r.unit_id).collect::<Vec<_>>()),
            Series::new("Amount", rows.iter().map(|r| r.amount).collect::<Vec<_>>()),
            Series::new("IsValid", rows.iter().map(|r| r.is_valid).collect::<Vec<_>>()),
            Series::new(
                "ErrorMessage",
                rows.iter().map(|r| r.error_message.clone()).collect::<Vec<_>>(),
            ),
            Series::new("RowIndex", rows.iter().map(|r| r.row_index).collect::<Vec<_>>()),
            Series::new(
                "AnimalGroupId",
                rows.iter().map(|r| r.animal_group_id).collect::<Vec<_>>(),
            ),
            Series::new(
                "NReductionFraction",
                rows.iter().map(|r| r.n_reduction_fraction).collect::<Vec<_>>(),
            ),
            Series::new(
                "PReductionFraction",
                rows.iter().map(|r| r.p_reduction_fraction).collect::<Vec<_>>(),
            ),
    ])?;
    Ok(df)
}

pub fn read_animal(path: &Path) -> Result<Vec<AnimalRow>> {
    let mut file = File::open(path)
        .with_context(|| format!("opening parquet {}", path.display()))?;
    let df = ParquetReader::new(&mut file).finish()?;
    let submitted = df.column("BmpSubmittedId")?.i32()?;
    let agency = df.column("AgencyId")?.i32()?;
    let state_uid = df.column("StateUniqueIdentifier")?.utf8()?;
    let state = df.column("StateId")?.i32()?;
    let bmp = df.column("BmpId")?.i32()?;
    let geography = df.column("GeographyId")?.i32()?;
    let lsg = df.column("LoadSourceGroupId")?.i32()?;
    let unit = df.column("UnitId")?.i32()?;
    let amount = df.column("Amount")?.f64()?;
    let is_valid = df.column("IsValid")?.bool()?;
    let error_message = df.column("ErrorMessage")?.utf8()?;
    let row_index = df.column("RowIndex")?.i32()?;
    let animal_group = df.column("AnimalGroupId")?.i32()?;
    let n_reduction = df.column("NReductionFraction")?.f64()?;
    let p_reduction = df.column("PReductionFraction")?.f64()?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        rows.push(AnimalRow {
                bmp_submitted_id: submitted.get(i).context("null BmpSubmittedId")?,
                agency_id: AgencyId(agency.get(i).context("null AgencyId")?),
                state_unique_identifier: state_uid.get(i).unwrap_or_default().to_string(),
                state_id: StateId(state.get(i).context("null StateId")?),
                bmp_id: BmpId(bmp.get(i).context("null BmpId")?),
                geography_id: GeographyId(geography.get(i).context("null GeographyId")?),
                load_source_group_id: LoadSourceGroupId(lsg.get(i).context("null LoadSourceGroupId")?),
                unit_id: unit.get(i).context("null UnitId")?,
                amount: amount.get(i).context("null Amount")?,
                is_valid: is_valid.get(i).context("null IsValid")?,
                error_message: error_message.get(i).unwrap_or_default().to_string(),
                row_index: row_index.get(i).context("null RowIndex")?,
                animal_group_id: animal_group.get(i).context("null AnimalGroupId")?,
                n_reduction_fraction: n_reduction.get(i).context("null NReductionFraction")?,
                p_reduction_fraction: p_reduction.get(i).context("null PReductionFraction")?,
                county: CountyId(0),
                load_source: LoadSourceId(0),
                animal_id: AnimalId(0),
        });
    }
    Ok(rows)
}

pub fn manure_to_df(rows: &[ManureTransportRow]) -> Result<DataFrame> {
    let df = DataFrame::new(vec![
            Series::new(
                "BmpSubmittedId",
                rows.iter().map(|r| r.bmp_submitted_id).collect::<Vec<_>>(),
            ),
            Series::new(
                "AgencyId",
                rows.iter().map(|r| r.agency_id.value()).collect::<Vec<_>>(),
            ),
            Series::new(
                "StateUniqueIdentifier",
                rows.iter().map(|r| r.state_unique_identifier.clone()).collect::<Vec<_>>(),
            ),
            Series::new("StateId", rows.iter().map(|r| r.state_id.value()).collect::<Vec<_>>()),
            Series::new("BmpId", rows.iter().map(|r| r.bmp_id.value()).collect::<Vec<_>>()),
            Series::new("Amount", rows.iter().map(|r| r.amount).collect::<Vec<_>>()),
            Series::new("IsValid", rows.iter().map(|r| r.is_valid).collect::<Vec<_>>()),
            Series::new(
                "ErrorMessage",
                rows.iter().map(|r| r.error_message.clone()).collect::<Vec<_>>(),
            ),
            Series::new("RowIndex", rows.iter().map(|r| r.row_index).collect::<Vec<_>>()),
            Series::new(
                "HasStateReference",
                rows.iter().map(|r| r.has_state_reference).collect::<Vec<_>>(),
            ),
            Series::new(
                "CountyIdFrom",
                rows.iter().map(|r| r.county_id_from.value()).collect::<Vec<_>>(),
            ),
            Series::new(
                "CountyIdTo",
                rows.iter().map(|r| r.county_id_to.value()).collect::<Vec<_>>(),
            ),
            Series::new("FipsFrom", rows.iter().map(|r| r.fips_from.clone()).collect::<Vec<_>>()),
            Series::new("FipsTo", rows.iter().map(|r| r.fips_to.clone()).collect::<Vec<_>>()),
    ])?;
    Ok(df)
}

pub fn read_manure(path: &Path) -> Result<Vec<ManureTransportRow>> {
    let mut file = File::open(path)
        .with_context(|| format!("opening parquet {}", path.display()))?;
    let df = ParquetReader::new(&mut file).finish()?;
    let submitted = df.column("BmpSubmittedId")?.i32()?;
    let agency = df.column("AgencyId")?.i32()?;
    let state_uid = df.column("StateUniqueIdentifier")?.utf8()?;
    let state = df.column("StateId")?.i32()?;
    let bmp = df.column("BmpId")?.i32()?;
    let amount = df.column("Amount")?.f64()?;
    let is_valid = df.column("IsValid")?.bool()?;
    let error_message = df.column("ErrorMessage")?.utf8()?;
    let row_index = df.column("RowIndex")?.i32()?;
    let has_state_ref = df.column("HasStateReference")?.bool()?;
    let county_from = df.column("CountyIdFrom")?.i32()?;
    let county_to = df.column("CountyIdTo")?.i32()?;
    let fips_from = df.column("FipsFrom")?.utf8()?;
    let fips_to = df.column("FipsTo")?.utf8()?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        rows.push(ManureTransportRow {
                bmp_submitted_id: submitted.get(i).context("null BmpSubmittedId")?,
                agency_id: AgencyId(agency.get(i).context("null AgencyId")?),
                state_unique_identifier: state_uid.get(i).unwrap_or_default().to_string(),
                state_id: StateId(state.get(i).context("null StateId")?),
                bmp_id: BmpId(bmp.get(i).context("null BmpId")?),
                amount: amount.get(i).context("null Amount")?,
                is_valid: is_valid.get(i).context("null IsValid")?,
                error_message: error_message.get(i).unwrap_or_default().to_string(),
                row_index: row_index.get(i).context("null RowIndex")?,
                has_state_reference: has_state_ref.get(i).context("null HasStateReference")?,
                county_id_from: CountyId(county_from.get(i).context("null CountyIdFrom")?),
                county_id_to: CountyId(county_to.get(i).context("null CountyIdTo")?),
                fips_from: fips_from.get(i).unwrap_or_default().to_string(),
                fips_to: fips_to.get(i).unwrap_or_default().to_string(),
                load_source: LoadSourceId(0),
                animal_id: AnimalId(0),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample_row() -> LandConversionRow {
        LandConversionRow {
            bmp_submitted_id: 1,
            agency_id: AgencyId(2),
            state_unique_identifier: "51001".into(),
            state_id: StateId(1),
            bmp_id: BmpId(7),
            geography_id: GeographyId(9),
            load_source_group_id: LoadSourceGroupId(3),
            unit_id: 1,
            amount: 30.0,
            is_valid: true,
            error_message: String::new(),
            row_index: 0,
            lrseg: 1,
            load_source: LoadSourceId(17),
        }
    }

    #[test]
    fn land_conversion_round_trips_over_wire_columns() {
        let file = NamedTempFile::new().unwrap();
        let rows = vec![sample_row()];
        write_land_conversion(&rows, file.path()).unwrap();
        let read_back = read_land_conversion(file.path()).unwrap();
        assert_eq!(read_back.len(), 1);
        assert_eq!(read_back[0].bmp_submitted_id, rows[0].bmp_submitted_id);
        assert_eq!(read_back[0].amount, rows[0].amount);
        assert_eq!(read_back[0].bmp_id, rows[0].bmp_id);
    }

    #[test]
    fn empty_table_round_trips_to_zero_rows() {
        let file = NamedTempFile::new().unwrap();
        write_land_conversion(&[], file.path()).unwrap();
        let read_back = read_land_conversion(file.path()).unwrap();
        assert!(read_back.is_empty());
    }
}

//! Reads the simulator-returned `<UUID>_reportloads.parquet`: columns
//! 7..15 sum across all rows to the nine EoS/EoR/EoT nitrogen/phosphorus/
//! sediment totals.

use std::fs::File;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use polars::prelude::*;

const LOAD_COLUMN_START: usize = 7;
const LOAD_COLUMN_COUNT: usize = 9;

/// End-of-stream / end-of-river / end-of-tidal nitrogen/phosphorus/sediment
/// totals, in that fixed order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportLoads {
    pub eos: [f64; 3],
    pub eor: [f64; 3],
    pub eot: [f64; 3],
}

pub fn read_reportloads(path: &Path) -> Result<ReportLoads> {
    let mut file =
    File::open(path).with_context(|| format!("opening reportloads {}", path.display()))?;
    let df = ParquetReader::new(&mut file)
        .finish()
        .with_context(|| format!("reading reportloads {}", path.display()))?;

    let columns = df.get_columns();
    ensure!(
        columns.len() >= LOAD_COLUMN_START + LOAD_COLUMN_COUNT,
        "reportloads {} has {} columns, need at least {}",
        path.display(),
        columns.len(),
        LOAD_COLUMN_START + LOAD_COLUMN_COUNT
    );

    let mut sums = [0.0f64; LOAD_COLUMN_COUNT];
    for (i, slot) in sums.iter_mut().enumerate() {
        let series = &columns[LOAD_COLUMN_START + i];
        *slot = series
            .cast(&DataType::Float64)
            .with_context(|| format!("casting column {} to f64", series.name()))?
            .f64()?
            .sum()
            .unwrap_or(0.0);
    }

    Ok(ReportLoads {
            eos: [sums[0], sums[1], sums[2]],
            eor: [sums[3], sums[4], sums[5]],
            eot: [sums[6], sums[7], sums[8]],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn sums_the_nine_load_columns() {
        // 16 columns: 7 ignored leading columns, then the 9 EoS/EoR/EoT values.
        let mut cols: Vec<Series> = (0..7)
            .map(|i| Series::new(&format!("lead{i}"), &[1.0, 1.0]))
            .collect();
        for i in 0..9 {
            cols.push(Series::new(&format!("load{i}"), &[1.0, 2.0]));
        }
        let mut df = DataFrame::new(cols).unwrap();

        let file = NamedTempFile::new().unwrap();
        {
            let mut out = std::fs::File::create(file.path()).unwrap();
            ParquetWriter::new(&mut out).finish(&mut df).unwrap();
        }

        let loads = read_reportloads(file.path()).unwrap();
        assert_eq!(loads.eos, [3.0, 3.0, 3.0]);
        assert_eq!(loads.eor, [3.0, 3.0, 3.0]);
        assert_eq!(loads.eot, [3.0, 3.0, 3.0]);
    }
}

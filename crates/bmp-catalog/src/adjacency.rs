//! County-adjacency JSON: `county_str -> [neighbor_county_int, ...]`.
//! Loaded only when manure is enabled.

use anyhow::{Context, Result};
use bmp_core::CountyId;
use std::collections::HashMap;
use std::path::Path;

pub fn load_county_adjacency(path: &Path) -> Result<HashMap<CountyId, Vec<CountyId>>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading county adjacency document '{}'", path.display()))?;
    let raw: HashMap<String, Vec<i32>> = serde_json::from_str(&text)
        .with_context(|| format!("parsing county adjacency document '{}'", path.display()))?;
    let mut out = HashMap::with_capacity(raw.len());
    for (county_str, neighbors) in raw {
        let county: i32 = county_str
            .trim()
            .parse()
            .with_context(|| format!("county key '{}' is not an integer", county_str))?;
        let mut neighbor_ids: Vec<CountyId> = neighbors.into_iter().map(CountyId).collect();
        neighbor_ids.sort();
        out.insert(CountyId(county), neighbor_ids);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_and_sorts_neighbor_lists() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"43": [45, 44], "44": [43]}}"#).unwrap();
        let adjacency = load_county_adjacency(file.path()).unwrap();
        assert_eq!(
            adjacency.get(&CountyId(43)),
            Some(&vec![CountyId(44), CountyId(45)])
        );
    }
}

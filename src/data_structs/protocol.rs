use std::io::Read;

use anyhow::Context;
use hashbrown::HashMap;
use log::*;
use serde::{Deserialize, Serialize};

use crate::data_structs::well::WellRecord;

/// Prefix marking a calibration-ladder sample name, e.g. "std 3".
pub const STANDARD_PREFIX: &str = "std ";

/// Substring used to exclude anything standard-like from the final
/// summary, matching the broader historical rule.
const STANDARD_MARKER: &str = "std";

/// True for samples that belong to the standard ladder and enter the
/// curve fit.
pub fn is_standard_sample(name: &str) -> bool {
    name.starts_with(STANDARD_PREFIX)
}

/// True for samples excluded from the per-sample summary. Deliberately
/// looser than [`is_standard_sample`] so mislabeled ladder wells never
/// leak into the summary table.
pub fn is_standard_like(name: &str) -> bool {
    name.contains(STANDARD_MARKER)
}

/// A single dilution-resolution rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStrategy {
    /// Plate-layout columns with known dilution multipliers.
    PlateColumn(HashMap<u32, f64>),
    /// Standard-ladder sample names with known concentrations.
    StandardName(HashMap<String, f64>),
}

impl LookupStrategy {
    fn resolve(
        &self,
        record: &WellRecord,
    ) -> Option<f64> {
        match self {
            LookupStrategy::PlateColumn(map) => {
                map.get(&record.column_number).copied()
            },
            LookupStrategy::StandardName(map) => {
                record
                    .sample_name
                    .as_deref()
                    .and_then(|name| map.get(name))
                    .copied()
            },
        }
    }
}

/// Per-assay dilution protocol: an ordered list of lookup strategies,
/// first match wins. The plate layout and ladder concentrations are
/// configuration data, not code, so a different assay can swap them via
/// a JSON scheme file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DilutionScheme {
    strategies: Vec<LookupStrategy>,
}

impl DilutionScheme {
    pub fn new(strategies: Vec<LookupStrategy>) -> Self {
        Self { strategies }
    }

    /// The DA2 export profile this tool historically ran against:
    /// sample columns 6/7 at 1e-4, 10/11 at 1e-5, and a seven-point
    /// ten-fold ladder from 100 units down to zero.
    pub fn da2() -> Self {
        let columns = HashMap::from_iter([
            (6u32, 1e-4),
            (7, 1e-4),
            (10, 1e-5),
            (11, 1e-5),
        ]);
        let standards = HashMap::from_iter([
            ("std 0".to_owned(), 0.0),
            ("std 1".to_owned(), 100.0),
            ("std 2".to_owned(), 10.0),
            ("std 3".to_owned(), 1.0),
            ("std 4".to_owned(), 0.1),
            ("std 5".to_owned(), 0.01),
            ("std 6".to_owned(), 0.001),
        ]);
        Self::new(vec![
            LookupStrategy::PlateColumn(columns),
            LookupStrategy::StandardName(standards),
        ])
    }

    /// Resolves the dilution factor for a record through the strategy
    /// list. `None` when nothing matches; the caller keeps the row but
    /// the curve fit will skip it.
    pub fn resolve(
        &self,
        record: &WellRecord,
    ) -> Option<f64> {
        self.strategies
            .iter()
            .find_map(|strategy| strategy.resolve(record))
    }

    /// Loads a scheme from a JSON reader.
    pub fn from_json<R: Read>(reader: R) -> anyhow::Result<Self> {
        let scheme: Self = serde_json::from_reader(reader)
            .context("failed to parse dilution scheme JSON")?;
        if scheme.strategies.is_empty() {
            warn!("dilution scheme has no lookup strategies; every dilution will be null");
        }
        Ok(scheme)
    }
}

impl Default for DilutionScheme {
    fn default() -> Self {
        Self::da2()
    }
}

use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use taxwise_core::{RegimeConfig, TaxEngineError, TaxSlab};
use thiserror::Error;
use tracing::info;

/// Errors that can occur when loading slab table data.
#[derive(Debug, Error)]
pub enum SlabTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Regime '{0}' is not configured")]
    UnknownRegime(String),

    #[error("Invalid regime configuration: {0}")]
    InvalidTable(#[from] TaxEngineError),
}

impl From<csv::Error> for SlabTableLoaderError {
    fn from(err: csv::Error) -> Self {
        SlabTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a slab table CSV file.
///
/// - `regime`: The regime identifier (e.g. `old`, `new`)
/// - `lower_bound`: Inclusive lower bound of the slab
/// - `upper_bound`: Exclusive upper bound (empty for unbounded)
/// - `rate`: The marginal rate as a decimal (e.g., 0.05 for 5%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SlabRecord {
    pub regime: String,
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl SlabRecord {
    fn to_slab(&self) -> TaxSlab {
        TaxSlab {
            lower_bound: self.lower_bound,
            upper_bound: self.upper_bound,
            rate: self.rate,
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for slab tables from CSV files.
///
/// Slab tables override the tables of already-configured regimes; the
/// regime's eligibility rules, caps, standard deduction and cess stay as
/// configured. Rows are kept in file order, so an unsorted file is rejected
/// by validation rather than silently reordered.
pub struct SlabTableLoader;

impl SlabTableLoader {
    /// Parse slab records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<SlabRecord>, SlabTableLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: SlabRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Replace the slab tables of `regimes` with the tables in `records`.
    ///
    /// Every regime named in `records` must already exist in `regimes`.
    /// All replacements are validated before any is written, so on error
    /// `regimes` is left as it was. Returns the number of regimes whose
    /// table was replaced.
    pub fn apply(
        regimes: &mut [RegimeConfig],
        records: &[SlabRecord],
    ) -> Result<usize, SlabTableLoaderError> {
        let mut candidates = Vec::new();

        for regime_id in Self::regime_ids(records) {
            let index = regimes
                .iter()
                .position(|r| r.regime_id == regime_id)
                .ok_or_else(|| SlabTableLoaderError::UnknownRegime(regime_id.to_string()))?;

            let mut candidate = regimes[index].clone();
            candidate.slabs = records
                .iter()
                .filter(|r| r.regime == regime_id)
                .map(SlabRecord::to_slab)
                .collect();
            candidate.validate()?;

            candidates.push((index, candidate));
        }

        let replaced = candidates.len();
        for (index, candidate) in candidates {
            info!(
                regime_id = %candidate.regime_id,
                slabs = candidate.slabs.len(),
                "Loaded slab table override"
            );
            regimes[index] = candidate;
        }

        Ok(replaced)
    }

    /// Parse `reader` and apply it on top of `regimes`.
    pub fn load<R: Read>(
        reader: R,
        mut regimes: Vec<RegimeConfig>,
    ) -> Result<Vec<RegimeConfig>, SlabTableLoaderError> {
        let records = Self::parse(reader)?;
        Self::apply(&mut regimes, &records)?;
        Ok(regimes)
    }

    /// Distinct regime ids in first-appearance order.
    fn regime_ids(records: &[SlabRecord]) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for record in records {
            if !ids.contains(&record.regime.as_str()) {
                ids.push(&record.regime);
            }
        }
        ids
    }
}

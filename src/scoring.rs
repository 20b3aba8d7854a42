//! Seam to the external linkage engine.
//!
//! The engine itself is not part of this crate. `PredictionTable` serves
//! precomputed prediction rows exported from it.

use crate::config::DEFAULT_UNIQUE_ID_COLUMN;
use crate::error::{MatchLensError, MlResult};
use crate::explain::ScoredComparisonRecord;
use crate::records::StorageRecord;
use serde_json::{Map, Number, Value};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Scores a pair of records. `Ok(None)` means the engine returned no row.
pub trait ComparisonScorer {
    fn compare_records(
        &self,
        left: &StorageRecord,
        right: &StorageRecord,
    ) -> MlResult<Option<ScoredComparisonRecord>>;
}

#[derive(Debug, Clone, Default)]
pub struct PredictionTable {
    rows: Vec<ScoredComparisonRecord>,
    unique_id_column: String,
}

impl PredictionTable {
    pub fn new(rows: Vec<ScoredComparisonRecord>) -> Self {
        Self {
            rows,
            unique_id_column: DEFAULT_UNIQUE_ID_COLUMN.to_string(),
        }
    }

    pub fn with_unique_id_column(mut self, column: &str) -> Self {
        self.unique_id_column = column.to_string();
        self
    }

    pub fn rows(&self) -> &[ScoredComparisonRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Loads `.csv` files as CSV and anything else as JSON.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> MlResult<Self> {
        let path = path.as_ref();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

        let file = File::open(path)?;
        let table = if is_csv {
            Self::from_csv_reader(file)?
        } else {
            Self::from_json_reader(file)?
        };
        info!("Loaded {} prediction rows from {}", table.len(), path.display());
        Ok(table)
    }

    /// A single object or an array of objects.
    pub fn from_json_reader<R: Read>(reader: R) -> MlResult<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        let rows = match value {
            Value::Array(items) => items
                .into_iter()
                .map(ScoredComparisonRecord::from_value)
                .collect::<MlResult<Vec<_>>>()?,
            object @ Value::Object(_) => vec![ScoredComparisonRecord::from_value(object)?],
            other => {
                return Err(MatchLensError::Validation(format!(
                    "expected prediction object or array, got {}",
                    other
                )))
            }
        };
        Ok(Self::new(rows))
    }

    /// Header row of column names; numeric cells become numbers and empty
    /// cells become null.
    pub fn from_csv_reader<R: Read>(reader: R) -> MlResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = rdr.headers()?.clone();

        let mut rows = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let rec = result?;
            let mut values = Map::new();
            for (name, cell) in headers.iter().zip(rec.iter()) {
                values.insert(name.trim().to_string(), csv_cell_value(cell));
            }
            debug!("prediction row {}: {} columns", idx + 1, values.len());
            rows.push(ScoredComparisonRecord::new(values));
        }
        Ok(Self::new(rows))
    }

    fn id_matches(row: &ScoredComparisonRecord, key: &str, record: &StorageRecord, column: &str) -> bool {
        match (row.get(key), record.get(column)) {
            (Some(a), Some(b)) => id_text(a) == id_text(b),
            _ => false,
        }
    }
}

impl ComparisonScorer for PredictionTable {
    /// Finds the row whose `<id>_l`/`<id>_r` match the records' ids. When
    /// the table has no id columns the first row is returned.
    fn compare_records(
        &self,
        left: &StorageRecord,
        right: &StorageRecord,
    ) -> MlResult<Option<ScoredComparisonRecord>> {
        let id = &self.unique_id_column;
        let left_key = format!("{}_l", id);
        let right_key = format!("{}_r", id);

        let has_ids = self
            .rows
            .iter()
            .any(|r| r.get(&left_key).is_some() && r.get(&right_key).is_some());

        if !has_ids {
            return Ok(self.rows.first().cloned());
        }

        let found = self.rows.iter().find(|row| {
            Self::id_matches(row, &left_key, left, id) && Self::id_matches(row, &right_key, right, id)
        });
        if found.is_none() {
            debug!("no prediction row for {}={:?}/{:?}", id, left.get(id), right.get(id));
        }
        Ok(found.cloned())
    }
}

fn csv_cell_value(cell: &str) -> Value {
    let cell = cell.trim();
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Some(n) = cell.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(cell.to_string())
}

/// Ids compare by text so `1`, `"1"` and `1.0` from a CSV export agree.
fn id_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

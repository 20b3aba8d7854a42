use crate::error::{MatchLensError, MlResult};
use crate::explain::FieldOrder;
use crate::values::parse_list_literal;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

pub const RETAINED_COLUMNS_KEY: &str = "additional_columns_to_retain";
pub const DEFAULT_UNIQUE_ID_COLUMN: &str = "unique_id";

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainConfig {
    /// Contributions with |match weight| at or below this are hidden from the chart.
    #[arg(long, default_value_t = 1e-9)]
    pub tolerance: f64,

    /// Comma-separated field display order. Empty falls back to the model's
    /// comparison order, then to key order.
    #[arg(long, default_value = "")]
    pub field_order: String,

    /// Bars smaller than this carry no value label.
    #[arg(long, default_value_t = 0.2)]
    pub label_threshold: f64,
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-9,
            field_order: String::new(),
            label_threshold: 0.2,
        }
    }
}

impl ExplainConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> MlResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn field_order(&self) -> Option<FieldOrder> {
        match FieldOrder::parse(&self.field_order) {
            FieldOrder::Lexicographic => None,
            canonical => Some(canonical),
        }
    }

    /// Applies values the user typed on the command line over `self`.
    pub fn merge_from_cli(&mut self, cli: &ExplainConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(tolerance, "tolerance");
        update_if_present!(field_order, "field_order");
        update_if_present!(label_threshold, "label_threshold");
    }
}

/// The linkage model's settings document, as far as this tool reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    raw: Value,
}

impl ModelSettings {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> MlResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::new(serde_json::from_str(&content)?))
    }

    /// Columns each input record carries, in form order.
    ///
    /// Accepts a JSON array of strings or list-literal text. Anything else
    /// is an `InvalidSchemaConfiguration`.
    pub fn retained_columns(&self) -> MlResult<Vec<String>> {
        let invalid = |detail: String| {
            MatchLensError::InvalidSchemaConfiguration(format!(
                "Invalid format for '{}': {}",
                RETAINED_COLUMNS_KEY, detail
            ))
        };

        match self.raw.get(RETAINED_COLUMNS_KEY) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(invalid(format!("column name {} is not a string", other))),
                })
                .collect(),
            Some(Value::String(text)) => {
                parse_list_literal(text.trim()).map_err(|e| invalid(e.to_string()))
            }
            Some(other) => Err(invalid(format!("expected a list, got {}", other))),
            None => Err(invalid("key is missing".to_string())),
        }
    }

    /// Field order declared by the model's comparisons, if it lists any.
    pub fn comparison_order(&self) -> Option<FieldOrder> {
        let names: Vec<String> = self
            .raw
            .get("comparisons")?
            .as_array()?
            .iter()
            .filter_map(|c| c.get("output_column_name")?.as_str())
            .map(str::to_string)
            .collect();

        if names.is_empty() {
            None
        } else {
            Some(FieldOrder::Canonical(names))
        }
    }

    pub fn unique_id_column(&self) -> &str {
        self.raw
            .get("unique_id_column_name")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_UNIQUE_ID_COLUMN)
    }
}

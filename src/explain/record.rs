use crate::error::{MatchLensError, MlResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MATCH_WEIGHT_KEY: &str = "match_weight";
pub const GAMMA_PREFIX: &str = "gamma_";
pub const BF_PREFIX: &str = "bf_";
pub const TF_ADJ_PREFIX: &str = "bf_tf_adj_";

/// One scored pair as returned by the linkage engine.
///
/// Key convention: `match_weight` is the final log2 Bayes factor,
/// `gamma_<field>` the comparison level, `bf_<field>` the standard Bayes
/// factor and `bf_tf_adj_<field>` the term-frequency adjustment. The
/// adjustment keys also carry the `bf_` prefix and count as Bayes factors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoredComparisonRecord {
    values: Map<String, Value>,
}

impl ScoredComparisonRecord {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    pub fn from_value(value: Value) -> MlResult<Self> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            other => Err(MatchLensError::Validation(format!(
                "scored comparison must be a JSON object, got {}",
                other
            ))),
        }
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Numeric value of `key`; `None` when absent, null or not a number.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(Value::as_f64)
    }

    /// Final score; a record without one scores 0.
    pub fn match_weight(&self) -> f64 {
        self.number(MATCH_WEIGHT_KEY).unwrap_or(0.0)
    }

    /// Field names that have a `gamma_` key, in the record's key order.
    pub fn gamma_fields(&self) -> Vec<String> {
        self.values
            .keys()
            .filter_map(|k| k.strip_prefix(GAMMA_PREFIX))
            .map(str::to_string)
            .collect()
    }

    pub fn comparison_vector_value(&self, field: &str) -> Option<i64> {
        let value = self.values.get(&format!("{}{}", GAMMA_PREFIX, field))?;
        value.as_i64().or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0)
                .map(|f| f as i64)
        })
    }

    /// Every numeric `bf_*` entry, tf adjustments included.
    pub fn bayes_factors(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.values.iter().filter_map(|(k, v)| {
            if k.starts_with(BF_PREFIX) {
                v.as_f64().map(|f| (k.as_str(), f))
            } else {
                None
            }
        })
    }

    pub fn standard_factor(&self, field: &str) -> f64 {
        self.number(&format!("{}{}", BF_PREFIX, field)).unwrap_or(1.0)
    }

    pub fn tf_adjustment_factor(&self, field: &str) -> f64 {
        self.number(&format!("{}{}", TF_ADJ_PREFIX, field))
            .unwrap_or(1.0)
    }
}

impl From<Map<String, Value>> for ScoredComparisonRecord {
    fn from(values: Map<String, Value>) -> Self {
        Self::new(values)
    }
}

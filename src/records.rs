use crate::values::{format_value_for_input, parse_input_value, storage_value_to_string, TypedValue};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Record as handed to the scoring engine: column name to JSON value.
pub type StorageRecord = Map<String, Value>;

/// Raw form text per column.
pub type RawInputs = BTreeMap<String, String>;

pub const LIST_SUFFIX: &str = "_list";

/// Stands in for an empty list so the columnar engine can infer `VARCHAR[]`.
pub const EMPTY_LIST_PLACEHOLDER: &str = "";

pub fn is_list_column(name: &str) -> bool {
    name.ends_with(LIST_SUFFIX)
}

/// Makes `_list` columns storage-safe.
///
/// Empty lists become `[""]`; non-empty lists have their nulls dropped and
/// every other element cast to a string. Other columns and non-list values
/// are copied unchanged.
pub fn fix_list_types(record: &StorageRecord) -> StorageRecord {
    record
        .iter()
        .map(|(key, value)| {
            let fixed = match value {
                Value::Array(items) if is_list_column(key) => {
                    if items.is_empty() {
                        Value::Array(vec![Value::String(EMPTY_LIST_PLACEHOLDER.to_string())])
                    } else {
                        Value::Array(
                            items
                                .iter()
                                .filter_map(storage_value_to_string)
                                .map(Value::String)
                                .collect(),
                        )
                    }
                }
                other => other.clone(),
            };
            (key.clone(), fixed)
        })
        .collect()
}

/// Types one record's form inputs for the given columns.
///
/// Columns missing from `inputs` are treated as empty. `_list` columns are
/// always lists: empty input is an empty list and a scalar becomes a
/// one-element list.
pub fn build_record(columns: &[String], inputs: &RawInputs) -> StorageRecord {
    let mut record = StorageRecord::new();

    for column in columns {
        let raw = inputs.get(column).map(String::as_str).unwrap_or("");
        let mut value = parse_input_value(raw);

        if is_list_column(column) {
            value = match value {
                TypedValue::EmptyString => TypedValue::ListOfString(Vec::new()),
                list @ TypedValue::ListOfString(_) => list,
                scalar => TypedValue::ListOfString(vec![format_value_for_input(&scalar)]),
            };
        }

        debug!("column '{}' typed as {:?}", column, value);
        record.insert(column.clone(), value.to_storage_value());
    }

    fix_list_types(&record)
}

/// Form text for every column of a stored record.
pub fn format_record_for_input(record: &StorageRecord) -> RawInputs {
    record
        .iter()
        .map(|(key, value)| {
            let typed = TypedValue::from_storage_value(value);
            (key.clone(), format_value_for_input(&typed))
        })
        .collect()
}

/// Display text of one column, `""` when absent.
pub fn display_value(record: &StorageRecord, column: &str) -> String {
    record
        .get(column)
        .map(|v| format_value_for_input(&TypedValue::from_storage_value(v)))
        .unwrap_or_default()
}

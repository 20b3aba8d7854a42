use crate::reports::{self, OutputFormat};
use clap::Args;
use matchlens::api;
use matchlens::config::{ExplainConfig, ModelSettings};
use matchlens::error::{MatchLensError, MlResult};
use matchlens::records::{format_record_for_input, RawInputs};
use matchlens::scoring::PredictionTable;
use serde_json::Value;
use std::fs;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub config: ExplainConfig,

    /// Linkage model settings JSON.
    #[arg(long)]
    pub settings: String,

    /// Left record as a JSON object of column values.
    #[arg(long)]
    pub left: String,

    /// Right record as a JSON object of column values.
    #[arg(long)]
    pub right: String,

    /// Prediction export standing in for the scoring engine.
    #[arg(short, long)]
    pub scored: String,

    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

fn load_inputs(path: &str) -> MlResult<RawInputs> {
    let content = fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(format_record_for_input(&map)),
        _ => Err(MatchLensError::Validation(format!(
            "record file '{}' must hold a JSON object",
            path
        ))),
    }
}

pub fn run(args: CompareArgs, config: ExplainConfig) -> MlResult<()> {
    info!("📂 Loading model settings: {}", args.settings);
    let settings = ModelSettings::load_from_file(&args.settings)?;

    let left = load_inputs(&args.left)?;
    let right = load_inputs(&args.right)?;

    let scorer =
        PredictionTable::load_from_file(&args.scored)?.with_unique_id_column(settings.unique_id_column());

    let report = api::compare_records(&settings, &left, &right, &scorer, &config)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            reports::print_summary(&report.explanation.summary);
            reports::print_chart(&report.explanation.chart);
            reports::print_record_comparison(&report.field_diffs);
        }
    }
    Ok(())
}

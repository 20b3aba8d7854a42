use crate::reports::{self, OutputFormat};
use clap::Args;
use matchlens::api;
use matchlens::config::ExplainConfig;
use matchlens::error::{MatchLensError, MlResult};
use matchlens::scoring::PredictionTable;

#[derive(Args, Debug, Clone)]
pub struct ExplainArgs {
    #[command(flatten)]
    pub config: ExplainConfig,

    /// Prediction export (JSON object/array or CSV).
    #[arg(short, long)]
    pub scored: String,

    /// Which prediction row to explain.
    #[arg(long, default_value_t = 0)]
    pub row: usize,

    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

pub fn run(args: ExplainArgs, config: ExplainConfig) -> MlResult<()> {
    let table = PredictionTable::load_from_file(&args.scored)?;
    let record = table
        .rows()
        .get(args.row)
        .ok_or(MatchLensError::EmptyScoreResult)?;

    let explanation = api::explain_record(record, &config);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&explanation)?),
        OutputFormat::Table => {
            reports::print_summary(&explanation.summary);
            reports::print_waterfall(&explanation.waterfall);
            reports::print_chart(&explanation.chart);
        }
    }
    Ok(())
}

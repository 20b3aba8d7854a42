use crate::reports::{self, OutputFormat};
use clap::Args;
use matchlens::diff::generate_diff;
use matchlens::error::MlResult;

#[derive(Args, Debug, Clone)]
pub struct DiffArgs {
    pub left: String,
    pub right: String,

    #[arg(long, default_value = "table")]
    pub format: OutputFormat,
}

pub fn run(args: DiffArgs) -> MlResult<()> {
    let segments = generate_diff(&args.left, &args.right);
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&segments)?),
        OutputFormat::Table => reports::print_segments(&segments),
    }
    Ok(())
}

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use matchlens::config::ExplainConfig;
use matchlens::error::{MatchLensError, MlResult};
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Explain record-linkage match scores", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with explain settings; command-line flags override it.
    #[arg(global = true, long)]
    explain_config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Explain(cmd::explain::ExplainArgs),
    Diff(cmd::diff::DiffArgs),
    Compare(cmd::compare::CompareArgs),
}

fn resolve_config(
    file: Option<&str>,
    cli_config: &ExplainConfig,
    sub_matches: &clap::ArgMatches,
) -> MlResult<ExplainConfig> {
    match file {
        Some(path) => {
            info!("⚖️  Loading explain settings from: {}", path);
            let mut config = ExplainConfig::load_from_file(path)?;
            config.merge_from_cli(cli_config, sub_matches);
            Ok(config)
        }
        None => Ok(cli_config.clone()),
    }
}

fn run(cli: Cli, matches: &clap::ArgMatches) -> MlResult<()> {
    let file = cli.explain_config.as_deref();
    match cli.command {
        Commands::Explain(args) => {
            let sub = matches
                .subcommand_matches("explain")
                .ok_or_else(|| MatchLensError::Config("missing explain arguments".into()))?;
            let config = resolve_config(file, &args.config, sub)?;
            cmd::explain::run(args, config)
        }
        Commands::Diff(args) => cmd::diff::run(args),
        Commands::Compare(args) => {
            let sub = matches
                .subcommand_matches("compare")
                .ok_or_else(|| MatchLensError::Config("missing compare arguments".into()))?;
            let config = resolve_config(file, &args.config, sub)?;
            cmd::compare::run(args, config)
        }
    }
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli, &matches) {
        error!("❌ {}", e);
        let code = match e {
            MatchLensError::EmptyScoreResult => 2,
            _ => 1,
        };
        process::exit(code);
    }
}

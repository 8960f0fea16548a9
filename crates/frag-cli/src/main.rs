use clap::Parser;
use frag_cli::cli::{Cli, Commands};
use tracing::error;
use tracing_subscriber::FmtSubscriber;

mod commands;

fn main() {
    let cli = Cli::parse();

    // stdout carries command output (tables, TOML), so logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {e}");
    }

    let result = match &cli.command {
        Commands::Run {
            assets,
            out,
            jsonl,
            model,
            threads,
        } => commands::run::handle(assets, out, jsonl.as_deref(), model, threads),
        Commands::Curve {
            assets,
            asset,
            model,
            step,
        } => commands::curve::handle(assets, asset, model, *step),
        Commands::Score {
            label,
            dimension,
            scores,
        } => commands::score::handle(label, dimension.as_deref(), scores.as_deref()),
        Commands::Config { config } => commands::config::handle(config.as_deref()),
        Commands::Completions { shell, out } => {
            commands::completions::handle(*shell, out.as_deref())
        }
    };

    if let Err(e) = result {
        error!("{e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

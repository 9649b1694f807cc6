//! CLI entry point.
//!
//! Loads `.env`, sets up logging, bootstraps the context and dispatches to
//! a handler. Errors are printed once and mapped to an exit code.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bottlenose_cli::commands::to_query;
use bottlenose_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let cli_config = CliConfig {
        config_path: cli.config,
    };

    // `serve` only resolves the config; the HTTP adapter bootstraps its own
    // context from it.
    match cli.command {
        None => handlers::serve::execute(&cli_config.resolve()?, None, None).await,
        Some(Commands::Serve { host, port }) => {
            handlers::serve::execute(&cli_config.resolve()?, host, port).await
        }
        Some(Commands::Grammars) => {
            handlers::grammars::execute(&bootstrap(&cli_config)?);
            Ok(())
        }
        Some(Commands::Parse {
            grammar,
            input,
            params,
        }) => {
            let ctx = bootstrap(&cli_config)?;
            handlers::process::parse(&ctx, &grammar, &params.to_query(&input)).await
        }
        Some(Commands::Generate {
            grammar,
            input,
            results,
            derivation,
        }) => {
            let ctx = bootstrap(&cli_config)?;
            let query = to_query(
                &input,
                [("results", &results), ("derivation", &derivation)],
            );
            handlers::process::generate(&ctx, &grammar, &query).await
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        tracing::debug!(error = ?err, "Command failed");
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}

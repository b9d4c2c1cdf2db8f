mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands work on the file itself
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "siteview", &mut std::io::stdout());
            Ok(())
        }

        // Everything else renders analysis results
        cmd => {
            let cfg = config::load(&cli.global)?;
            let format = config::output_format(&cfg, &cli.global)?;
            let color = output::should_color(config::color_mode(&cfg, &cli.global)?);
            output::register_builtin(color);

            let ctx = commands::Context {
                config: &cfg,
                global: &cli.global,
                renderer: output::renderer_for(format)?,
            };

            tracing::debug!(command = ?cmd, output = format.tag(), "dispatching command");
            commands::dispatch(cmd, &ctx).await
        }
    }
}

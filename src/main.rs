use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use syscap::cli::{Cli, Commands};
use syscap::command::CommandCapture;
use syscap::config::CaptureConfig;
use syscap::utils;
use tracing::{error, info};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    match cli.command {
        Commands::Run {
            mute,
            stream,
            output,
            program,
            args,
        } => {
            let config = CaptureConfig {
                muted: mute,
                stream,
            };

            let captured = CommandCapture::new(&program)
                .args(&args)
                .config(config)
                .run()?;
            let report = captured.report(stream)?;

            match output {
                Some(file) => {
                    let path = utils::combine_with_cwd_and_get_absolute_path(&file);
                    utils::write_creating_parents(&path, &report)
                        .with_context(|| format!("Cannot write report to '{}'", path.display()))?;
                    info!("Wrote report to {}", path.display());
                }
                None => print!("{report}"),
            }

            Ok(u8::try_from(captured.exit_code()).unwrap_or(1))
        }
    }
}

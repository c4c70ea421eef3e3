//! CLI entry point.
//!
//! Parses arguments, resolves the output layout, installs logging and
//! dispatches to a handler. Run outcomes become exit codes here and nowhere
//! else.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sunosync_cli::commands::LayoutArgs;
use sunosync_cli::{Cli, Commands, ExitPolicy, bootstrap, handlers, logging, resolve_layout};
use sunosync_core::{OutputLayout, RetrySettings};
use tracing_appender::non_blocking::WorkerGuard;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// Output layout, log file and the guard flushing it.
struct Session {
    layout: OutputLayout,
    log_file: PathBuf,
    _guard: Option<WorkerGuard>,
}

fn start_session(
    cli_args: &GlobalArgs,
    command: &str,
    overrides: &LayoutArgs,
) -> anyhow::Result<Session> {
    let layout = resolve_layout(cli_args.out_dir.as_deref(), overrides)?;
    let log_file = cli_args
        .log_file
        .as_ref()
        .map_or_else(|| layout.log_file(command), PathBuf::from);
    let guard = logging::init_tracing(cli_args.verbose, Some(&log_file));
    Ok(Session {
        layout,
        log_file,
        _guard: guard,
    })
}

struct GlobalArgs {
    out_dir: Option<String>,
    log_file: Option<String>,
    verbose: bool,
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    let command_name = cli.command.name();
    let globals = GlobalArgs {
        out_dir: cli.out_dir,
        log_file: cli.log_file,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Check {
            connection,
            layout,
            scan,
            fail_on_partial,
        } => {
            let session = start_session(&globals, command_name, &layout)?;
            let ctx = bootstrap(
                session.layout.clone(),
                &connection,
                scan.feed_retry(),
                RetrySettings::for_media(),
            )?;
            let report =
                handlers::check::execute(&ctx, scan.scan_settings(), session.log_file.clone())
                    .await?;
            let policy = ExitPolicy {
                fail_on_partial,
                ..ExitPolicy::default()
            };
            Ok(policy.exit_code(report.outcome(), 0))
        }
        Commands::Update {
            connection,
            layout,
            download,
            watch,
        } => {
            let session = start_session(&globals, command_name, &layout)?;
            let ctx = bootstrap(
                session.layout.clone(),
                &connection,
                RetrySettings::for_feed(),
                download.media_retry(),
            )?;
            let settings = watch.apply(download.recovery_settings());
            let report = handlers::update::execute(&ctx, settings).await?;
            let policy = ExitPolicy {
                fail_on_download_errors: download.fail_on_download_errors,
                ..ExitPolicy::default()
            };
            Ok(policy.exit_code(report.outcome(), report.failed))
        }
        Commands::Sync {
            connection,
            layout,
            scan,
            download,
            fail_on_partial,
        } => {
            let session = start_session(&globals, command_name, &layout)?;
            let ctx = bootstrap(
                session.layout.clone(),
                &connection,
                scan.feed_retry(),
                download.media_retry(),
            )?;
            let synced = handlers::sync::execute(
                &ctx,
                scan.scan_settings(),
                download.recovery_settings(),
                session.log_file.clone(),
            )
            .await?;
            let policy = ExitPolicy {
                fail_on_partial,
                fail_on_download_errors: download.fail_on_download_errors,
            };
            Ok(policy.exit_code(synced.outcome, synced.failed_downloads))
        }
        Commands::Paths { layout } => {
            let layout = resolve_layout(globals.out_dir.as_deref(), &layout)?;
            handlers::paths::execute(&layout);
            Ok(0)
        }
    }
}

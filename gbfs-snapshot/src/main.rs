use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use gbfs_snapshot::cli::Cli;
use gbfs_snapshot::snapshot::SnapshotFetcher;

#[tokio::main]
async fn main() -> ExitCode {
    // Invalid or missing network exits here with a usage error, before any
    // directory or request is touched
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let fetcher = match SnapshotFetcher::new(cli.snapshot_config()) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!(error = %e, "failed to start");
            return ExitCode::from(e.exit_code());
        }
    };

    match fetcher.run(cli.network).await {
        Ok(snapshot) => {
            println!("{}", snapshot.files.stations.display());
            println!("{}", snapshot.files.status.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(
                network = %cli.network,
                kind = ?e.kind(),
                error = %error_chain(&e),
                "snapshot failed"
            );
            ExitCode::from(e.exit_code())
        }
    }
}

/// Render an error and its sources as `outer: inner: ...`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }
    message
}

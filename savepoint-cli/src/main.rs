//! # Savepoint CLI
//!
//! Migrate, inspect and export layout editor savepoints.

use clap::Parser;
use savepoint_cli::{commands, CliArgs, Command, ExportConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing.
///
/// Set `RUST_LOG` to control log levels (default: savepoint crates at info).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("savepoint_cli=info,savepoint_core=info,savepoint_export=info")
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let command = args.command.clone();
    let config = ExportConfig::from(args);

    match command {
        Command::Migrate { input, output } => {
            match commands::migrate_file(&input, output.as_deref()).await? {
                Some(migration) => println!(
                    "Migrated from format version {} to {}",
                    migration.from, migration.to
                ),
                None => println!("Already on the current format version"),
            }
        }
        Command::Inspect { file } => {
            let summary = commands::inspect_file(&file).await?;
            println!("{summary}");
        }
        Command::Export { file } => {
            if let Some(ref url) = config.backend_url {
                tracing::info!("Conversion backend: {}", url);
            }
            let written = commands::export_file(&file, &config).await?;
            println!("Wrote {}", written.display());
        }
    }

    Ok(())
}

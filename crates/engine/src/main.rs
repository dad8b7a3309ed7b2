//! EssenceCalc - Main entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use essencecalc_engine::cli::{self, Cli, Command};
use essencecalc_engine::infrastructure::settings::EngineSettings;
use essencecalc_engine::App;

fn main() -> anyhow::Result<()> {
    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let _ = dotenvy::from_filename(filename);
    }

    // Initialize logging. Output goes to stdout, so logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "essencecalc_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Cli::parse();

    // Load configuration
    let mut settings = EngineSettings::from_env();
    if let Some(catalog) = args.catalog {
        settings.catalog_path = catalog;
    }
    if let Some(snapshot) = args.snapshot {
        settings.snapshot_path = snapshot;
    }

    let mut app = App::new(settings)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::run(
        args.command.unwrap_or(Command::Show),
        &mut app.session,
        args.json,
        &mut out,
    )?;

    Ok(())
}

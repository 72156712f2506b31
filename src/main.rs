// Weekly report entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr)
// 2. Load config (copying defaults on first run)
// 3. Run the report pipeline: fetch, aggregate, generate, write
// 4. Print the written path and exit

use sleeper_gazette::app;
use sleeper_gazette::config;

use anyhow::Context;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("weekly report generator starting");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        league = %config.league.id,
        tone = %config.report.tone,
        language = %config.report.language,
        "config loaded"
    );

    let path = app::run(&config).await?;
    info!("weekly report written: {}", path.display());

    Ok(())
}

/// Initialize tracing to stderr, honoring `RUST_LOG` when set.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sleeper_gazette=info,gazette=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

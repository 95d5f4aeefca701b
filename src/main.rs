use anyhow::Result;
use openmic::{
    config::{Config, CONFIG_FILE},
    pipeline,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) load config ──────────────────────────────────────────────
    let config = Config::load(CONFIG_FILE)?;
    config.validate()?;

    // ─── 3) run the pass ─────────────────────────────────────────────
    let summary = pipeline::run_geoapify(&config).await?;
    info!(
        path = %summary.output_path.display(),
        rows = summary.stats.rows,
        resolved = summary.stats.resolved,
        skipped = summary.stats.skipped,
        failed = summary.stats.failed,
        "all done"
    );
    Ok(())
}

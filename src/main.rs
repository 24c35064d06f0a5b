use anyhow::Result;
use catalog_i18n::audit;
use catalog_i18n::config::Config;
use catalog_i18n::db::CatalogStore;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("catalog_i18n=info".parse()?),
        )
        .init();

    let repair = std::env::args().skip(1).any(|arg| arg == "--repair");
    info!("Starting language audit (repair: {})", repair);

    let config = Config::from_env()?;
    let registry = config.locale_registry()?;
    info!(
        "Supported locales: {:?}, default '{}', fallback '{}'",
        registry.supported().iter().map(|l| l.code()).collect::<Vec<_>>(),
        registry.default_locale(),
        registry.fallback_locale()
    );

    let store = CatalogStore::from_config(&config).await?;
    let report = audit::audit_catalog(&store, repair).await?;

    if report.is_clean() {
        info!("All {} records track their languages", report.scanned);
    } else if !repair {
        warn!(
            "{} record(s) have untracked translations; rerun with --repair to fix",
            report.untracked.len()
        );
    }

    let coverage = audit::translation_coverage(&store, &registry).await?;

    let summary = serde_json::json!({
        "languages": report,
        "coverage": coverage,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

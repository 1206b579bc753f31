//! dvd-analytics: rental store reporting
//!
//! Connects to the configured database, installs the normalization views
//! and prints every report as one document.
//!
//! ## Usage
//! ```text
//! dvd-analytics [CONFIG_PATH]
//! ```
//!
//! ## Configuration
//! - DVD_ANALYTICS_CONFIG: Path to a YAML config file (optional)
//! - DVD_ANALYTICS_STORAGE__TYPE: `sqlite` or `postgres`
//! - DVD_ANALYTICS_REPORTS__AS_OF: Churn evaluation instant (default: now)
//! - DVD_ANALYTICS_LOG: Log filter (default: info)

use tracing::{error, info};

use dvd_analytics::config::Config;
use dvd_analytics::pipeline::{ReportOptions, ReportPipeline};
use dvd_analytics::storage;
use dvd_analytics::utils::bootstrap::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_path = std::env::args().nth(1);
    let config = Config::load(config_path.as_deref())?;

    let store = storage::connect(&config.storage).await?;
    let options = ReportOptions::from_config(&config.reports);
    info!(backend = %config.storage.storage_type, "dvd-analytics started");

    let reports = ReportPipeline::new(store, options).run().await?;
    if !reports.verify_revenue_conservation() {
        error!("Revenue breakdowns do not sum to the same total");
    }

    println!("{}", reports.render(config.output.format)?);
    Ok(())
}

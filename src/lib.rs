//! SliceCost: cost breakdowns for 3D printing jobs.
//!
//! The pricing core lives in [`domain`]: [`domain::calculate_costs`] and the
//! G-code metadata extractor [`domain::extract_metadata`]. [`infra`] reads
//! files, [`util`] persists the parameter config and formats amounts, and
//! [`ui`] renders results for the terminal.

pub mod domain;
pub mod infra;
pub mod ui;
pub mod util;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber. Logs go to stderr; the level
/// defaults to `warn` and can be changed through `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

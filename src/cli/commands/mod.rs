//! CLI command implementations

pub mod analyze;
pub mod completions;
pub mod dashboard;
pub mod generate;
pub mod import;

use log::debug;
use miette::{IntoDiagnostic, Result};

use crate::core::{Config, OrderStore};
use crate::entities::Observation;

/// Load the analysis table from the configured store
///
/// The store handle is released before this returns.
pub(crate) fn load_table(config: &Config) -> Result<Vec<Observation>> {
    debug!("loading observations from {}", config.db_path.display());
    OrderStore::with(&config.db_path, config.credential.as_ref(), |store| {
        store.load_observations()
    })
    .into_diagnostic()
}

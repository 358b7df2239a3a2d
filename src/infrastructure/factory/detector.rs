//! Detector factory.

use std::sync::Arc;

use crate::adapter::outbound::{HeuristicScorer, TemplateExplainer};
use crate::application::Detector;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::QuoteSource;

use super::source::{build_fee_schedule, build_sources};

/// Build a detector over the configured exchanges.
///
/// # Errors
///
/// Fails if an adapter cannot be built or the configuration is invalid.
pub fn build_detector(config: &Config) -> Result<Detector> {
    build_detector_with(config, build_sources(config)?)
}

/// Build a detector over caller-supplied sources, using everything else
/// from `config`. Source order must match `config.exchanges`.
///
/// # Errors
///
/// Fails if there are not exactly two distinct sources or the configuration
/// is invalid.
pub fn build_detector_with(
    config: &Config,
    sources: Vec<Arc<dyn QuoteSource>>,
) -> Result<Detector> {
    let mut builder = Detector::builder()
        .symbols(config.symbols.iter().cloned())
        .fees(build_fee_schedule(config)?)
        .config(config.detector.clone())
        .scorer(Arc::new(HeuristicScorer::new(config.scoring)))
        .explainer(Arc::new(TemplateExplainer));

    for exchange in &config.exchanges {
        builder = builder.fatal_cooldown(exchange.exchange_id(), exchange.fatal_cooldown());
    }
    for source in sources {
        builder = builder.source(source);
    }

    builder.build()
}

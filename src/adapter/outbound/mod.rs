//! Outbound adapters: exchanges, scoring, explanation.

pub mod binance;
pub mod explainer;
pub mod kraken;
pub mod rest;
pub mod scorer;
pub mod symbols;

pub use binance::BinanceSource;
pub use explainer::TemplateExplainer;
pub use kraken::KrakenSource;
pub use scorer::{HeuristicScorer, ScoreWeights};
pub use symbols::SymbolMap;

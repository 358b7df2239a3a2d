use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use cryptogap::application::{Detector, DetectorConfig};
use cryptogap::domain::{ExchangeId, FeeSchedule};
use cryptogap::port::{Explainer, Scorer};
use cryptogap::testkit::config;
use cryptogap::testkit::domain::symbols;
use cryptogap::testkit::scoring::FixedScorer;
use cryptogap::testkit::source::ScriptedSource;

/// Two scripted exchanges "a" and "b" and a detector over them.
pub struct Harness {
    pub a: Arc<ScriptedSource>,
    pub b: Arc<ScriptedSource>,
    pub detector: Detector,
}

pub struct HarnessBuilder {
    symbols: Vec<&'static str>,
    fee: Decimal,
    config: DetectorConfig,
    scorer: Arc<dyn Scorer>,
    explainer: Option<Arc<dyn Explainer>>,
    a: ScriptedSource,
    b: ScriptedSource,
}

impl HarnessBuilder {
    pub fn new(symbols: &[&'static str]) -> Self {
        Self {
            symbols: symbols.to_vec(),
            fee: dec!(0.001),
            config: config::detector(dec!(1.0)),
            scorer: Arc::new(FixedScorer::new(0.75)),
            explainer: None,
            a: ScriptedSource::new("a"),
            b: ScriptedSource::new("b"),
        }
    }

    pub fn min_profit(mut self, pct: Decimal) -> Self {
        self.config.min_profit_pct = pct;
        self
    }

    /// Fee rate (fraction) applied to both exchanges.
    pub fn fee(mut self, fee: Decimal) -> Self {
        self.fee = fee;
        self
    }

    pub fn config(mut self, f: impl FnOnce(&mut DetectorConfig)) -> Self {
        f(&mut self.config);
        self
    }

    pub fn scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn explainer(mut self, explainer: Arc<dyn Explainer>) -> Self {
        self.explainer = Some(explainer);
        self
    }

    pub fn a(mut self, f: impl FnOnce(ScriptedSource) -> ScriptedSource) -> Self {
        self.a = f(self.a);
        self
    }

    pub fn b(mut self, f: impl FnOnce(ScriptedSource) -> ScriptedSource) -> Self {
        self.b = f(self.b);
        self
    }

    pub fn build(self) -> Harness {
        let a = Arc::new(self.a);
        let b = Arc::new(self.b);
        let fees = FeeSchedule::new()
            .with_rate(ExchangeId::new("a"), self.fee)
            .and_then(|f| f.with_rate(ExchangeId::new("b"), self.fee))
            .expect("valid fees");

        let mut builder = Detector::builder()
            .source(a.clone())
            .source(b.clone())
            .symbols(symbols(&self.symbols))
            .fees(fees)
            .config(self.config)
            .scorer(self.scorer);
        if let Some(explainer) = self.explainer {
            builder = builder.explainer(explainer);
        }

        Harness {
            a,
            b,
            detector: builder.build().expect("valid detector"),
        }
    }
}

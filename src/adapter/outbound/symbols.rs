//! Canonical to exchange-native symbol translation.

use std::collections::{HashMap, HashSet};

use crate::domain::Symbol;

/// Translates canonical `BASE/QUOTE` pairs into an exchange's native names.
///
/// Default rule: aliased base followed by aliased quote, no separator.
/// Explicit overrides win over the rule; unsupported pairs resolve to
/// `None`.
#[derive(Debug, Clone, Default)]
pub struct SymbolMap {
    base_aliases: HashMap<String, String>,
    quote_aliases: HashMap<String, String>,
    overrides: HashMap<Symbol, String>,
    unsupported: HashSet<Symbol>,
}

impl SymbolMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binance lists dollar pairs against USDT.
    pub fn binance() -> Self {
        Self::new().with_quote_alias("USD", "USDT")
    }

    /// Kraken calls bitcoin XBT.
    pub fn kraken() -> Self {
        Self::new().with_base_alias("BTC", "XBT")
    }

    #[must_use]
    pub fn with_base_alias(mut self, canonical: &str, native: &str) -> Self {
        self.base_aliases
            .insert(canonical.to_string(), native.to_string());
        self
    }

    #[must_use]
    pub fn with_quote_alias(mut self, canonical: &str, native: &str) -> Self {
        self.quote_aliases
            .insert(canonical.to_string(), native.to_string());
        self
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: impl IntoIterator<Item = (Symbol, String)>) -> Self {
        self.overrides.extend(overrides);
        self
    }

    #[must_use]
    pub fn with_unsupported(mut self, symbols: impl IntoIterator<Item = Symbol>) -> Self {
        self.unsupported.extend(symbols);
        self
    }

    /// Native base and quote assets after aliasing.
    pub fn native_assets(&self, symbol: &Symbol) -> (String, String) {
        let alias = |map: &HashMap<String, String>, asset: &str| {
            map.get(asset).cloned().unwrap_or_else(|| asset.to_string())
        };
        (
            alias(&self.base_aliases, symbol.base()),
            alias(&self.quote_aliases, symbol.quote()),
        )
    }

    /// Native symbol, or `None` when the exchange cannot trade the pair.
    pub fn native(&self, symbol: &Symbol) -> Option<String> {
        if self.unsupported.contains(symbol) {
            return None;
        }
        if let Some(native) = self.overrides.get(symbol) {
            return Some(native.clone());
        }
        let (base, quote) = self.native_assets(symbol);
        Some(format!("{base}{quote}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(s: &str) -> Symbol {
        Symbol::parse(s).unwrap()
    }

    #[test]
    fn binance_uses_usdt() {
        let map = SymbolMap::binance();
        assert_eq!(map.native(&symbol("BTC/USD")).as_deref(), Some("BTCUSDT"));
        assert_eq!(map.native(&symbol("ETH/BTC")).as_deref(), Some("ETHBTC"));
    }

    #[test]
    fn kraken_uses_xbt() {
        let map = SymbolMap::kraken();
        assert_eq!(map.native(&symbol("BTC/USD")).as_deref(), Some("XBTUSD"));
        assert_eq!(map.native(&symbol("SOL/USD")).as_deref(), Some("SOLUSD"));
        assert_eq!(
            map.native_assets(&symbol("BTC/USD")),
            ("XBT".to_string(), "USD".to_string())
        );
    }

    #[test]
    fn overrides_and_unsupported() {
        let map = SymbolMap::kraken()
            .with_overrides([(symbol("DOGE/USD"), "XDGUSD".to_string())])
            .with_unsupported([symbol("MATIC/USD")]);

        assert_eq!(map.native(&symbol("DOGE/USD")).as_deref(), Some("XDGUSD"));
        assert_eq!(map.native(&symbol("MATIC/USD")), None);
    }
}

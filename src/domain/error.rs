//! Domain validation errors.
//!
//! Returned by `try_new` constructors when an invariant would be violated.
//!
//! ```
//! use cryptogap::domain::{DomainError, ExchangeId, Quote, Symbol};
//! use rust_decimal_macros::dec;
//!
//! let result = Quote::builder(ExchangeId::new("binance"), Symbol::parse("BTC/USD").unwrap())
//!     .bid(dec!(101))
//!     .ask(dec!(100))
//!     .build();
//!
//! assert!(matches!(result, Err(DomainError::CrossedQuote { .. })));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Prices must be strictly positive.
    #[error("{field} must be positive, got {value}")]
    NonPositivePrice {
        /// Which side of the quote was invalid.
        field: &'static str,
        /// The offending value.
        value: Decimal,
    },

    /// A valid quote never has its bid above its ask.
    #[error("bid {bid} is above ask {ask}")]
    CrossedQuote {
        /// Best bid.
        bid: Decimal,
        /// Best ask.
        ask: Decimal,
    },

    /// Sizes and volumes cannot be negative.
    #[error("{field} cannot be negative, got {value}")]
    NegativeAmount {
        /// Which amount was invalid.
        field: &'static str,
        /// The offending value.
        value: Decimal,
    },

    /// Fee rates are fractions in `[0, 1)`.
    #[error("fee rate must be in [0, 1), got {0}")]
    InvalidFeeRate(Decimal),

    /// Symbols are written `BASE/QUOTE`.
    #[error("malformed symbol '{0}', expected BASE/QUOTE")]
    MalformedSymbol(String),

    /// A required quote field was not supplied to the builder.
    #[error("missing {0}")]
    MissingField(&'static str),
}

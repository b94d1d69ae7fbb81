//! Error taxonomy for the secret-sharing library.
//!
//! Every failure is detected at the point of violation and surfaced as a
//! distinct variant — nothing is coerced, defaulted, or retried. Arithmetic
//! is deterministic, so retrying an identical operation cannot change the
//! outcome.

use thiserror::Error;

/// All failure conditions of the library.
#[derive(Debug, Error)]
pub enum Error {
    /// Threshold K below the minimum of 2.
    #[error("threshold must be at least 2 (got {0})")]
    ThresholdTooSmall(u8),

    /// Threshold K larger than the total number of shares N.
    #[error("threshold ({threshold}) exceeds total shares ({shares})")]
    ThresholdExceedsShares { threshold: u8, shares: u8 },

    /// A secret was constructed from an empty payload.
    #[error("secret payload must not be empty")]
    EmptySecret,

    /// Reconstruction was attempted with fewer than two shares.
    #[error("reconstruction needs at least 2 shares, have {0}")]
    TooFewShares(usize),

    /// Two shares with the same coordinate pair were supplied.
    #[error("duplicate share coordinates")]
    DuplicateShares,

    /// Requested security level outside the supported Mersenne range.
    #[error("security level {0} is outside the supported range 13..=43112609")]
    SecurityLevelOutOfRange(u32),

    /// Division or modulo with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// Square root of a negative value.
    #[error("square root of a negative value")]
    NegativeSquareRoot,

    /// A big integer did not fit into the requested fixed-width type.
    #[error("value does not fit into the requested integer width")]
    IntegerOverflow,

    /// Modular division where denominator and modulus share a factor.
    #[error("denominator and modulus are not coprime")]
    NotCoprime,

    /// A hex coordinate could not be parsed.
    #[error("invalid hex value {0:?}")]
    InvalidHex(String),

    /// A base64 secret representation could not be decoded.
    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// A share line did not match the `<hex(x)><sep><hex(y)>` wire form.
    #[error("malformed share line {0:?}")]
    MalformedShare(String),

    /// Secret bytes did not decode as text in the requested encoding.
    #[error("secret bytes are not valid text")]
    InvalidText,
}

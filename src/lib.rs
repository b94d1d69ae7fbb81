//! Shamir secret sharing over Mersenne-prime fields.
//!
//! Split a secret into N shares such that any K of them reconstruct it
//! exactly while fewer than K reveal nothing. The field modulus is a
//! Mersenne prime `2^p − 1` chosen from a fixed exponent table; the prime
//! used for a split is re-derived during reconstruction from the shares
//! themselves.
//!
//! The arithmetic underneath is this crate's own: an arbitrary-precision
//! signed integer ([`BigInt`]) and a self-wiping variant ([`SecureInt`])
//! that zeroes its storage when dropped. The protocol layer is generic
//! over either backend through the [`Calculator`] trait.
//!
//! ```
//! use shamir_mersenne::{BigInt, Secret, ShamirsSecretSharing};
//!
//! let mut sss = ShamirsSecretSharing::<BigInt>::new();
//! let secret = Secret::from_text("Hello World!!")?;
//! let shares = sss.split(3, 7, &secret)?;
//!
//! // Any three shares are enough; the prime is re-derived from them.
//! let mut fresh = ShamirsSecretSharing::<BigInt>::new();
//! let recovered = fresh.reconstruct_points(&shares.points()[..3])?;
//! assert_eq!(recovered.to_text()?, "Hello World!!");
//! # Ok::<(), shamir_mersenne::Error>(())
//! ```

mod bigint;
mod calculator;
mod error;
mod euclid;
mod secret;
mod secure;
mod security;
mod shamir;
mod shares;

pub use bigint::BigInt;
pub use calculator::Calculator;
pub use error::Error;
pub use euclid::{div_mod, extended_gcd, ExtendedGcd};
pub use secret::{Secret, TextEncoding};
pub use secure::SecureInt;
pub use security::{SecurityLevel, MERSENNE_EXPONENTS};
pub use shamir::ShamirsSecretSharing;
pub use shares::{FinitePoint, ShareSet, DEFAULT_SEPARATOR};

//! Numeric abstraction over the big-integer backends.
//!
//! The protocol layer (polynomial evaluation, Lagrange interpolation,
//! prime management) is written once against [`Calculator`] and works with
//! any backend that implements it. The set of backends is closed and
//! resolved at compile time: [`BigInt`](crate::bigint::BigInt) and
//! [`SecureInt`](crate::secure::SecureInt). Mixing backends in one
//! computation is a type error, not a runtime coercion.

use std::fmt;

use zeroize::Zeroize;

use crate::bigint::BigInt;
use crate::error::Error;

/// Arithmetic surface the secret-sharing protocol needs from a backend.
///
/// All operations return new values; implementations are immutable after
/// construction. Fallible operations report the exact violation instead of
/// defaulting: division by zero, negative square roots, and narrowing
/// overflows each carry their own error.
pub trait Calculator:
    Sized + Clone + Eq + Ord + fmt::Debug + fmt::Display + fmt::UpperHex + Zeroize
{
    /// Parse a little-endian two's-complement byte buffer.
    fn from_le_bytes(bytes: &[u8]) -> Self;

    fn from_u64(value: u64) -> Self;

    fn from_i64(value: i64) -> Self;

    /// Parse a hex string (optional leading `-`, no `0x` prefix).
    fn from_hex(hex: &str) -> Result<Self, Error>;

    /// Minimal little-endian two's-complement serialization.
    fn to_le_bytes(&self) -> Vec<u8>;

    /// Length of [`Calculator::to_le_bytes`] in bytes.
    fn byte_count(&self) -> usize;

    /// Narrow to `u64`; fails with an overflow condition when the value
    /// is negative or too large.
    fn to_u64(&self) -> Result<u64, Error>;

    fn zero() -> Self;

    fn one() -> Self;

    fn two() -> Self;

    fn add(&self, rhs: &Self) -> Self;

    fn sub(&self, rhs: &Self) -> Self;

    fn mul(&self, rhs: &Self) -> Self;

    fn div(&self, rhs: &Self) -> Result<Self, Error>;

    /// Truncated remainder: the result takes the dividend's sign.
    fn rem(&self, rhs: &Self) -> Result<Self, Error>;

    fn pow(&self, exponent: u32) -> Self;

    /// Integer square root (floor); fails on negative operands.
    fn sqrt(&self) -> Result<Self, Error>;

    fn abs(&self) -> Self;

    fn shl(&self, bits: usize) -> Self;

    fn shr(&self, bits: usize) -> Self;

    fn inc(&self) -> Self;

    fn dec(&self) -> Self;

    fn is_zero(&self) -> bool;

    fn is_one(&self) -> bool;

    fn is_even(&self) -> bool;

    /// −1, 0, or +1.
    fn sign(&self) -> i8;

    /// Constant-time equality over the full storage of both operands.
    fn ct_eq(&self, rhs: &Self) -> bool;
}

impl Calculator for BigInt {
    fn from_le_bytes(bytes: &[u8]) -> Self {
        BigInt::from_le_bytes(bytes)
    }

    fn from_u64(value: u64) -> Self {
        BigInt::from_u64(value)
    }

    fn from_i64(value: i64) -> Self {
        BigInt::from_i64(value)
    }

    fn from_hex(hex: &str) -> Result<Self, Error> {
        BigInt::from_hex(hex)
    }

    fn to_le_bytes(&self) -> Vec<u8> {
        BigInt::to_le_bytes(self)
    }

    fn byte_count(&self) -> usize {
        BigInt::byte_count(self)
    }

    fn to_u64(&self) -> Result<u64, Error> {
        BigInt::to_u64(self)
    }

    fn zero() -> Self {
        BigInt::zero()
    }

    fn one() -> Self {
        BigInt::one()
    }

    fn two() -> Self {
        BigInt::two()
    }

    fn add(&self, rhs: &Self) -> Self {
        self + rhs
    }

    fn sub(&self, rhs: &Self) -> Self {
        self - rhs
    }

    fn mul(&self, rhs: &Self) -> Self {
        self * rhs
    }

    fn div(&self, rhs: &Self) -> Result<Self, Error> {
        BigInt::div(self, rhs)
    }

    fn rem(&self, rhs: &Self) -> Result<Self, Error> {
        BigInt::rem(self, rhs)
    }

    fn pow(&self, exponent: u32) -> Self {
        BigInt::pow(self, exponent)
    }

    fn sqrt(&self) -> Result<Self, Error> {
        BigInt::sqrt(self)
    }

    fn abs(&self) -> Self {
        BigInt::abs(self)
    }

    fn shl(&self, bits: usize) -> Self {
        self << bits
    }

    fn shr(&self, bits: usize) -> Self {
        self >> bits
    }

    fn inc(&self) -> Self {
        BigInt::inc(self)
    }

    fn dec(&self) -> Self {
        BigInt::dec(self)
    }

    fn is_zero(&self) -> bool {
        BigInt::is_zero(self)
    }

    fn is_one(&self) -> bool {
        BigInt::is_one(self)
    }

    fn is_even(&self) -> bool {
        BigInt::is_even(self)
    }

    fn sign(&self) -> i8 {
        BigInt::sign(self)
    }

    fn ct_eq(&self, rhs: &Self) -> bool {
        BigInt::ct_eq(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secure::SecureInt;

    /// Exercise a backend through the trait surface only.
    fn backend_contract<C: Calculator>() {
        let a = C::from_u64(600);
        let b = C::from_u64(40);
        assert_eq!(a.add(&b), C::from_u64(640));
        assert_eq!(a.sub(&b), C::from_u64(560));
        assert_eq!(a.mul(&b), C::from_u64(24000));
        assert_eq!(a.div(&b).unwrap(), C::from_u64(15));
        assert_eq!(a.rem(&b).unwrap(), C::zero());
        assert_eq!(b.pow(2), C::from_u64(1600));
        assert_eq!(a.sqrt().unwrap(), C::from_u64(24));
        assert_eq!(C::from_i64(-600).abs(), a);
        assert_eq!(C::one().shl(4), C::from_u64(16));
        assert_eq!(C::from_u64(16).shr(4), C::one());
        assert_eq!(a.inc(), C::from_u64(601));
        assert_eq!(a.dec(), C::from_u64(599));
        assert!(C::zero().is_zero());
        assert!(C::one().is_one());
        assert!(C::two().is_even());
        assert_eq!(C::from_i64(-3).sign(), -1);
        assert_eq!(C::zero().sign(), 0);
        assert!(a.ct_eq(&C::from_u64(600)));
        assert!(!a.ct_eq(&b));
        assert!(a > b);
        assert!(b < a);

        let bytes = a.to_le_bytes();
        assert_eq!(C::from_le_bytes(&bytes), a);
        assert_eq!(a.byte_count(), bytes.len());
        assert_eq!(a.to_u64().unwrap(), 600);
        assert_eq!(C::from_hex(&format!("{a:X}")).unwrap(), a);
    }

    #[test]
    fn bigint_backend_contract() {
        backend_contract::<BigInt>();
    }

    #[test]
    fn secure_backend_contract() {
        backend_contract::<SecureInt>();
    }

    #[test]
    fn division_errors_surface_through_trait() {
        fn probe<C: Calculator>() {
            assert!(C::one().div(&C::zero()).is_err());
            assert!(C::from_i64(-9).sqrt().is_err());
            assert!(C::from_i64(-1).to_u64().is_err());
        }
        probe::<BigInt>();
        probe::<SecureInt>();
    }
}

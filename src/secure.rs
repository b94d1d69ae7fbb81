//! Self-wiping big integer for secret-derived operands.
//!
//! [`SecureInt`] owns its backing words and overwrites every one of them
//! with zero, synchronously, when the value is dropped — there is no
//! reliance on a finalizer running at an indeterminate time. Use after the
//! wipe is unrepresentable: the wipe happens in `Drop`, and the move and
//! borrow rules keep dropped values out of reach.
//!
//! Equality on secure values is constant-time (every word of both operands
//! is examined), so comparing a reconstructed secret against an expected
//! constant does not leak where the first mismatch occurs.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::bigint::BigInt;
use crate::calculator::Calculator;
use crate::error::Error;

/// Arbitrary-precision signed integer that zeroes its storage on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecureInt {
    value: BigInt,
}

impl SecureInt {
    /// Take ownership of a plain big integer, attaching the wipe-on-drop
    /// lifecycle to it.
    pub fn new(value: BigInt) -> Self {
        SecureInt { value }
    }

    #[cfg(test)]
    pub(crate) fn raw(&self) -> &BigInt {
        &self.value
    }
}

impl PartialEq for SecureInt {
    /// Constant-time: both operands are examined in full.
    fn eq(&self, other: &Self) -> bool {
        self.value.ct_eq(&other.value)
    }
}

impl Eq for SecureInt {}

impl PartialOrd for SecureInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SecureInt {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl Hash for SecureInt {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for SecureInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl fmt::UpperHex for SecureInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.value, f)
    }
}

impl fmt::Debug for SecureInt {
    /// Redacted — secure values must not leak through debug logging.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureInt({} bytes)", self.value.byte_count())
    }
}

impl Calculator for SecureInt {
    fn from_le_bytes(bytes: &[u8]) -> Self {
        SecureInt::new(BigInt::from_le_bytes(bytes))
    }

    fn from_u64(value: u64) -> Self {
        SecureInt::new(BigInt::from_u64(value))
    }

    fn from_i64(value: i64) -> Self {
        SecureInt::new(BigInt::from_i64(value))
    }

    fn from_hex(hex: &str) -> Result<Self, Error> {
        Ok(SecureInt::new(BigInt::from_hex(hex)?))
    }

    fn to_le_bytes(&self) -> Vec<u8> {
        self.value.to_le_bytes()
    }

    fn byte_count(&self) -> usize {
        self.value.byte_count()
    }

    fn to_u64(&self) -> Result<u64, Error> {
        self.value.to_u64()
    }

    fn zero() -> Self {
        SecureInt::new(BigInt::zero())
    }

    fn one() -> Self {
        SecureInt::new(BigInt::one())
    }

    fn two() -> Self {
        SecureInt::new(BigInt::two())
    }

    fn add(&self, rhs: &Self) -> Self {
        SecureInt::new(&self.value + &rhs.value)
    }

    fn sub(&self, rhs: &Self) -> Self {
        SecureInt::new(&self.value - &rhs.value)
    }

    fn mul(&self, rhs: &Self) -> Self {
        SecureInt::new(&self.value * &rhs.value)
    }

    fn div(&self, rhs: &Self) -> Result<Self, Error> {
        Ok(SecureInt::new(self.value.div(&rhs.value)?))
    }

    fn rem(&self, rhs: &Self) -> Result<Self, Error> {
        Ok(SecureInt::new(self.value.rem(&rhs.value)?))
    }

    fn pow(&self, exponent: u32) -> Self {
        SecureInt::new(self.value.pow(exponent))
    }

    fn sqrt(&self) -> Result<Self, Error> {
        Ok(SecureInt::new(self.value.sqrt()?))
    }

    fn abs(&self) -> Self {
        SecureInt::new(self.value.abs())
    }

    fn shl(&self, bits: usize) -> Self {
        SecureInt::new(&self.value << bits)
    }

    fn shr(&self, bits: usize) -> Self {
        SecureInt::new(&self.value >> bits)
    }

    fn inc(&self) -> Self {
        SecureInt::new(self.value.inc())
    }

    fn dec(&self) -> Self {
        SecureInt::new(self.value.dec())
    }

    fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    fn is_one(&self) -> bool {
        self.value.is_one()
    }

    fn is_even(&self) -> bool {
        self.value.is_even()
    }

    fn sign(&self) -> i8 {
        self.value.sign()
    }

    fn ct_eq(&self, rhs: &Self) -> bool {
        self.value.ct_eq(&rhs.value)
    }
}

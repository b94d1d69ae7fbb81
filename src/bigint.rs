//! Arbitrary-precision signed integer arithmetic.
//!
//! `BigInt` is a signed-magnitude integer stored as little-endian `u64`
//! words. It implements exactly the operations the secret-sharing protocol
//! needs: ripple-carry add/sub, schoolbook multiply, binary long division,
//! square-and-multiply exponentiation, Newton square root, and bit shifts.
//!
//! Invariants:
//! - no superfluous leading zero words; zero is the single word `[0]`
//! - zero is never negative
//!
//! Byte serialization is little-endian two's-complement (the sign lives in
//! the high bit of the last byte), so a byte buffer round-trips exactly as
//! long as it is in canonical form.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Shl, Shr, Sub};

use zeroize::Zeroize;

use crate::error::Error;

const WORD_BITS: usize = 64;
const WORD_BYTES: usize = 8;

/// Signed arbitrary-precision integer.
#[derive(Clone)]
pub struct BigInt {
    /// Magnitude, least significant word first. Never empty.
    words: Vec<u64>,
    /// Sign flag. Always `false` for zero.
    negative: bool,
}

impl BigInt {
    pub fn zero() -> Self {
        BigInt { words: vec![0], negative: false }
    }

    pub fn one() -> Self {
        Self::from_u64(1)
    }

    pub fn two() -> Self {
        Self::from_u64(2)
    }

    pub fn from_u64(value: u64) -> Self {
        BigInt { words: vec![value], negative: false }
    }

    pub fn from_i64(value: i64) -> Self {
        BigInt {
            words: vec![value.unsigned_abs()],
            negative: value < 0,
        }
    }

    /// Parse a little-endian two's-complement byte buffer.
    ///
    /// The sign is taken from the high bit of the last byte. An empty
    /// buffer is zero.
    pub fn from_le_bytes(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::zero();
        }
        let raw = Self::magnitude_from_le(bytes);
        if bytes[bytes.len() - 1] & 0x80 == 0 {
            return raw;
        }
        // Negative: value = raw − 2^(8·len).
        let modulus = &Self::one() << (bytes.len() * 8);
        let mut magnitude = &modulus - &raw;
        magnitude.negative = !magnitude.is_zero();
        magnitude
    }

    fn magnitude_from_le(bytes: &[u8]) -> Self {
        let mut words = vec![0u64; bytes.len().div_ceil(WORD_BYTES)];
        for (i, &byte) in bytes.iter().enumerate() {
            words[i / WORD_BYTES] |= (byte as u64) << ((i % WORD_BYTES) * 8);
        }
        let mut out = BigInt { words, negative: false };
        out.normalize();
        out
    }

    /// Serialize to minimal little-endian two's-complement bytes.
    ///
    /// Exact inverse of [`BigInt::from_le_bytes`]: positive values end with
    /// a byte below 0x80 (padded with 0x00 when the magnitude's top byte
    /// would read as a sign bit), negative values end with a byte of 0x80
    /// or above.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        if self.is_zero() {
            return vec![0];
        }
        if !self.negative {
            let mut bytes = self.magnitude_le_bytes();
            if bytes.last().is_some_and(|b| b & 0x80 != 0) {
                bytes.push(0x00);
            }
            return bytes;
        }
        let len = self.magnitude_le_bytes().len();
        let modulus = &Self::one() << (len * 8);
        let complement = &modulus - &self.abs();
        let mut bytes = complement.magnitude_le_bytes();
        bytes.resize(len, 0);
        if bytes.last().is_some_and(|b| b & 0x80 == 0) {
            bytes.push(0xFF);
        }
        bytes
    }

    /// Magnitude as little-endian bytes, trailing zeros trimmed (≥ 1 byte).
    fn magnitude_le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.words.len() * WORD_BYTES);
        for &word in &self.words {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        while bytes.len() > 1 && bytes[bytes.len() - 1] == 0 {
            bytes.pop();
        }
        bytes
    }

    /// Length of the two's-complement serialization in bytes.
    pub fn byte_count(&self) -> usize {
        self.to_le_bytes().len()
    }

    /// Narrow to `u64`, failing when the value is negative or too large.
    pub fn to_u64(&self) -> Result<u64, Error> {
        if self.negative || self.effective_len() > 1 {
            return Err(Error::IntegerOverflow);
        }
        Ok(self.words[0])
    }

    /// Narrow to `i64`, failing when the value does not fit.
    pub fn to_i64(&self) -> Result<i64, Error> {
        if self.effective_len() > 1 {
            return Err(Error::IntegerOverflow);
        }
        let magnitude = self.words[0];
        if self.negative {
            if magnitude > 1 << 63 {
                return Err(Error::IntegerOverflow);
            }
            Ok((magnitude as i64).wrapping_neg())
        } else {
            if magnitude > i64::MAX as u64 {
                return Err(Error::IntegerOverflow);
            }
            Ok(magnitude as i64)
        }
    }

    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn is_one(&self) -> bool {
        !self.negative && self.words[0] == 1 && self.words[1..].iter().all(|&w| w == 0)
    }

    pub fn is_even(&self) -> bool {
        self.words[0] & 1 == 0
    }

    /// −1, 0, or +1.
    pub fn sign(&self) -> i8 {
        if self.is_zero() {
            0
        } else if self.negative {
            -1
        } else {
            1
        }
    }

    pub fn abs(&self) -> Self {
        BigInt { words: self.words.clone(), negative: false }
    }

    pub fn inc(&self) -> Self {
        self + &Self::one()
    }

    pub fn dec(&self) -> Self {
        self - &Self::one()
    }

    /// Number of significant bits of the magnitude (0 for zero).
    pub fn bit_len(&self) -> usize {
        let len = self.effective_len();
        if len == 1 && self.words[0] == 0 {
            return 0;
        }
        (len - 1) * WORD_BITS + (WORD_BITS - self.words[len - 1].leading_zeros() as usize)
    }

    fn get_bit(&self, pos: usize) -> bool {
        let word = pos / WORD_BITS;
        if word >= self.words.len() {
            return false;
        }
        self.words[word] >> (pos % WORD_BITS) & 1 == 1
    }

    fn set_bit(&mut self, pos: usize) {
        let word = pos / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (pos % WORD_BITS);
    }

    /// Word count ignoring leading zero words (≥ 1).
    fn effective_len(&self) -> usize {
        let mut len = self.words.len();
        while len > 1 && self.words[len - 1] == 0 {
            len -= 1;
        }
        len
    }

    fn normalize(&mut self) {
        while self.words.len() > 1 && self.words[self.words.len() - 1] == 0 {
            self.words.pop();
        }
        if self.words.is_empty() {
            self.words.push(0);
        }
        if self.words[0] == 0 && self.words.len() == 1 {
            self.negative = false;
        }
    }

    /// Quotient and remainder of truncated division.
    ///
    /// The quotient's sign is the XOR of the operand signs, the remainder
    /// takes the dividend's sign.
    pub fn div_rem(&self, divisor: &BigInt) -> Result<(BigInt, BigInt), Error> {
        if divisor.is_zero() {
            return Err(Error::DivisionByZero);
        }
        let (q_mag, r_mag) = Self::mag_div_rem(&self.abs(), &divisor.abs());
        let mut quotient = q_mag;
        let mut remainder = r_mag;
        quotient.negative = self.negative != divisor.negative;
        remainder.negative = self.negative;
        quotient.normalize();
        remainder.normalize();
        Ok((quotient, remainder))
    }

    pub fn div(&self, divisor: &BigInt) -> Result<BigInt, Error> {
        Ok(self.div_rem(divisor)?.0)
    }

    pub fn rem(&self, divisor: &BigInt) -> Result<BigInt, Error> {
        Ok(self.div_rem(divisor)?.1)
    }

    /// Binary long division over magnitudes: scan dividend bits from most
    /// to least significant, doubling the remainder and subtracting the
    /// divisor whenever it fits, recording quotient bits.
    fn mag_div_rem(dividend: &BigInt, divisor: &BigInt) -> (BigInt, BigInt) {
        if dividend < divisor {
            return (BigInt::zero(), dividend.clone());
        }
        if divisor.is_one() {
            return (dividend.clone(), BigInt::zero());
        }
        let mut quotient = BigInt::zero();
        let mut remainder = BigInt::zero();
        for i in (0..dividend.bit_len()).rev() {
            remainder = &remainder << 1;
            if dividend.get_bit(i) {
                remainder.set_bit(0);
            }
            if remainder >= *divisor {
                remainder = &remainder - divisor;
                quotient.set_bit(i);
            }
        }
        quotient.normalize();
        remainder.normalize();
        (quotient, remainder)
    }

    /// Square-and-multiply exponentiation.
    pub fn pow(&self, exponent: u32) -> BigInt {
        let mut result = BigInt::one();
        let mut base = self.clone();
        let mut e = exponent;
        while e > 0 {
            if e & 1 == 1 {
                result = &result * &base;
            }
            base = &base * &base;
            e >>= 1;
        }
        result
    }

    /// Integer square root (floor) via Newton's method.
    ///
    /// Starts from `2^⌈bits/2⌉`, which is strictly above the root, and
    /// iterates while the candidate decreases; decreasing non-negative
    /// integers are well-ordered, so the loop terminates.
    pub fn sqrt(&self) -> Result<BigInt, Error> {
        if self.negative {
            return Err(Error::NegativeSquareRoot);
        }
        if self.is_zero() || self.is_one() {
            return Ok(self.clone());
        }
        let mut candidate = &Self::one() << ((self.bit_len() + 1) / 2);
        loop {
            let next = &(&candidate + &self.div(&candidate)?) >> 1;
            if next >= candidate {
                return Ok(candidate);
            }
            candidate = next;
        }
    }

    /// Constant-time equality.
    ///
    /// Examines every word of both operands regardless of where (or
    /// whether) they differ, folding differences into an accumulator
    /// instead of branching away early.
    pub fn ct_eq(&self, other: &BigInt) -> bool {
        let len = self.words.len().max(other.words.len());
        let mut diff = (self.negative as u64) ^ (other.negative as u64);
        for i in 0..len {
            let a = self.words.get(i).copied().unwrap_or(0);
            let b = other.words.get(i).copied().unwrap_or(0);
            diff |= a ^ b;
        }
        diff == 0
    }

    /// Parse a hex string (uppercase or lowercase, optional leading `-`).
    pub fn from_hex(hex: &str) -> Result<BigInt, Error> {
        let trimmed = hex.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidHex(hex.to_string()));
        }
        let mut words = Vec::with_capacity(digits.len().div_ceil(16));
        let mut rest = digits;
        while !rest.is_empty() {
            let split = rest.len().saturating_sub(16);
            let (head, chunk) = rest.split_at(split);
            let word = u64::from_str_radix(chunk, 16)
                .map_err(|_| Error::InvalidHex(hex.to_string()))?;
            words.push(word);
            rest = head;
        }
        let mut out = BigInt { words, negative };
        out.normalize();
        Ok(out)
    }

    #[cfg(test)]
    pub(crate) fn raw_words(&self) -> &[u64] {
        &self.words
    }

    #[cfg(test)]
    pub(crate) fn raw_negative(&self) -> bool {
        self.negative
    }
}

// ---------------------------------------------------------------------------
// Magnitude primitives
// ---------------------------------------------------------------------------

/// Word-wise ripple-carry addition over the longer operand's length.
fn mag_add(a: &[u64], b: &[u64]) -> Vec<u64> {
    let len = a.len().max(b.len());
    let mut out = vec![0u64; len + 1];
    let mut carry = 0u64;
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        let (sum, overflow1) = x.overflowing_add(y);
        let (sum, overflow2) = sum.overflowing_add(carry);
        out[i] = sum;
        carry = overflow1 as u64 + overflow2 as u64;
    }
    out[len] = carry;
    out
}

/// Word-wise ripple-borrow subtraction. Requires `a >= b`.
fn mag_sub(a: &[u64], b: &[u64]) -> Vec<u64> {
    let mut out = vec![0u64; a.len()];
    let mut borrow = 0u64;
    for i in 0..a.len() {
        let y = b.get(i).copied().unwrap_or(0);
        let (diff, underflow1) = a[i].overflowing_sub(y);
        let (diff, underflow2) = diff.overflowing_sub(borrow);
        out[i] = diff;
        borrow = underflow1 as u64 + underflow2 as u64;
    }
    out
}

/// Compare magnitudes, tolerating leading zero words on either side.
fn mag_cmp(a: &[u64], b: &[u64]) -> Ordering {
    let mut alen = a.len();
    while alen > 0 && a[alen - 1] == 0 {
        alen -= 1;
    }
    let mut blen = b.len();
    while blen > 0 && b[blen - 1] == 0 {
        blen -= 1;
    }
    if alen != blen {
        return alen.cmp(&blen);
    }
    for i in (0..alen).rev() {
        match a[i].cmp(&b[i]) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    Ordering::Equal
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

impl Add for &BigInt {
    type Output = BigInt;

    fn add(self, rhs: &BigInt) -> BigInt {
        let mut out = if self.negative == rhs.negative {
            BigInt {
                words: mag_add(&self.words, &rhs.words),
                negative: self.negative,
            }
        } else {
            // Mixed signs: subtract the smaller magnitude from the larger
            // and take the larger operand's sign.
            match mag_cmp(&self.words, &rhs.words) {
                Ordering::Equal => BigInt::zero(),
                Ordering::Greater => BigInt {
                    words: mag_sub(&self.words, &rhs.words),
                    negative: self.negative,
                },
                Ordering::Less => BigInt {
                    words: mag_sub(&rhs.words, &self.words),
                    negative: rhs.negative,
                },
            }
        };
        out.normalize();
        out
    }
}

impl Sub for &BigInt {
    type Output = BigInt;

    fn sub(self, rhs: &BigInt) -> BigInt {
        let mut out = if self.negative != rhs.negative {
            BigInt {
                words: mag_add(&self.words, &rhs.words),
                negative: self.negative,
            }
        } else {
            match mag_cmp(&self.words, &rhs.words) {
                Ordering::Equal => BigInt::zero(),
                Ordering::Greater => BigInt {
                    words: mag_sub(&self.words, &rhs.words),
                    negative: self.negative,
                },
                Ordering::Less => BigInt {
                    words: mag_sub(&rhs.words, &self.words),
                    negative: !rhs.negative,
                },
            }
        };
        out.normalize();
        out
    }
}

impl Mul for &BigInt {
    type Output = BigInt;

    /// Schoolbook multiplication, accumulating 128-bit partial products
    /// into a buffer of combined length and carrying between positions.
    fn mul(self, rhs: &BigInt) -> BigInt {
        if self.is_zero() || rhs.is_zero() {
            return BigInt::zero();
        }
        let mut words = vec![0u64; self.words.len() + rhs.words.len()];
        for i in 0..self.words.len() {
            let mut carry = 0u128;
            for j in 0..rhs.words.len() {
                let product = self.words[i] as u128 * rhs.words[j] as u128
                    + words[i + j] as u128
                    + carry;
                words[i + j] = product as u64;
                carry = product >> 64;
            }
            words[i + rhs.words.len()] = carry as u64;
        }
        let mut out = BigInt {
            words,
            negative: self.negative != rhs.negative,
        };
        out.normalize();
        out
    }
}

impl Neg for &BigInt {
    type Output = BigInt;

    fn neg(self) -> BigInt {
        let mut out = self.clone();
        if !out.is_zero() {
            out.negative = !out.negative;
        }
        out
    }
}

/// Left shift of the magnitude; the sign is preserved.
impl Shl<usize> for &BigInt {
    type Output = BigInt;

    fn shl(self, shift: usize) -> BigInt {
        if shift == 0 || self.is_zero() {
            return self.clone();
        }
        let word_shift = shift / WORD_BITS;
        let bit_shift = shift % WORD_BITS;
        let mut words = vec![0u64; self.words.len() + word_shift + 1];
        if bit_shift == 0 {
            words[word_shift..word_shift + self.words.len()].copy_from_slice(&self.words);
        } else {
            let mut carry = 0u64;
            for (i, &word) in self.words.iter().enumerate() {
                words[i + word_shift] = word << bit_shift | carry;
                carry = word >> (WORD_BITS - bit_shift);
            }
            words[self.words.len() + word_shift] = carry;
        }
        let mut out = BigInt { words, negative: self.negative };
        out.normalize();
        out
    }
}

/// Right shift of the magnitude; a result of zero clears the sign.
impl Shr<usize> for &BigInt {
    type Output = BigInt;

    fn shr(self, shift: usize) -> BigInt {
        if shift == 0 || self.is_zero() {
            return self.clone();
        }
        let word_shift = shift / WORD_BITS;
        if word_shift >= self.words.len() {
            return BigInt::zero();
        }
        let bit_shift = shift % WORD_BITS;
        let len = self.words.len() - word_shift;
        let mut words = vec![0u64; len];
        if bit_shift == 0 {
            words.copy_from_slice(&self.words[word_shift..]);
        } else {
            for i in 0..len {
                let word = self.words[i + word_shift];
                let next = self.words.get(i + word_shift + 1).copied().unwrap_or(0);
                words[i] = word >> bit_shift | next << (WORD_BITS - bit_shift);
            }
        }
        let mut out = BigInt { words, negative: self.negative };
        out.normalize();
        out
    }
}

macro_rules! forward_owned_binop {
    ($trait:ident, $method:ident) => {
        impl $trait for BigInt {
            type Output = BigInt;

            fn $method(self, rhs: BigInt) -> BigInt {
                (&self).$method(&rhs)
            }
        }
    };
}

forward_owned_binop!(Add, add);
forward_owned_binop!(Sub, sub);
forward_owned_binop!(Mul, mul);

impl Neg for BigInt {
    type Output = BigInt;

    fn neg(self) -> BigInt {
        -&self
    }
}

// ---------------------------------------------------------------------------
// Comparison, hashing, formatting
// ---------------------------------------------------------------------------

impl PartialEq for BigInt {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BigInt {}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, false) => mag_cmp(&self.words, &other.words),
            (true, true) => mag_cmp(&other.words, &self.words),
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
        }
    }
}

impl Hash for BigInt {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.negative.hash(state);
        self.words[..self.effective_len()].hash(state);
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        let ten = BigInt::from_u64(10);
        let mut digits = Vec::new();
        let mut value = self.abs();
        while !value.is_zero() {
            let (quotient, remainder) = value.div_rem(&ten).expect("ten is nonzero");
            digits.push(b'0' + remainder.words[0] as u8);
            value = quotient;
        }
        if self.negative {
            f.write_str("-")?;
        }
        digits.reverse();
        f.write_str(std::str::from_utf8(&digits).expect("decimal digits are ASCII"))
    }
}

impl fmt::Debug for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::UpperHex for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        let len = self.effective_len();
        write!(f, "{:X}", self.words[len - 1])?;
        for &word in self.words[..len - 1].iter().rev() {
            write!(f, "{word:016X}")?;
        }
        Ok(())
    }
}

impl fmt::LowerHex for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        let len = self.effective_len();
        write!(f, "{:x}", self.words[len - 1])?;
        for &word in self.words[..len - 1].iter().rev() {
            write!(f, "{word:016x}")?;
        }
        Ok(())
    }
}

impl Zeroize for BigInt {
    /// Overwrite every backing word with zero, then collapse to the
    /// canonical zero value.
    fn zeroize(&mut self) {
        for word in self.words.iter_mut() {
            *word = 0;
        }
        self.words.truncate(1);
        self.negative = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

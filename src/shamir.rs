//! Splitting a secret into N shares and reconstructing it from any K.
//!
//! Split evaluates a fresh random polynomial of degree K−1 at x = 1..N
//! over a Mersenne-prime field; the secret's field encoding is the
//! constant term. Reconstruction re-derives the prime from the largest
//! observed y-coordinate, then runs Lagrange interpolation at x = 0 using
//! extended-Euclid modular division.
//!
//! Supplying fewer shares than the original threshold yields a
//! mathematically valid but wrong secret — the scheme cannot detect
//! under-threshold reconstruction. That is a property callers must
//! understand, not an error path.

use rand_core::{CryptoRng, OsRng, RngCore};
use zeroize::Zeroizing;

use crate::calculator::Calculator;
use crate::error::Error;
use crate::euclid::div_mod;
use crate::secret::Secret;
use crate::security::SecurityLevel;
use crate::shares::{FinitePoint, ShareSet, DEFAULT_SEPARATOR};

/// Split/reconstruct engine, generic over the big-integer backend.
///
/// Each engine owns its own [`SecurityLevel`]; independent engines never
/// share a prime and may run on separate threads.
pub struct ShamirsSecretSharing<C: Calculator> {
    level: SecurityLevel<C>,
}

impl<C: Calculator> ShamirsSecretSharing<C> {
    /// Engine at the lowest supported security level. Splitting raises
    /// the level automatically when the secret needs more bits.
    pub fn new() -> Self {
        ShamirsSecretSharing { level: SecurityLevel::lowest() }
    }

    /// Engine at an explicit security level.
    pub fn with_security_level(bits: u32) -> Result<Self, Error> {
        Ok(ShamirsSecretSharing { level: SecurityLevel::new(bits)? })
    }

    /// The current level in bits (always a Mersenne exponent).
    pub fn security_level(&self) -> u32 {
        self.level.bits()
    }

    /// Change the level; non-table values round up to the next exponent.
    pub fn set_security_level(&mut self, bits: u32) -> Result<(), Error> {
        self.level.set(bits)
    }

    /// The working prime `2^p − 1`.
    pub fn prime(&self) -> &C {
        self.level.prime()
    }

    /// Split `secret` into `shares` points, any `threshold` of which
    /// reconstruct it.
    ///
    /// The level is raised first when the secret's byte length demands
    /// more bits than currently configured, so the field encoding always
    /// sits strictly below the prime.
    pub fn split(
        &mut self,
        threshold: u8,
        shares: u8,
        secret: &Secret,
    ) -> Result<ShareSet<C>, Error> {
        self.split_with_rng(threshold, shares, secret, &mut OsRng)
    }

    /// [`ShamirsSecretSharing::split`] with an explicit RNG.
    pub fn split_with_rng<R: RngCore + CryptoRng>(
        &mut self,
        threshold: u8,
        shares: u8,
        secret: &Secret,
        rng: &mut R,
    ) -> Result<ShareSet<C>, Error> {
        if threshold < 2 {
            return Err(Error::ThresholdTooSmall(threshold));
        }
        if threshold > shares {
            return Err(Error::ThresholdExceedsShares { threshold, shares });
        }

        let required_bits = (secret.encoded_len() * 8) as u32;
        if required_bits > self.level.bits() {
            self.level.set(required_bits)?;
        }
        let prime = self.level.prime().clone();
        let exponent = self.level.bits();

        let polynomial = Polynomial::random(secret.to_field(), threshold, &prime, exponent, rng);
        let mut set = ShareSet::with_secret(secret.clone());
        for x in 1..=shares {
            let x_value = C::from_u64(x as u64);
            let y = polynomial.evaluate(&x_value, &prime)?;
            set.insert(FinitePoint::new(x_value, y));
        }
        Ok(set)
    }

    /// Split a freshly generated random secret.
    pub fn split_random(&mut self, threshold: u8, shares: u8) -> Result<ShareSet<C>, Error> {
        let secret = Secret::random(self.level.prime())?;
        self.split(threshold, shares, &secret)
    }

    /// Reconstruct from a share set.
    pub fn reconstruct(&mut self, shares: &ShareSet<C>) -> Result<Secret, Error> {
        self.reconstruct_points(shares.points())
    }

    /// Reconstruct from the wire text form (default separator).
    pub fn reconstruct_text(&mut self, wire: &str) -> Result<Secret, Error> {
        self.reconstruct_text_with(wire, DEFAULT_SEPARATOR)
    }

    /// Reconstruct from the wire text form with an explicit separator.
    pub fn reconstruct_text_with(
        &mut self,
        wire: &str,
        separator: char,
    ) -> Result<Secret, Error> {
        let set = ShareSet::parse_wire(wire, separator)?;
        self.reconstruct(&set)
    }

    /// Reconstruct from individual wire lines (default separator).
    pub fn reconstruct_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<Secret, Error> {
        let mut set = ShareSet::new();
        for line in lines {
            let point = FinitePoint::parse_wire(line.as_ref(), DEFAULT_SEPARATOR)?;
            if !set.insert(point) {
                return Err(Error::DuplicateShares);
            }
        }
        self.reconstruct(&set)
    }

    /// Lagrange interpolation at x = 0.
    ///
    /// The prime is re-derived from the largest observed y-coordinate —
    /// the shares themselves are the only evidence of the prime used for
    /// splitting.
    pub fn reconstruct_points(&mut self, points: &[FinitePoint<C>]) -> Result<Secret, Error> {
        if points.len() < 2 {
            return Err(Error::TooFewShares(points.len()));
        }
        for i in 0..points.len() {
            for j in i + 1..points.len() {
                if points[i] == points[j] {
                    return Err(Error::DuplicateShares);
                }
            }
        }

        let max_y = points
            .iter()
            .map(|p| p.y())
            .max()
            .expect("point list is non-empty");
        self.level.adjust_to_fit(max_y)?;
        let prime = self.level.prime().clone();

        // Per-point numerator Π(0 − x_j) and denominator Π(x_i − x_j).
        let zero = C::zero();
        let count = points.len();
        let mut numerators = Vec::with_capacity(count);
        let mut denominators = Vec::with_capacity(count);
        for i in 0..count {
            let mut numerator = C::one();
            let mut denominator = C::one();
            for j in 0..count {
                if i == j {
                    continue;
                }
                numerator = numerator.mul(&zero.sub(points[j].x()));
                denominator = denominator.mul(&points[i].x().sub(points[j].x()));
            }
            numerators.push(numerator);
            denominators.push(denominator);
        }

        let mut common_denominator = C::one();
        for denominator in &denominators {
            common_denominator = common_denominator.mul(denominator);
        }

        // Σ numerator_i · common · y_i / denominator_i, all divisions via
        // the extended-Euclid modular inverse.
        let mut total = C::zero();
        for i in 0..count {
            let y = normalize(points[i].y(), &prime)?;
            let numerator = numerators[i].mul(&common_denominator).mul(&y);
            total = total.add(&div_mod(&numerator, &denominators[i], &prime)?);
        }
        let result = div_mod(&total, &common_denominator, &prime)?;
        let result = normalize(&normalize(&result, &prime)?, &prime)?;
        Ok(Secret::from_field(&result))
    }
}

impl<C: Calculator> Default for ShamirsSecretSharing<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduce into [0, prime), mapping negative residues up.
fn normalize<C: Calculator>(value: &C, prime: &C) -> Result<C, Error> {
    value.rem(prime)?.add(prime).rem(prime)
}

/// A fresh secret polynomial: coefficient 0 is the secret's field
/// encoding, coefficients 1..K−1 are uniform over [0, prime).
///
/// Generated per split and wiped on drop — it must never be persisted.
struct Polynomial<C: Calculator> {
    coefficients: Vec<C>,
}

impl<C: Calculator> Polynomial<C> {
    fn random<R: RngCore + CryptoRng>(
        constant: C,
        threshold: u8,
        prime: &C,
        exponent: u32,
        rng: &mut R,
    ) -> Self {
        let mut coefficients = Vec::with_capacity(threshold as usize);
        coefficients.push(constant);
        for _ in 1..threshold {
            coefficients.push(random_field_element(prime, exponent, rng));
        }
        Polynomial { coefficients }
    }

    /// Horner's rule mod prime.
    fn evaluate(&self, x: &C, prime: &C) -> Result<C, Error> {
        let mut acc = C::zero();
        for coefficient in self.coefficients.iter().rev() {
            acc = acc.mul(x).add(coefficient).rem(prime)?;
        }
        Ok(acc)
    }
}

impl<C: Calculator> Drop for Polynomial<C> {
    fn drop(&mut self) {
        for coefficient in self.coefficients.iter_mut() {
            coefficient.zeroize();
        }
    }
}

/// A uniform element of [0, prime) for a Mersenne prime `2^p − 1`.
///
/// Draws `⌈p/8⌉` bytes, masks the bits above `p`, and rejects the single
/// leftover value equal to the prime — no modular-reduction bias.
fn random_field_element<C: Calculator, R: RngCore + CryptoRng>(
    prime: &C,
    exponent: u32,
    rng: &mut R,
) -> C {
    let len = (exponent as usize).div_ceil(8);
    let excess = len * 8 - exponent as usize;
    let mut buf = Zeroizing::new(vec![0u8; len]);
    loop {
        rng.fill_bytes(&mut buf);
        buf[len - 1] &= 0xFFu8 >> excess;
        let candidate = C::from_le_bytes(&buf);
        if candidate != *prime {
            return candidate;
        }
    }
}

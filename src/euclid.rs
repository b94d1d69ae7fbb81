//! Extended Euclidean algorithm and modular division.
//!
//! Reconstruction divides inside the finite field, which means multiplying
//! by a modular inverse. The inverse comes from the Bézout coefficients of
//! `gcd(denominator, prime)`.

use crate::calculator::Calculator;
use crate::error::Error;

/// Result of the extended Euclidean algorithm:
/// `a·x + b·y = gcd(a, b)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedGcd<C> {
    pub gcd: C,
    pub x: C,
    pub y: C,
}

/// Iterative extended Euclid.
///
/// Rolls `(r, x, y)` forward from `(b, 0, 1)` against `(a, 1, 0)` until the
/// remainder reaches zero. The remainder magnitudes strictly decrease, so
/// the loop terminates.
pub fn extended_gcd<C: Calculator>(a: &C, b: &C) -> Result<ExtendedGcd<C>, Error> {
    let mut r = b.clone();
    let mut old_r = a.clone();
    let mut x = C::zero();
    let mut old_x = C::one();
    let mut y = C::one();
    let mut old_y = C::zero();

    while !r.is_zero() {
        let quotient = old_r.div(&r)?;
        let next_r = old_r.sub(&quotient.mul(&r));
        old_r = std::mem::replace(&mut r, next_r);
        let next_x = old_x.sub(&quotient.mul(&x));
        old_x = std::mem::replace(&mut x, next_x);
        let next_y = old_y.sub(&quotient.mul(&y));
        old_y = std::mem::replace(&mut y, next_y);
    }

    Ok(ExtendedGcd {
        gcd: old_r,
        x: old_x,
        y: old_y,
    })
}

/// Modular division: `numerator / denominator (mod modulus)`.
///
/// Multiplies the numerator by the denominator's Bézout coefficient and by
/// the gcd, which folds a gcd of −1 back into +1. The result is congruent
/// to the quotient but not reduced; callers normalize into the field.
///
/// The denominator and modulus must be coprime. With a prime modulus and a
/// reduced denominator this always holds, but the invariant is verified
/// rather than trusted: a shared factor fails with [`Error::NotCoprime`]
/// instead of producing a silently wrong answer.
pub fn div_mod<C: Calculator>(numerator: &C, denominator: &C, modulus: &C) -> Result<C, Error> {
    if denominator.is_zero() {
        return Err(Error::DivisionByZero);
    }
    let bezout = extended_gcd(denominator, modulus)?;
    if !bezout.gcd.abs().is_one() {
        return Err(Error::NotCoprime);
    }
    Ok(numerator.mul(&bezout.x).mul(&bezout.gcd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigint::BigInt;

    fn n(v: i64) -> BigInt {
        BigInt::from_i64(v)
    }

    #[test]
    fn bezout_identity_holds() {
        let cases = [
            (240i64, 46i64),
            (46, 240),
            (17, 5),
            (-35, 15),
            (35, -15),
            (0, 9),
            (9, 0),
            (1, 1),
        ];
        for (a, b) in cases {
            let (a, b) = (n(a), n(b));
            let eg = extended_gcd(&a, &b).unwrap();
            let lhs = (&a * &eg.x) + (&b * &eg.y);
            assert_eq!(lhs, eg.gcd, "a={a} b={b}");
        }
    }

    #[test]
    fn gcd_of_classic_pair() {
        let eg = extended_gcd(&n(240), &n(46)).unwrap();
        assert_eq!(eg.gcd.abs(), n(2));
    }

    #[test]
    fn modular_division_identity() {
        // d × (n / d mod p) ≡ n (mod p) for a prime p.
        let p = n(2147483647); // 2^31 − 1
        for (num, den) in [(1234567i64, 89i64), (1, 2), (999_999, 999_998), (0, 5)] {
            let (num, den) = (n(num), n(den));
            let q = div_mod(&num, &den, &p).unwrap();
            let lhs = (&den * &q).rem(&p).unwrap();
            let lhs = (&lhs + &p).rem(&p).unwrap();
            let rhs = num.rem(&p).unwrap();
            let rhs = (&rhs + &p).rem(&p).unwrap();
            assert_eq!(lhs, rhs);
        }
    }

    #[test]
    fn modular_division_with_negative_denominator() {
        let p = n(8191); // 2^13 − 1
        let q = div_mod(&n(77), &n(-3), &p).unwrap();
        let lhs = (&(&n(-3) * &q).rem(&p).unwrap() + &p).rem(&p).unwrap();
        assert_eq!(lhs, n(77));
    }

    #[test]
    fn zero_denominator_rejected() {
        assert!(matches!(
            div_mod(&n(1), &n(0), &n(7)),
            Err(Error::DivisionByZero)
        ));
    }

    #[test]
    fn shared_factor_rejected() {
        // gcd(6, 9) = 3: no inverse exists.
        assert!(matches!(
            div_mod(&n(1), &n(6), &n(9)),
            Err(Error::NotCoprime)
        ));
    }
}

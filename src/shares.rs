//! Share points and the share container.
//!
//! ## Wire format
//!
//! One point per line, `<HEX(x)><sep><HEX(y)>`, uppercase hex with no `0x`
//! prefix; a share set is its lines joined by newline:
//!
//! ```text
//! 1-1A2B3C
//! 2-99FF00
//! 3-0ABC12
//! ```
//!
//! The coordinate separator is a parameter (default `-`). Parsing splits
//! each line on the first occurrence of the separator, so x and y decode
//! independently.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::calculator::Calculator;
use crate::error::Error;
use crate::secret::Secret;

/// Default coordinate separator for the wire format.
pub const DEFAULT_SEPARATOR: char = '-';

/// One share: an immutable point (x, y) on the secret polynomial, where x
/// is the 1-based share index and y the polynomial's value mod the prime.
#[derive(Clone, Debug)]
pub struct FinitePoint<C> {
    x: C,
    y: C,
}

impl<C: Calculator> FinitePoint<C> {
    pub fn new(x: C, y: C) -> Self {
        FinitePoint { x, y }
    }

    pub fn x(&self) -> &C {
        &self.x
    }

    pub fn y(&self) -> &C {
        &self.y
    }

    /// Euclidean magnitude `⌊√(x² + y²)⌋` — the ordering key.
    pub fn magnitude(&self) -> C {
        self.x
            .mul(&self.x)
            .add(&self.y.mul(&self.y))
            .sqrt()
            .expect("sum of squares is non-negative")
    }

    /// Render as `<HEX(x)><sep><HEX(y)>`.
    pub fn to_wire(&self, separator: char) -> String {
        format!("{:X}{}{:X}", self.x, separator, self.y)
    }

    /// Parse one wire line, splitting on the first separator occurrence.
    pub fn parse_wire(line: &str, separator: char) -> Result<Self, Error> {
        let trimmed = line.trim();
        let (x, y) = trimmed
            .split_once(separator)
            .ok_or_else(|| Error::MalformedShare(trimmed.to_string()))?;
        Ok(FinitePoint {
            x: C::from_hex(x)?,
            y: C::from_hex(y)?,
        })
    }
}

impl<C: Calculator> PartialEq for FinitePoint<C> {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl<C: Calculator> Eq for FinitePoint<C> {}

impl<C: Calculator> PartialOrd for FinitePoint<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Calculator> Ord for FinitePoint<C> {
    /// Orders by Euclidean magnitude, not lexicographic x. The coordinate
    /// pair breaks magnitude ties so the order stays total and agrees
    /// with equality.
    fn cmp(&self, other: &Self) -> Ordering {
        self.magnitude()
            .cmp(&other.magnitude())
            .then_with(|| self.x.cmp(&other.x))
            .then_with(|| self.y.cmp(&other.y))
    }
}

impl<C: Calculator> fmt::Display for FinitePoint<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}{}{:X}", self.x, DEFAULT_SEPARATOR, self.y)
    }
}

/// An ordered, deduplicating collection of points, plus the original
/// secret when the set came from a split.
#[derive(Clone, Debug)]
pub struct ShareSet<C: Calculator> {
    points: Vec<FinitePoint<C>>,
    secret: Option<Secret>,
}

impl<C: Calculator> ShareSet<C> {
    pub fn new() -> Self {
        ShareSet { points: Vec::new(), secret: None }
    }

    pub(crate) fn with_secret(secret: Secret) -> Self {
        ShareSet { points: Vec::new(), secret: Some(secret) }
    }

    /// Insert a point at its ordered position. Returns `false` (and leaves
    /// the set untouched) when an exact duplicate is already present.
    pub fn insert(&mut self, point: FinitePoint<C>) -> bool {
        match self.points.binary_search(&point) {
            Ok(_) => false,
            Err(position) => {
                self.points.insert(position, point);
                true
            }
        }
    }

    pub fn points(&self) -> &[FinitePoint<C>] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FinitePoint<C>> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The original secret, present only on sets produced by a split.
    pub fn secret(&self) -> Option<&Secret> {
        self.secret.as_ref()
    }

    /// One wire line per point, joined by newline.
    pub fn to_wire(&self, separator: char) -> String {
        self.points
            .iter()
            .map(|p| p.to_wire(separator))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Inverse of [`ShareSet::to_wire`]. Blank lines are skipped; a
    /// duplicated point is an error.
    pub fn parse_wire(text: &str, separator: char) -> Result<Self, Error> {
        let mut set = ShareSet::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let point = FinitePoint::parse_wire(line, separator)?;
            if !set.insert(point) {
                return Err(Error::DuplicateShares);
            }
        }
        Ok(set)
    }
}

impl<C: Calculator> Default for ShareSet<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Calculator> fmt::Display for ShareSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire(DEFAULT_SEPARATOR))
    }
}

impl<C: Calculator> FromStr for ShareSet<C> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Self::parse_wire(s, DEFAULT_SEPARATOR)
    }
}

impl<'a, C: Calculator> IntoIterator for &'a ShareSet<C> {
    type Item = &'a FinitePoint<C>;
    type IntoIter = std::slice::Iter<'a, FinitePoint<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigint::BigInt;

    fn point(x: u64, y: u64) -> FinitePoint<BigInt> {
        FinitePoint::new(BigInt::from_u64(x), BigInt::from_u64(y))
    }

    #[test]
    fn equality_is_over_the_coordinate_pair() {
        assert_eq!(point(1, 2), point(1, 2));
        assert_ne!(point(1, 2), point(1, 3));
        assert_ne!(point(1, 2), point(2, 2));
    }

    #[test]
    fn ordering_uses_euclidean_magnitude() {
        assert_eq!(point(3, 4).magnitude(), BigInt::from_u64(5));
        assert!(point(3, 4) < point(6, 8));
        // (5, 12) has magnitude 13, (10, 1) has magnitude 10: the smaller
        // magnitude wins even though its x is larger.
        assert!(point(10, 1) < point(5, 12));
    }

    #[test]
    fn magnitude_ties_break_on_coordinates() {
        assert!(point(0, 5) < point(3, 4));
        assert!(point(3, 4) < point(4, 3));
    }

    #[test]
    fn wire_line_roundtrip() {
        let p = point(2, 0xAB_CDEF);
        assert_eq!(p.to_wire('-'), "2-ABCDEF");
        let parsed = FinitePoint::<BigInt>::parse_wire("2-ABCDEF", '-').unwrap();
        assert_eq!(parsed, p);
    }

    #[test]
    fn wire_line_splits_on_first_separator() {
        let parsed = FinitePoint::<BigInt>::parse_wire("A-B", '-').unwrap();
        assert_eq!(parsed, point(10, 11));
    }

    #[test]
    fn wire_line_custom_separator() {
        let p = point(7, 0x1FFF);
        assert_eq!(p.to_wire(':'), "7:1FFF");
        let parsed = FinitePoint::<BigInt>::parse_wire("7:1FFF", ':').unwrap();
        assert_eq!(parsed, p);
    }

    #[test]
    fn malformed_lines_rejected() {
        assert!(matches!(
            FinitePoint::<BigInt>::parse_wire("ABCDEF", '-'),
            Err(Error::MalformedShare(_))
        ));
        assert!(matches!(
            FinitePoint::<BigInt>::parse_wire("1-XYZ", '-'),
            Err(Error::InvalidHex(_))
        ));
        assert!(matches!(
            FinitePoint::<BigInt>::parse_wire("-1A", '-'),
            Err(Error::InvalidHex(_))
        ));
    }

    #[test]
    fn insert_keeps_order_and_rejects_duplicates() {
        let mut set = ShareSet::new();
        assert!(set.insert(point(6, 8)));
        assert!(set.insert(point(3, 4)));
        assert!(set.insert(point(1, 1)));
        assert!(!set.insert(point(3, 4)));
        assert_eq!(set.len(), 3);

        let magnitudes: Vec<BigInt> = set.iter().map(|p| p.magnitude()).collect();
        let mut sorted = magnitudes.clone();
        sorted.sort();
        assert_eq!(magnitudes, sorted);
    }

    #[test]
    fn set_wire_roundtrip() {
        let mut set = ShareSet::new();
        set.insert(point(1, 0x1A2B));
        set.insert(point(2, 0x99FF));
        set.insert(point(3, 0x0ABC));

        let wire = set.to_wire('-');
        let parsed = ShareSet::<BigInt>::parse_wire(&wire, '-').unwrap();
        assert_eq!(parsed.points(), set.points());

        // FromStr / Display agree with the default separator.
        let display: ShareSet<BigInt> = set.to_string().parse().unwrap();
        assert_eq!(display.points(), set.points());
    }

    #[test]
    fn parse_skips_blank_lines() {
        let parsed =
            ShareSet::<BigInt>::parse_wire("1-2\n\n  \n2-3\n", '-').unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn parse_rejects_duplicate_points() {
        assert!(matches!(
            ShareSet::<BigInt>::parse_wire("1-2\n1-2", '-'),
            Err(Error::DuplicateShares)
        ));
    }

    #[test]
    fn parsed_sets_carry_no_secret() {
        let parsed = ShareSet::<BigInt>::parse_wire("1-2\n2-3", '-').unwrap();
        assert!(parsed.secret().is_none());
    }
}

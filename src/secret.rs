//! Secret codec: reversible encoding of byte payloads into field elements.
//!
//! A secret's field encoding is the payload followed by one random nonzero
//! "mark byte". Read as little-endian two's-complement, the mark keeps the
//! value positive and marks where the payload's trailing zeros end, so
//! decoding strips exactly one byte and recovers the payload bit-for-bit.
//! The mark itself carries no information.
//!
//! All conversions are explicit named functions — construction provenance
//! stays visible at every call site.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use rand_core::{CryptoRng, OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::calculator::Calculator;
use crate::error::Error;

/// Inclusive upper bound for mark bytes of multi-byte payloads.
const MARK_MAX: u8 = 0x7F;

/// Inclusive upper bound for the mark byte of a single-byte payload.
const MARK_MAX_SHORT: u8 = 0x1F;

/// Mark byte restored when decoding the base64 form, which does not carry
/// the original mark. Valid for payloads of any length.
const BASE64_MARK: u8 = 0x1F;

/// Text encodings for [`Secret::from_text_with`] and
/// [`Secret::to_text_with`].
///
/// An explicit parameter, not ambient state: callers that need the legacy
/// raw-byte behavior say so where they decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-16LE code units (the default).
    Utf16,
    /// Raw UTF-8 bytes (legacy mode).
    Raw,
}

/// A secret payload together with its trailing mark byte.
///
/// The backing buffer is wiped on drop. Equality compares payloads only
/// (marks are random noise) and is constant-time.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret {
    /// payload ‖ mark
    bytes: Vec<u8>,
}

impl Secret {
    /// Encode a byte payload, appending a fresh random mark byte.
    pub fn from_bytes(payload: &[u8]) -> Result<Self, Error> {
        Self::from_bytes_with_rng(payload, &mut OsRng)
    }

    /// [`Secret::from_bytes`] with an explicit RNG (useful for
    /// deterministic tests).
    pub fn from_bytes_with_rng<R: RngCore + CryptoRng>(
        payload: &[u8],
        rng: &mut R,
    ) -> Result<Self, Error> {
        if payload.is_empty() {
            return Err(Error::EmptySecret);
        }
        let cap = if payload.len() == 1 { MARK_MAX_SHORT } else { MARK_MAX };
        let mut bytes = Vec::with_capacity(payload.len() + 1);
        bytes.extend_from_slice(payload);
        bytes.push(random_mark(rng, cap));
        Ok(Secret { bytes })
    }

    /// Decode: the payload with exactly one mark byte stripped.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.payload().to_vec()
    }

    /// Encode a string as UTF-16LE.
    pub fn from_text(text: &str) -> Result<Self, Error> {
        Self::from_text_with(text, TextEncoding::Utf16)
    }

    /// Encode a string in the given encoding.
    pub fn from_text_with(text: &str, encoding: TextEncoding) -> Result<Self, Error> {
        let payload: Zeroizing<Vec<u8>> = match encoding {
            TextEncoding::Utf16 => Zeroizing::new(
                text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            ),
            TextEncoding::Raw => Zeroizing::new(text.as_bytes().to_vec()),
        };
        Self::from_bytes(&payload)
    }

    /// Decode the payload as UTF-16LE text.
    pub fn to_text(&self) -> Result<String, Error> {
        self.to_text_with(TextEncoding::Utf16)
    }

    /// Decode the payload as text in the given encoding.
    pub fn to_text_with(&self, encoding: TextEncoding) -> Result<String, Error> {
        let payload = self.payload();
        match encoding {
            TextEncoding::Utf16 => {
                if payload.len() % 2 != 0 {
                    return Err(Error::InvalidText);
                }
                let units: Vec<u16> = payload
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16(&units).map_err(|_| Error::InvalidText)
            }
            TextEncoding::Raw => {
                String::from_utf8(payload.to_vec()).map_err(|_| Error::InvalidText)
            }
        }
    }

    /// Wrap a reconstructed field element. The element's serialization is
    /// already payload ‖ mark.
    pub fn from_field<C: Calculator>(value: &C) -> Self {
        Secret { bytes: value.to_le_bytes() }
    }

    /// The field encoding of this secret (the polynomial's constant term).
    pub fn to_field<C: Calculator>(&self) -> C {
        C::from_le_bytes(&self.bytes)
    }

    /// Compact external form: base64 of the payload, mark byte stripped.
    pub fn to_base64(&self) -> String {
        B64.encode(self.payload())
    }

    /// Inverse of [`Secret::to_base64`]. The mark byte is restored in a
    /// fixed slot since the encoding does not carry it.
    pub fn from_base64(encoded: &str) -> Result<Self, Error> {
        let mut bytes = B64.decode(encoded.trim())?;
        if bytes.is_empty() {
            return Err(Error::EmptySecret);
        }
        bytes.push(BASE64_MARK);
        Ok(Secret { bytes })
    }

    /// Generate a random secret uniformly below `prime`.
    pub fn random<C: Calculator>(prime: &C) -> Result<Self, Error> {
        Self::random_with_rng(prime, &mut OsRng)
    }

    /// [`Secret::random`] with an explicit RNG.
    ///
    /// Draws `prime.byte_count()` random bytes, then walks in from the
    /// end, forcing the current trailing byte into the mark range, until
    /// the value reduced mod `prime` equals itself unreduced — i.e. it is
    /// already canonical. This sidesteps the bias a plain modular
    /// reduction of a uniform buffer would introduce.
    pub fn random_with_rng<C: Calculator, R: RngCore + CryptoRng>(
        prime: &C,
        rng: &mut R,
    ) -> Result<Self, Error> {
        let len = prime.byte_count();
        let mut bytes = Zeroizing::new(vec![0u8; len]);
        rng.fill_bytes(&mut bytes);
        let mut end = len;
        loop {
            let cap = if end == 1 { MARK_MAX_SHORT } else { MARK_MAX };
            bytes[end - 1] = random_mark(rng, cap);
            let candidate = C::from_le_bytes(&bytes[..end]);
            if candidate.is_zero() {
                return Ok(Secret {
                    bytes: vec![random_mark(rng, MARK_MAX_SHORT)],
                });
            }
            if candidate.rem(prime)? == candidate {
                return Ok(Secret { bytes: bytes[..end].to_vec() });
            }
            bytes[end - 1] = 0;
            end -= 1;
        }
    }

    /// Payload length in bytes (the mark byte is not counted).
    pub fn len(&self) -> usize {
        self.bytes.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of the field encoding, mark byte included.
    pub(crate) fn encoded_len(&self) -> usize {
        self.bytes.len()
    }

    fn payload(&self) -> &[u8] {
        &self.bytes[..self.bytes.len().saturating_sub(1)]
    }
}

impl PartialEq for Secret {
    /// Constant-time payload comparison; every byte of both payloads is
    /// examined regardless of early mismatches.
    fn eq(&self, other: &Self) -> bool {
        let a = self.payload();
        let b = other.payload();
        let len = a.len().max(b.len());
        let mut diff = (a.len() ^ b.len()) as u64;
        for i in 0..len {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            diff |= (x ^ y) as u64;
        }
        diff == 0
    }
}

impl Eq for Secret {}

impl std::fmt::Debug for Secret {
    /// Redacted — secrets must not leak through debug logging.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret({} bytes)", self.len())
    }
}

/// A random byte in `(0, cap]` where `cap` is a bit mask (0x7F or 0x1F).
fn random_mark<R: RngCore + CryptoRng>(rng: &mut R, cap: u8) -> u8 {
    loop {
        let byte = rng.next_u32() as u8 & cap;
        if byte != 0 {
            return byte;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigint::BigInt;
    use crate::security::SecurityLevel;

    #[test]
    fn byte_roundtrip_is_exact() {
        for payload in [
            vec![0x42],
            vec![0x00],
            vec![0xFF, 0xFF, 0xFF],
            vec![1, 2, 0, 0],
            b"Hello World!!".to_vec(),
        ] {
            let secret = Secret::from_bytes(&payload).unwrap();
            assert_eq!(secret.to_bytes(), payload);
        }
    }

    #[test]
    fn empty_payload_rejected() {
        assert!(matches!(Secret::from_bytes(&[]), Err(Error::EmptySecret)));
        assert!(matches!(Secret::from_text(""), Err(Error::EmptySecret)));
    }

    #[test]
    fn mark_byte_stays_in_range() {
        for _ in 0..50 {
            let secret = Secret::from_bytes(&[1, 2, 3]).unwrap();
            let mark = secret.bytes[secret.bytes.len() - 1];
            assert!(mark > 0 && mark <= MARK_MAX);
        }
        for _ in 0..50 {
            let secret = Secret::from_bytes(&[9]).unwrap();
            let mark = secret.bytes[secret.bytes.len() - 1];
            assert!(mark > 0 && mark <= MARK_MAX_SHORT);
        }
    }

    #[test]
    fn field_encoding_is_positive_and_roundtrips() {
        let secret = Secret::from_bytes(&[0xFF, 0x00, 0x00, 0x00]).unwrap();
        let value: BigInt = secret.to_field();
        assert_eq!(value.sign(), 1);
        let back = Secret::from_field(&value);
        assert_eq!(back.to_bytes(), vec![0xFF, 0x00, 0x00, 0x00]);
        assert_eq!(back, secret);
    }

    #[test]
    fn text_roundtrip_utf16() {
        for text in ["Hello World!!", "pässword", "秘密🔑"] {
            let secret = Secret::from_text(text).unwrap();
            assert_eq!(secret.to_text().unwrap(), text);
        }
    }

    #[test]
    fn text_roundtrip_raw_mode() {
        let secret = Secret::from_text_with("legacy", TextEncoding::Raw).unwrap();
        assert_eq!(secret.len(), 6);
        assert_eq!(
            secret.to_text_with(TextEncoding::Raw).unwrap(),
            "legacy"
        );
    }

    #[test]
    fn odd_payload_is_not_utf16() {
        let secret = Secret::from_bytes(&[1, 2, 3]).unwrap();
        assert!(matches!(secret.to_text(), Err(Error::InvalidText)));
    }

    #[test]
    fn base64_strips_and_restores_mark() {
        let secret = Secret::from_bytes(b"attack at dawn").unwrap();
        let encoded = secret.to_base64();
        let decoded = Secret::from_base64(&encoded).unwrap();
        assert_eq!(decoded.to_bytes(), b"attack at dawn");
        assert_eq!(decoded, secret);
        assert_eq!(decoded.bytes[decoded.bytes.len() - 1], BASE64_MARK);
    }

    #[test]
    fn base64_garbage_rejected() {
        assert!(matches!(
            Secret::from_base64("not base64 at all!"),
            Err(Error::InvalidBase64(_))
        ));
        assert!(matches!(Secret::from_base64(""), Err(Error::EmptySecret)));
    }

    #[test]
    fn random_secret_is_canonical_below_prime() {
        let level = SecurityLevel::<BigInt>::new(31).unwrap();
        for _ in 0..20 {
            let secret = Secret::random(level.prime()).unwrap();
            let value: BigInt = secret.to_field();
            assert_eq!(value.sign(), 1);
            assert!(value < *level.prime());
            assert_eq!(value.rem(level.prime()).unwrap(), value);
        }
    }

    #[test]
    fn equality_ignores_the_mark() {
        let a = Secret::from_bytes(&[1, 2, 3]).unwrap();
        let b = Secret::from_bytes(&[1, 2, 3]).unwrap();
        let c = Secret::from_bytes(&[1, 2, 4]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn zeroize_wipes_backing_bytes() {
        let mut secret = Secret::from_bytes(&[7, 7, 7]).unwrap();
        secret.zeroize();
        assert!(secret.bytes.is_empty());
    }

    #[test]
    fn debug_redacts_payload() {
        let secret = Secret::from_bytes(&[0xAA, 0xBB]).unwrap();
        let printed = format!("{secret:?}");
        assert!(!printed.to_lowercase().contains("aa"));
    }
}

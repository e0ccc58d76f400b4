//! Newtype primitives shared across the wire model (§4.1).

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The wire's declared upper bound on a `Lovelace` amount, `2^64 + 999`.
pub const LOVELACE_MAX: u128 = (u64::MAX as u128) + 1000;

/// A non-negative monetary amount, bounded per the wire contract at
/// `2^64 + 999` (§4.1). Represented as `u128` since `u64` alone cannot hold
/// the declared bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u128", into = "u128")]
pub struct Lovelace(u128);

impl Lovelace {
    pub fn new(value: u128) -> Result<Self, LovelaceOutOfRange> {
        if value < LOVELACE_MAX {
            Ok(Lovelace(value))
        } else {
            Err(LovelaceOutOfRange(value))
        }
    }

    pub fn get(self) -> u128 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("lovelace amount {0} exceeds the wire's declared bound of 2^64 + 999")]
pub struct LovelaceOutOfRange(u128);

impl TryFrom<u128> for Lovelace {
    type Error = LovelaceOutOfRange;
    fn try_from(value: u128) -> Result<Self, Self::Error> {
        Lovelace::new(value)
    }
}

impl From<Lovelace> for u128 {
    fn from(value: Lovelace) -> Self {
        value.0
    }
}

/// A signed delta on a `Lovelace` balance, bounded to a signed 64-bit range
/// per §4.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LovelaceDelta(pub i64);

/// An exact fraction `p/q` encoded on the wire as the string `"p/q"`.
/// Parsing rejects `q = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    pub numerator: i64,
    pub denominator: i64,
}

impl Ratio {
    pub fn new(numerator: i64, denominator: i64) -> Result<Self, RatioError> {
        if denominator == 0 {
            Err(RatioError::ZeroDenominator)
        } else {
            Ok(Ratio { numerator, denominator })
        }
    }
}

#[derive(Debug, Clone, Copy, thiserror::Error)]
pub enum RatioError {
    #[error("ratio denominator cannot be zero")]
    ZeroDenominator,
    #[error("malformed ratio string: {0:?}")]
    Malformed(&'static str),
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Ratio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let (p, q) = raw
            .split_once('/')
            .ok_or_else(|| D::Error::custom(RatioError::Malformed("expected \"p/q\"")))?;
        let numerator: i64 = p.parse().map_err(D::Error::custom)?;
        let denominator: i64 = q.parse().map_err(D::Error::custom)?;
        Ratio::new(numerator, denominator).map_err(D::Error::custom)
    }
}

/// A validated hex-encoded digest of a fixed byte length (28 or 32 bytes,
/// i.e. Blake2b-224 or Blake2b-256 outputs). Validated on decode; encoding
/// is the identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest<const N: usize>(String);

impl<const N: usize> Digest<N> {
    pub fn new(hex_str: impl Into<String>) -> Result<Self, DigestError> {
        let hex_str = hex_str.into();
        let bytes = hex::decode(&hex_str).map_err(|_| DigestError::NotHex)?;
        if bytes.len() != N {
            return Err(DigestError::WrongLength {
                expected: N,
                actual: bytes.len(),
            });
        }
        Ok(Digest(hex_str))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, thiserror::Error)]
pub enum DigestError {
    #[error("digest is not valid hex")]
    NotHex,
    #[error("digest has {actual} bytes, expected {expected}")]
    WrongLength { expected: usize, actual: usize },
}

impl<const N: usize> Serialize for Digest<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de, const N: usize> Deserialize<'de> for Digest<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Digest::new(raw).map_err(D::Error::custom)
    }
}

/// A Blake2b-224 digest (e.g. a header hash... no, 28 bytes is used for
/// pool IDs and script hashes in this schema).
pub type Digest28 = Digest<28>;
/// A Blake2b-256 digest (e.g. a transaction or block header hash).
pub type Digest32 = Digest<32>;

/// The `Null` sentinel encodes JSON `null` in positions where a variant is
/// structurally required but may be absent (e.g. `metadata: AuxiliaryData |
/// Null`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Null;

impl Serialize for Null {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_none()
    }
}

impl<'de> Deserialize<'de> for Null {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NullVisitor;
        impl<'de> serde::de::Visitor<'de> for NullVisitor {
            type Value = Null;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON null")
            }
            fn visit_unit<E: serde::de::Error>(self) -> Result<Null, E> {
                Ok(Null)
            }
            fn visit_none<E: serde::de::Error>(self) -> Result<Null, E> {
                Ok(Null)
            }
        }
        deserializer.deserialize_option(NullVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lovelace_rejects_out_of_range() {
        assert!(Lovelace::new(LOVELACE_MAX).is_err());
        assert!(Lovelace::new(LOVELACE_MAX - 1).is_ok());
    }

    #[test]
    fn ratio_round_trips() {
        let r: Ratio = serde_json::from_str("\"3/4\"").unwrap();
        assert_eq!(r, Ratio::new(3, 4).unwrap());
        assert_eq!(serde_json::to_string(&r).unwrap(), "\"3/4\"");
    }

    #[test]
    fn ratio_rejects_zero_denominator() {
        let result: Result<Ratio, _> = serde_json::from_str("\"1/0\"");
        assert!(result.is_err());
    }

    #[test]
    fn digest_validates_length() {
        let valid = "aa".repeat(32);
        assert!(Digest32::new(valid).is_ok());
        let too_short = "aa".repeat(28);
        assert!(Digest32::new(too_short).is_err());
    }

    #[test]
    fn null_decodes_from_json_null() {
        let n: Null = serde_json::from_str("null").unwrap();
        assert_eq!(n, Null);
    }
}

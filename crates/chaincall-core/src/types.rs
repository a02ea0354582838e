//! Primitive ledger values: addresses, hashes, integers and byte strings.
//!
//! Every scalar here knows how to render itself as a single 32-byte ABI word
//! and how to travel over JSON-RPC as a `0x`-prefixed hex string.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use num_bigint::{BigInt, BigUint, Sign};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AbiError, ParseError};

/// Size of one ABI word.
pub const WORD: usize = 32;

fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

/// Implements `Display`, `FromStr` and hex-string serde for a fixed-size
/// byte newtype.
macro_rules! fixed_hex {
    ($name:ident, $len:expr) => {
        impl $name {
            pub const LEN: usize = $len;

            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({self})", stringify!($name))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let s = String::deserialize(d)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

/// A 20-byte account or contract address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 20]);

fixed_hex!(Address, 20);

impl Address {
    /// The address left-padded with zeros into one ABI word.
    pub fn to_word(&self) -> [u8; WORD] {
        let mut word = [0u8; WORD];
        word[WORD - Self::LEN..].copy_from_slice(&self.0);
        word
    }
}

impl FromStr for Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = hex::decode(strip_hex_prefix(s).unwrap_or(s))?;
        let bytes: [u8; 20] = raw.as_slice().try_into().map_err(|_| ParseError::Length {
            expected: Self::LEN,
            got: raw.len(),
        })?;
        Ok(Self(bytes))
    }
}

/// A 32-byte value: transaction ids, block hashes, storage slots and words.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash([u8; 32]);

fixed_hex!(Hash, 32);

impl FromStr for Hash {
    type Err = ParseError;

    /// Values shorter than 32 bytes are left-padded, the way nodes sometimes
    /// abbreviate storage words.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = hex::decode(strip_hex_prefix(s).unwrap_or(s))?;
        if raw.len() > Self::LEN {
            return Err(ParseError::Length {
                expected: Self::LEN,
                got: raw.len(),
            });
        }
        let mut bytes = [0u8; 32];
        bytes[Self::LEN - raw.len()..].copy_from_slice(&raw);
        Ok(Self(bytes))
    }
}

/// An arbitrary-precision integer standing in for a 256-bit EVM word.
///
/// Values are not range-checked on construction; a magnitude wider than
/// 32 bytes is only rejected when it is ABI-encoded.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Int(BigInt);

impl Int {
    pub fn new(value: BigInt) -> Self {
        Self(value)
    }

    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }

    pub fn into_bigint(self) -> BigInt {
        self.0
    }

    /// The value as a `u64`, if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        u64::try_from(&self.0).ok()
    }

    /// Big-endian magnitude right-aligned in one ABI word. The sign is
    /// discarded.
    pub fn to_word(&self) -> Result<[u8; WORD], AbiError> {
        let magnitude = self.0.magnitude().to_bytes_be();
        if magnitude.len() > WORD {
            return Err(AbiError::EncodingOverflow {
                kind: "integer",
                len: magnitude.len(),
            });
        }
        let mut word = [0u8; WORD];
        word[WORD - magnitude.len()..].copy_from_slice(&magnitude);
        Ok(word)
    }
}

impl From<BigInt> for Int {
    fn from(value: BigInt) -> Self {
        Self(value)
    }
}

impl From<u64> for Int {
    fn from(value: u64) -> Self {
        Self(BigInt::from(value))
    }
}

impl From<i64> for Int {
    fn from(value: i64) -> Self {
        Self(BigInt::from(value))
    }
}

impl From<u128> for Int {
    fn from(value: u128) -> Self {
        Self(BigInt::from(value))
    }
}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Int({})", self.0)
    }
}

impl fmt::LowerHex for Int {
    /// Hex quantity notation: `0x0`, `0x3e8`, `-0x1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.sign() == Sign::Minus {
            f.write_str("-")?;
        }
        write!(f, "0x{:x}", self.0.magnitude())
    }
}

impl FromStr for Int {
    type Err = ParseError;

    /// Accepts decimal or `0x`-prefixed hexadecimal, optionally negative.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let magnitude = match strip_hex_prefix(body) {
            Some(digits) => BigUint::parse_bytes(digits.as_bytes(), 16),
            None => BigUint::parse_bytes(body.as_bytes(), 10),
        }
        .ok_or_else(|| ParseError::Integer(s.to_string()))?;
        let sign = if negative { Sign::Minus } else { Sign::Plus };
        Ok(Self(BigInt::from_biguint(sign, magnitude)))
    }
}

/// JSON-RPC quantities are unsigned; a negative value is a serialization
/// error rather than a `-0x..` string the node would reject.
impl Serialize for Int {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        if self.0.sign() == Sign::Minus {
            return Err(serde::ser::Error::custom(format!(
                "negative quantity {self} cannot be sent to a node"
            )));
        }
        s.collect_str(&format_args!("{self:x}"))
    }
}

impl<'de> Deserialize<'de> for Int {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        match Repr::deserialize(d)? {
            Repr::Text(s) => s.parse().map_err(serde::de::Error::custom),
            Repr::Unsigned(n) => Ok(Self::from(n)),
            Repr::Signed(n) => Ok(Self::from(n)),
        }
    }
}

/// An opaque byte string: call data, contract code, `bytes32` arguments.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Data(Vec<u8>);

impl Data {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// The bytes right-padded with zeros into one ABI word.
    pub fn to_word(&self) -> Result<[u8; WORD], AbiError> {
        if self.0.len() > WORD {
            return Err(AbiError::EncodingOverflow {
                kind: "data",
                len: self.0.len(),
            });
        }
        let mut word = [0u8; WORD];
        word[..self.0.len()].copy_from_slice(&self.0);
        Ok(word)
    }
}

impl Deref for Data {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Data {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Data {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl FromStr for Data {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(hex::decode(strip_hex_prefix(s).unwrap_or(s))?))
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Data({self})")
    }
}

impl Serialize for Data {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Data {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_parse_and_display() {
        let addr: Address = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".parse().unwrap();
        assert_eq!(addr.to_string(), "0xd8da6bf26964af9d7eed9e03e53415d37aa96045");
        let bare: Address = "d8da6bf26964af9d7eed9e03e53415d37aa96045".parse().unwrap();
        assert_eq!(addr, bare);
    }

    #[test]
    fn address_wrong_length_rejected() {
        let err = "0x1234".parse::<Address>().unwrap_err();
        assert_eq!(err, ParseError::Length { expected: 20, got: 2 });
    }

    #[test]
    fn address_word_is_left_padded() {
        let mut raw = [0u8; 20];
        raw[19] = 1;
        let word = Address::new(raw).to_word();
        assert_eq!(&word[..12], &[0u8; 12]);
        assert_eq!(word[31], 1);
    }

    #[test]
    fn hash_short_value_left_padded() {
        let h: Hash = "0x2a".parse().unwrap();
        assert_eq!(h.as_bytes()[31], 0x2a);
        assert!(h.as_bytes()[..31].iter().all(|b| *b == 0));
    }

    #[test]
    fn int_quantity_json() {
        assert_eq!(serde_json::to_string(&Int::from(0u64)).unwrap(), r#""0x0""#);
        assert_eq!(serde_json::to_string(&Int::from(1000u64)).unwrap(), r#""0x3e8""#);
        let back: Int = serde_json::from_str(r#""0x3e8""#).unwrap();
        assert_eq!(back, Int::from(1000u64));
        let num: Int = serde_json::from_str("21000").unwrap();
        assert_eq!(num.to_u64(), Some(21000));
    }

    #[test]
    fn int_parses_decimal_and_hex() {
        assert_eq!("1000".parse::<Int>().unwrap(), Int::from(1000u64));
        assert_eq!("0x10".parse::<Int>().unwrap(), Int::from(16u64));
        assert_eq!("-5".parse::<Int>().unwrap(), Int::from(-5i64));
        assert!("0x".parse::<Int>().is_err());
        assert!("ten".parse::<Int>().is_err());
    }

    #[test]
    fn negative_int_does_not_serialize() {
        assert_eq!(serde_json::to_string(&Int::from(0u64)).unwrap(), r#""0x0""#);
        let err = serde_json::to_string(&Int::from(-1i64)).unwrap_err();
        assert!(err.to_string().contains("negative"), "{err}");
        assert_eq!(format!("{:x}", Int::from(-1i64)), "-0x1");
    }

    #[test]
    fn int_word_right_aligned() {
        let word = Int::from(1000u64).to_word().unwrap();
        assert_eq!(&word[30..], &[0x03, 0xe8]);
        assert!(word[..30].iter().all(|b| *b == 0));
    }

    #[test]
    fn int_word_overflow() {
        let wide = Int::new(BigInt::from(1u8) << 256u32);
        assert_eq!(
            wide.to_word().unwrap_err(),
            AbiError::EncodingOverflow { kind: "integer", len: 33 }
        );
        let max = Int::new((BigInt::from(1u8) << 256u32) - BigInt::from(1u8));
        assert_eq!(max.to_word().unwrap(), [0xff; 32]);
    }

    #[test]
    fn data_word_right_padded() {
        let word = Data::from(&b"hi"[..]).to_word().unwrap();
        assert_eq!(&word[..2], b"hi");
        assert!(word[2..].iter().all(|b| *b == 0));
        assert!(Data::new(vec![0; 33]).to_word().is_err());
    }

    #[test]
    fn data_hex_json() {
        let d: Data = serde_json::from_str(r#""0x6080""#).unwrap();
        assert_eq!(&*d, &[0x60, 0x80]);
        assert_eq!(serde_json::to_string(&d).unwrap(), r#""0x6080""#);
    }
}

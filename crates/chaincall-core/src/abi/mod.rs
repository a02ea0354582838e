//! Contract ABI encoding.
//!
//! # Overview
//!
//! A contract call is `selector ++ head ++ tail`:
//!
//! - `selector` — first 4 bytes of `keccak256(signature)`
//! - `head` — one 32-byte word per argument, in declaration order; static
//!   arguments are inlined, dynamic arguments contribute an offset word
//! - `tail` — for each dynamic argument, an element-count word followed by
//!   the element words
//!
//! The set of encodable kinds is closed: see [`AbiValue`].

pub mod encoder;
pub mod typecheck;

pub use encoder::{encode, keccak256, selector};
pub use typecheck::typecheck;

use crate::error::AbiError;
use crate::types::{Address, Data, Int};

/// A value that can be passed as a contract call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Address(Address),
    Int(Int),
    /// At most 32 bytes; right-padded when encoded.
    Data(Data),
    AddressSlice(Vec<Address>),
    IntSlice(Vec<Int>),
}

impl AbiValue {
    /// Slices are dynamic ABI types and are encoded through an offset.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::AddressSlice(_) | Self::IntSlice(_))
    }

    /// Element count of a slice; `None` for scalars.
    pub fn slice_len(&self) -> Option<usize> {
        match self {
            Self::AddressSlice(v) => Some(v.len()),
            Self::IntSlice(v) => Some(v.len()),
            _ => None,
        }
    }

    /// Short name of the variant, used in type mismatch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Address(_) => "Address",
            Self::Int(_) => "Int",
            Self::Data(_) => "Data",
            Self::AddressSlice(_) => "AddressSlice",
            Self::IntSlice(_) => "IntSlice",
        }
    }

    /// Append this value's words to `out`.
    ///
    /// Scalars write one word. Slices write their elements back to back and
    /// no length prefix; the encoder emits the count word itself. Nothing is
    /// written if any element overflows.
    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), AbiError> {
        match self {
            Self::Address(a) => out.extend_from_slice(&a.to_word()),
            Self::Int(i) => out.extend_from_slice(&i.to_word()?),
            Self::Data(d) => out.extend_from_slice(&d.to_word()?),
            Self::AddressSlice(v) => {
                for a in v {
                    out.extend_from_slice(&a.to_word());
                }
            }
            Self::IntSlice(v) => {
                let words = v.iter().map(Int::to_word).collect::<Result<Vec<_>, _>>()?;
                for w in &words {
                    out.extend_from_slice(w);
                }
            }
        }
        Ok(())
    }
}

impl From<Address> for AbiValue {
    fn from(v: Address) -> Self {
        Self::Address(v)
    }
}

impl From<Int> for AbiValue {
    fn from(v: Int) -> Self {
        Self::Int(v)
    }
}

impl From<Data> for AbiValue {
    fn from(v: Data) -> Self {
        Self::Data(v)
    }
}

impl From<Vec<Address>> for AbiValue {
    fn from(v: Vec<Address>) -> Self {
        Self::AddressSlice(v)
    }
}

impl From<Vec<Int>> for AbiValue {
    fn from(v: Vec<Int>) -> Self {
        Self::IntSlice(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_are_dynamic() {
        assert!(AbiValue::AddressSlice(vec![]).is_dynamic());
        assert!(AbiValue::IntSlice(vec![Int::from(1u64)]).is_dynamic());
        assert!(!AbiValue::Int(Int::from(1u64)).is_dynamic());
        assert!(!AbiValue::Data(Data::default()).is_dynamic());
    }

    #[test]
    fn slice_encodes_elements_without_prefix() {
        let v = AbiValue::from(vec![Int::from(1u64), Int::from(2u64)]);
        let mut out = Vec::new();
        v.encode_into(&mut out).unwrap();
        assert_eq!(out.len(), 64);
        assert_eq!(out[31], 1);
        assert_eq!(out[63], 2);
        assert_eq!(v.slice_len(), Some(2));
    }

    #[test]
    fn overflowing_slice_writes_nothing() {
        let wide = Int::new(num_bigint::BigInt::from(1u8) << 300u32);
        let v = AbiValue::IntSlice(vec![Int::from(1u64), wide]);
        let mut out = vec![0xaa];
        assert!(v.encode_into(&mut out).is_err());
        assert_eq!(out, vec![0xaa]);
    }
}

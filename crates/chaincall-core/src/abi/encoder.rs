//! Selector computation and head/tail argument layout.

use tiny_keccak::{Hasher, Keccak};

use crate::abi::{typecheck, AbiValue};
use crate::error::AbiError;
use crate::types::WORD;

/// keccak256 of arbitrary bytes.
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(input);
    hasher.finalize(&mut output);
    output
}

/// The 4-byte function selector: the leading bytes of
/// `keccak256(signature)`, computed over the exact signature text.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

fn push_usize(out: &mut Vec<u8>, n: usize) {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&(n as u64).to_be_bytes());
    out.extend_from_slice(&word);
}

/// Encode a function call: selector followed by the ABI argument area.
///
/// `args` are typechecked against `signature` first. Dynamic arguments get
/// an offset word in the head, relative to the first byte after the
/// selector, and their count + elements in the tail.
///
/// ```
/// use chaincall_core::abi::{encode, AbiValue};
/// use chaincall_core::types::Int;
///
/// let calldata = encode("totalSupply()", &[]).unwrap();
/// assert_eq!(calldata, vec![0x18, 0x16, 0x0d, 0xdd]);
///
/// let calldata = encode("approve(address,uint256)", &[
///     AbiValue::Address("0x0000000000000000000000000000000000000001".parse().unwrap()),
///     AbiValue::Int(Int::from(10u64)),
/// ]).unwrap();
/// assert_eq!(calldata.len(), 4 + 2 * 32);
/// ```
pub fn encode(signature: &str, args: &[AbiValue]) -> Result<Vec<u8>, AbiError> {
    typecheck(signature, args)?;

    let mut head = Vec::with_capacity(4 + args.len() * WORD);
    head.extend_from_slice(&selector(signature));

    let mut tail = Vec::new();
    let mut offset = args.len() * WORD;
    for arg in args {
        match arg.slice_len() {
            Some(len) => {
                push_usize(&mut head, offset);
                push_usize(&mut tail, len);
                arg.encode_into(&mut tail)?;
                offset += WORD * (1 + len);
            }
            None => arg.encode_into(&mut head)?,
        }
    }

    head.extend_from_slice(&tail);
    Ok(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Address, Data, Int};

    fn word(n: u64) -> [u8; 32] {
        let mut w = [0u8; 32];
        w[24..].copy_from_slice(&n.to_be_bytes());
        w
    }

    fn address(last: u8) -> Address {
        let mut raw = [0u8; 20];
        raw[19] = last;
        Address::new(raw)
    }

    #[test]
    fn keccak_of_empty_input() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn well_known_selectors() {
        assert_eq!(hex::encode(selector("transfer(address,uint256)")), "a9059cbb");
        assert_eq!(hex::encode(selector("balanceOf(address)")), "70a08231");
        assert_eq!(hex::encode(selector("approve(address,uint256)")), "095ea7b3");
        assert_eq!(
            hex::encode(selector("transferFrom(address,address,uint256)")),
            "23b872dd"
        );
    }

    #[test]
    fn transfer_layout() {
        let out = encode(
            "transfer(address,uint256)",
            &[address(1).into(), Int::from(1000u64).into()],
        )
        .unwrap();
        assert_eq!(out.len(), 68);
        assert_eq!(&out[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(&out[4..36], &word(1));
        assert_eq!(&out[36..68], &word(1000));
    }

    #[test]
    fn static_then_dynamic_offset() {
        let out = encode(
            "f(uint256,address[])",
            &[
                Int::from(7u64).into(),
                vec![address(0xaa), address(0xbb)].into(),
            ],
        )
        .unwrap();
        let args = &out[4..];
        assert_eq!(args.len(), 5 * 32);
        assert_eq!(&args[..32], &word(7));
        assert_eq!(&args[32..64], &word(0x40));
        assert_eq!(&args[64..96], &word(2));
        assert_eq!(args[127], 0xaa);
        assert_eq!(args[159], 0xbb);
    }

    #[test]
    fn second_dynamic_offset_skips_first_tail() {
        let out = encode(
            "g(uint256[],address[],uint256)",
            &[
                vec![Int::from(1u64), Int::from(2u64), Int::from(3u64)].into(),
                vec![address(9)].into(),
                Int::from(5u64).into(),
            ],
        )
        .unwrap();
        let args = &out[4..];
        // head: 3 words; first tail: count + 3; second tail: count + 1.
        assert_eq!(&args[..32], &word(96));
        assert_eq!(&args[32..64], &word(96 + 4 * 32));
        assert_eq!(&args[64..96], &word(5));
        assert_eq!(&args[96..128], &word(3));
        assert_eq!(&args[224..256], &word(1));
        assert_eq!(args[287], 9);
        assert_eq!(args.len(), 288);
    }

    #[test]
    fn empty_slice_still_gets_count_word() {
        let out = encode("h(address[])", &[AbiValue::AddressSlice(vec![])]).unwrap();
        assert_eq!(&out[4..36], &word(32));
        assert_eq!(&out[36..68], &word(0));
        assert_eq!(out.len(), 68);
    }

    #[test]
    fn bytes32_data_right_padded() {
        let out = encode("set(bytes32)", &[Data::from(&b"abc"[..]).into()]).unwrap();
        assert_eq!(&out[4..7], b"abc");
        assert!(out[7..].iter().all(|b| *b == 0));
    }

    #[test]
    fn overflow_returns_no_bytes() {
        let wide = Int::new(num_bigint::BigInt::from(1u8) << 264u32);
        let err = encode("f(address,uint256)", &[address(1).into(), wide.into()]).unwrap_err();
        assert_eq!(err, AbiError::EncodingOverflow { kind: "integer", len: 34 });

        let err = encode("f(bytes32)", &[Data::new(vec![1; 33]).into()]).unwrap_err();
        assert_eq!(err, AbiError::EncodingOverflow { kind: "data", len: 33 });
    }

    #[test]
    fn encoding_is_deterministic() {
        let args: Vec<AbiValue> = vec![
            address(3).into(),
            vec![Int::from(10u64), Int::from(20u64)].into(),
        ];
        let a = encode("m(address,uint256[])", &args).unwrap();
        let b = encode("m(address,uint256[])", &args).unwrap();
        assert_eq!(a, b);
        assert_eq!((a.len() - 4) % 32, 0);
    }
}

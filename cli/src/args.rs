//! Command-line arguments parsed against a signature's declared types.

use anyhow::{bail, Context, Result};

use chaincall_core::abi::typecheck::parse_params;
use chaincall_core::{AbiError, AbiValue, Address, Data, Int};

/// Parse `raw` into ABI values, one per declared parameter of `signature`.
///
/// Slices are written as comma-separated lists; an empty string is an empty
/// slice. A `bytes32` argument is read as hex data when `0x`-prefixed and as
/// an integer otherwise.
pub fn parse_args(signature: &str, raw: &[String]) -> Result<Vec<AbiValue>> {
    let params = parse_params(signature)?;
    if params.len() != raw.len() {
        return Err(AbiError::ArityMismatch {
            declared: params.len(),
            given: raw.len(),
        }
        .into());
    }
    params
        .iter()
        .zip(raw)
        .enumerate()
        .map(|(i, (ty, arg))| {
            parse_one(ty, arg).with_context(|| format!("argument {i} ({ty}): {arg:?}"))
        })
        .collect()
}

fn parse_one(ty: &str, arg: &str) -> Result<AbiValue> {
    if let Some(elem) = ty.strip_suffix("[]") {
        let items: Vec<&str> = if arg.is_empty() {
            Vec::new()
        } else {
            arg.split(',').map(str::trim).collect()
        };
        return match elem {
            "address" => Ok(AbiValue::AddressSlice(
                items.iter().map(|s| s.parse::<Address>()).collect::<Result<_, _>>()?,
            )),
            e if is_integer_type(e) => Ok(AbiValue::IntSlice(
                items.iter().map(|s| s.parse::<Int>()).collect::<Result<_, _>>()?,
            )),
            _ => bail!("unsupported slice type {ty}"),
        };
    }

    match ty {
        "address" => Ok(AbiValue::Address(arg.parse()?)),
        "bytes32" if arg.starts_with("0x") || arg.starts_with("0X") => {
            Ok(AbiValue::Data(arg.parse::<Data>()?))
        }
        "bytes32" => Ok(AbiValue::Int(arg.parse()?)),
        t if is_integer_type(t) => Ok(AbiValue::Int(arg.parse()?)),
        _ => bail!("unsupported type {ty}"),
    }
}

fn is_integer_type(ty: &str) -> bool {
    let bits = ty
        .strip_prefix("uint")
        .or_else(|| ty.strip_prefix("int"));
    match bits {
        Some("") => true,
        Some(n) => n.parse::<u16>().is_ok_and(|n| n > 0 && n <= 256 && n % 8 == 0),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "0x00000000000000000000000000000000000a11ce";

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn scalar_types() {
        let args = parse_args("transfer(address,uint256)", &strings(&[ALICE, "1000"])).unwrap();
        assert_eq!(args[0], AbiValue::Address(ALICE.parse().unwrap()));
        assert_eq!(args[1], AbiValue::Int(Int::from(1000u64)));
    }

    #[test]
    fn bytes32_hex_or_integer() {
        let args = parse_args("f(bytes32,bytes32)", &strings(&["0xabcd", "7"])).unwrap();
        assert_eq!(args[0], AbiValue::Data(Data::new(vec![0xab, 0xcd])));
        assert_eq!(args[1], AbiValue::Int(Int::from(7u64)));
    }

    #[test]
    fn slices_are_comma_separated() {
        let args = parse_args(
            "f(address[],uint256[],uint256[])",
            &strings(&[format!("{ALICE},{ALICE}").as_str(), "1, 0x2,3", ""]),
        )
        .unwrap();
        assert_eq!(args[0].slice_len(), Some(2));
        assert_eq!(
            args[1],
            AbiValue::IntSlice(vec![Int::from(1u64), Int::from(2u64), Int::from(3u64)])
        );
        assert_eq!(args[2], AbiValue::IntSlice(Vec::new()));
    }

    #[test]
    fn arity_is_checked() {
        let err = parse_args("f(uint256)", &strings(&[])).unwrap_err();
        assert!(err.to_string().contains("mismatched"), "{err}");
    }

    #[test]
    fn bad_values_name_the_argument() {
        let err = parse_args("f(uint256,address)", &strings(&["1", "0x12"])).unwrap_err();
        assert!(err.to_string().contains("argument 1"), "{err}");
    }

    #[test]
    fn unsupported_types_are_rejected() {
        assert!(parse_args("f(string)", &strings(&["hi"])).is_err());
        assert!(parse_args("f(bool[])", &strings(&["true"])).is_err());
    }

    #[test]
    fn integer_type_names() {
        assert!(is_integer_type("uint"));
        assert!(is_integer_type("int128"));
        assert!(is_integer_type("uint8"));
        assert!(!is_integer_type("uint7"));
        assert!(!is_integer_type("uint512"));
        assert!(!is_integer_type("bytes32"));
    }
}

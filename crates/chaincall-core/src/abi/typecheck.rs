//! Signature validation against a concrete argument list.
//!
//! A signature has the form `name(type0,type1,...)`. Only the handful of
//! types the encoder understands are checked; any other type name is let
//! through unchecked.

use crate::abi::AbiValue;
use crate::error::AbiError;

/// Characters that may not appear anywhere in a signature.
const ILLEGAL: &[char] = &[
    ' ', '\t', '\n', '\u{8}', '-', '+', '/', '~', '!', '@', '#', '$', '%', '^', '&', '*', '=',
    '|', ';', ':', '"', '<', '>', '\\', '?',
];

fn malformed(signature: &str, reason: impl Into<String>) -> AbiError {
    AbiError::MalformedSignature {
        signature: signature.to_string(),
        reason: reason.into(),
    }
}

/// Split `name(a,b,c)` into its declared parameter types.
///
/// Empty parentheses declare no parameters; a list without commas declares
/// exactly one.
pub fn parse_params(signature: &str) -> Result<Vec<&str>, AbiError> {
    if let Some(c) = signature.chars().find(|c| ILLEGAL.contains(c)) {
        return Err(malformed(signature, format!("illegal character {c:?}")));
    }
    let lparen = signature
        .find('(')
        .ok_or_else(|| malformed(signature, "no left paren"))?;
    if signature.matches('(').count() != 1 {
        return Err(malformed(signature, "more than one left paren"));
    }
    match signature.find(')') {
        Some(rparen) if rparen == signature.len() - 1 => {}
        _ => return Err(malformed(signature, "bad right paren")),
    }

    let inner = &signature[lparen + 1..signature.len() - 1];
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    Ok(inner.split(',').collect())
}

/// Verify that `args` fit the parameter list declared by `signature`.
///
/// `address` needs an [`AbiValue::Address`]; `uint`, `uint256`, `int` and
/// `int256` need an [`AbiValue::Int`]; `bytes32` takes either a `Data` or an
/// `Int`. Any type ending in `[]` needs a slice, of any element type.
pub fn typecheck(signature: &str, args: &[AbiValue]) -> Result<(), AbiError> {
    let params = parse_params(signature)?;
    if params.len() != args.len() {
        return Err(AbiError::ArityMismatch {
            declared: params.len(),
            given: args.len(),
        });
    }

    for (position, (declared, arg)) in params.iter().zip(args).enumerate() {
        let ok = match *declared {
            "address" => matches!(arg, AbiValue::Address(_)),
            "uint" | "uint256" | "int" | "int256" => matches!(arg, AbiValue::Int(_)),
            "bytes32" => matches!(arg, AbiValue::Data(_) | AbiValue::Int(_)),
            ty if ty.ends_with("[]") => arg.is_dynamic(),
            _ => true,
        };
        if !ok {
            return Err(AbiError::TypeMismatch {
                position,
                declared: (*declared).to_string(),
                got: arg.kind(),
            });
        }
    }
    Ok(())
}

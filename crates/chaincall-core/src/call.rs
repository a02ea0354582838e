//! Call/transaction descriptor.

use serde::{Deserialize, Serialize};

use crate::abi::{self, AbiValue};
use crate::error::AbiError;
use crate::types::{Address, Data, Int};

/// A contract call or transaction as sent to `eth_call`, `eth_estimateGas`
/// and `eth_sendTransaction`.
///
/// Unset optional fields are left out of the JSON object entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallOpts {
    /// Sender address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// Contract address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Gas offered for the call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<Int>,
    /// Price offered per unit of gas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<Int>,
    /// Value to transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Int>,
    /// Input to the call.
    #[serde(default)]
    pub data: Data,
}

impl CallOpts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    pub fn to(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }

    pub fn gas(mut self, gas: impl Into<Int>) -> Self {
        self.gas = Some(gas.into());
        self
    }

    pub fn gas_price(mut self, price: impl Into<Int>) -> Self {
        self.gas_price = Some(price.into());
        self
    }

    pub fn value(mut self, value: impl Into<Int>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn data(mut self, data: impl Into<Data>) -> Self {
        self.data = data.into();
        self
    }

    /// Set `data` to the ABI encoding of `signature` applied to `args`.
    ///
    /// On error `data` is left as it was. The target address is not checked
    /// against the function; addressing the right contract is up to the
    /// caller.
    pub fn encode_call(&mut self, signature: &str, args: &[AbiValue]) -> Result<(), AbiError> {
        self.data = Data::new(abi::encode(signature, args)?);
        Ok(())
    }

    /// Builder form of [`encode_call`](Self::encode_call).
    pub fn with_call(mut self, signature: &str, args: &[AbiValue]) -> Result<Self, AbiError> {
        self.encode_call(signature, args)?;
        Ok(self)
    }
}

//! Block specifiers and block/transaction result types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::BlockSpecError;
use crate::types::{Address, Data, Hash, Int};

/// A point in the chain's history, as accepted by block-parameterised
/// RPC methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockSpec {
    Number(u64),
    /// The most recent mined block.
    Latest,
    /// The pending state, including not-yet-mined transactions.
    Pending,
}

impl BlockSpec {
    /// `earliest` is the genesis block.
    pub const EARLIEST: Self = Self::Number(0);

    /// The JSON-RPC block parameter: a hex quantity, or the `"latest"` /
    /// `"pending"` literal.
    pub fn to_param(&self) -> String {
        match self {
            Self::Number(n) => format!("0x{n:x}"),
            Self::Latest => "latest".into(),
            Self::Pending => "pending".into(),
        }
    }
}

impl From<u64> for BlockSpec {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl fmt::Display for BlockSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Latest => f.write_str("latest"),
            Self::Pending => f.write_str("pending"),
        }
    }
}

impl FromStr for BlockSpec {
    type Err = BlockSpecError;

    /// Resolves `earliest`, `latest`, `pending`, decimal numbers and
    /// `0x`-prefixed hex numbers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "earliest" => return Ok(Self::EARLIEST),
            "latest" => return Ok(Self::Latest),
            "pending" => return Ok(Self::Pending),
            _ => {}
        }
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(digits) => u64::from_str_radix(digits, 16),
            None => s.parse::<u64>(),
        };
        parsed.map(Self::Number).map_err(|e| BlockSpecError::Malformed {
            token: s.to_string(),
            reason: e.to_string(),
        })
    }
}

impl Serialize for BlockSpec {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_param())
    }
}

/// A transaction as embedded in a block with full transaction objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: Hash,
    pub nonce: Int,
    pub block_hash: Option<Hash>,
    pub block_number: Option<Int>,
    pub transaction_index: Option<Int>,
    pub from: Address,
    /// `None` for contract creation.
    pub to: Option<Address>,
    pub value: Int,
    #[serde(default)]
    pub gas_price: Option<Int>,
    pub gas: Int,
    pub input: Data,
}

/// Entries of a block's `transactions` list: hashes only, or full objects
/// when requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockTransaction {
    Hash(Hash),
    Full(Box<Transaction>),
}

/// A block as returned by `eth_getBlockByNumber`.
///
/// Fields that are `null` for the pending block are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub number: Option<Int>,
    pub hash: Option<Hash>,
    pub parent_hash: Hash,
    #[serde(default)]
    pub nonce: Option<Data>,
    pub sha3_uncles: Hash,
    #[serde(default)]
    pub logs_bloom: Option<Data>,
    pub transactions_root: Hash,
    pub state_root: Hash,
    #[serde(default)]
    pub receipts_root: Option<Hash>,
    #[serde(default)]
    pub miner: Option<Address>,
    pub difficulty: Int,
    #[serde(default)]
    pub total_difficulty: Option<Int>,
    pub extra_data: Data,
    #[serde(default)]
    pub size: Option<Int>,
    pub gas_limit: Int,
    pub gas_used: Int,
    pub timestamp: Int,
    #[serde(default)]
    pub base_fee_per_gas: Option<Int>,
    #[serde(default)]
    pub transactions: Vec<BlockTransaction>,
    #[serde(default)]
    pub uncles: Vec<Hash>,
}

//! # Domain Entities
//!
//! Blocks and messages as handed to callers after collection.

use std::fmt;

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::value_objects::{serialize_u256_decimal, Decimal};

/// Content identifier of a tipset, as reported by the node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeadReference(String);

impl HeadReference {
    /// Wrap a content identifier.
    pub fn new(cid: impl Into<String>) -> Self {
        Self(cid.into())
    }

    /// The identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for log lines.
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(12)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for HeadReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for HeadReference {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for HeadReference {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Message parameters after decoding.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Params {
    /// Output of the decoder registered for the message's method.
    Decoded(Value),
    /// Encoded payload, kept as-is because no decoder is registered.
    Raw(String),
}

impl Params {
    /// The raw payload, if this was not decoded.
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Params::Raw(raw) => Some(raw),
            Params::Decoded(_) => None,
        }
    }

    /// The decoded value, if a decoder ran.
    pub fn as_decoded(&self) -> Option<&Value> {
        match self {
            Params::Decoded(value) => Some(value),
            Params::Raw(_) => None,
        }
    }
}

/// A message included in a tipset.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Height of the containing tipset.
    pub height: u64,
    /// Containing tipset.
    pub tipset_hash: HeadReference,
    /// Position within the tipset's message list.
    pub index: usize,
    /// Price per unit of gas.
    pub gas_price: Decimal,
    /// Gas limit.
    pub gas_limit: Decimal,
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Transferred amount; absent when the node omits it.
    pub value: Option<Decimal>,
    /// Method name or number, as reported.
    pub method: String,
    /// Parameters; absent when the message carries none.
    pub params: Option<Params>,
    /// Sender nonce.
    pub nonce: u64,
}

/// A tipset with its messages.
///
/// Immutable once built by inflation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Identifier this block was fetched under.
    pub tipset_hash: HeadReference,
    /// Chain height.
    pub height: u64,
    /// Parent tipsets, in the order the node lists them.
    pub parents: Vec<HeadReference>,
    /// Miner address.
    pub miner: String,
    /// Accumulated chain weight of the parents.
    #[serde(serialize_with = "serialize_u256_decimal")]
    pub parent_weight: U256,
    /// Messages, ordered by index.
    pub messages: Vec<Message>,
}

impl Block {
    /// Number of messages in this block.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

//! # Node Wire Format
//!
//! Raw JSON shapes returned by the node's `chain/head` and `show/block`
//! endpoints. Numeric fields arrive either as strings or as numbers and are
//! kept textual until inflation.

use std::borrow::Cow;

use serde::Deserialize;
use serde_json::Number;

/// Link object: `{"/": "<cid>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CidLink {
    /// Linked content identifier.
    #[serde(rename = "/")]
    pub cid: String,
}

/// A numeric field that may be sent as a string or a JSON number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    /// `"123"`
    Text(String),
    /// `123`
    Number(Number),
}

impl NumericField {
    /// Textual form of the number.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            NumericField::Text(s) => Cow::Borrowed(s.as_str()),
            NumericField::Number(n) => Cow::Owned(n.to_string()),
        }
    }
}

impl From<u64> for NumericField {
    fn from(n: u64) -> Self {
        NumericField::Number(n.into())
    }
}

impl From<&str> for NumericField {
    fn from(s: &str) -> Self {
        NumericField::Text(s.to_string())
    }
}

/// Body of `show/block/{cid}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBlock {
    /// Tipset header.
    #[serde(rename = "Header")]
    pub header: RawHeader,
    /// Included messages; `null` or absent means none.
    #[serde(rename = "Messages", default)]
    pub messages: Option<Vec<RawMessageEnvelope>>,
}

/// Tipset header fields.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHeader {
    /// Chain height. Required; checked during inflation.
    #[serde(default)]
    pub height: Option<NumericField>,
    /// Parent links.
    #[serde(default)]
    pub parents: Option<Vec<CidLink>>,
    /// Miner address.
    #[serde(default)]
    pub miner: Option<String>,
    /// Parent chain weight.
    #[serde(rename = "parentWeight", default)]
    pub parent_weight: Option<NumericField>,
}

/// One entry of `Messages`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMessageEnvelope {
    /// Message with its gas metering.
    #[serde(rename = "meteredMessage")]
    pub metered_message: RawMeteredMessage,
}

/// Message plus gas fields.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMeteredMessage {
    /// Gas price.
    #[serde(rename = "gasPrice")]
    pub gas_price: NumericField,
    /// Gas limit.
    #[serde(rename = "gasLimit")]
    pub gas_limit: NumericField,
    /// The message body.
    pub message: RawMessage,
}

/// Message body.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMessage {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Transferred amount.
    #[serde(default)]
    pub value: Option<NumericField>,
    /// Method name or number.
    #[serde(default)]
    pub method: Option<NumericField>,
    /// Encoded parameters.
    #[serde(default)]
    pub params: Option<String>,
    /// Sender nonce.
    pub nonce: NumericField,
}

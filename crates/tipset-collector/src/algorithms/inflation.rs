//! # Block Inflation
//!
//! Turns a raw `show/block` document into a [`Block`] with typed
//! [`Message`]s, decoding parameters through the injected [`DecoderTable`].

use primitive_types::U256;

use crate::domain::wire::{NumericField, RawBlock, RawMessageEnvelope};
use crate::domain::{Block, CollectorError, Decimal, HeadReference, Message, Params};
use crate::ports::DecoderTable;

/// Build a [`Block`] from the node's raw document for `tipset_hash`.
pub fn inflate_block(
    tipset_hash: HeadReference,
    raw: RawBlock,
    decoders: &DecoderTable,
) -> Result<Block, CollectorError> {
    let header = raw.header;

    let height = match &header.height {
        Some(field) => parse_u64(field, "height", &tipset_hash)?,
        None => return Err(CollectorError::decode_in(&tipset_hash, "missing height")),
    };

    let parent_weight = match &header.parent_weight {
        Some(field) => parse_u256(field, "parentWeight", &tipset_hash)?,
        None => U256::zero(),
    };

    let parents = header
        .parents
        .unwrap_or_default()
        .into_iter()
        .map(|link| HeadReference::new(link.cid))
        .collect();

    let messages = raw
        .messages
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, envelope)| inflate_message(envelope, index, height, &tipset_hash, decoders))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Block {
        tipset_hash,
        height,
        parents,
        miner: header.miner.unwrap_or_default(),
        parent_weight,
        messages,
    })
}

fn inflate_message(
    envelope: RawMessageEnvelope,
    index: usize,
    height: u64,
    tipset_hash: &HeadReference,
    decoders: &DecoderTable,
) -> Result<Message, CollectorError> {
    let metered = envelope.metered_message;
    let inner = metered.message;

    let method = inner
        .method
        .as_ref()
        .map(|m| m.as_text().into_owned())
        .unwrap_or_default();
    let value = inner
        .value
        .as_ref()
        .filter(|v| !v.as_text().trim().is_empty())
        .map(|v| parse_decimal(v, "value", tipset_hash))
        .transpose()?;
    let params = decode_params(&method, inner.params.as_deref(), decoders);

    Ok(Message {
        height,
        tipset_hash: tipset_hash.clone(),
        index,
        gas_price: parse_decimal(&metered.gas_price, "gasPrice", tipset_hash)?,
        gas_limit: parse_decimal(&metered.gas_limit, "gasLimit", tipset_hash)?,
        from: inner.from,
        to: inner.to,
        value,
        method,
        params,
        nonce: parse_u64(&inner.nonce, "nonce", tipset_hash)?,
    })
}

/// Decode a parameter payload.
///
/// Absent or empty payloads yield `None`. Without a registered decoder the
/// payload is kept raw.
pub fn decode_params(method: &str, payload: Option<&str>, decoders: &DecoderTable) -> Option<Params> {
    let payload = payload.filter(|p| !p.is_empty())?;
    Some(match decoders.decode(method, payload) {
        Some(value) => Params::Decoded(value),
        None => Params::Raw(payload.to_string()),
    })
}

fn parse_u64(field: &NumericField, name: &str, tipset_hash: &HeadReference) -> Result<u64, CollectorError> {
    let text = field.as_text();
    text.trim()
        .parse::<u64>()
        .map_err(|_| CollectorError::decode_in(tipset_hash, format!("{} is not an integer: {:?}", name, text)))
}

fn parse_u256(field: &NumericField, name: &str, tipset_hash: &HeadReference) -> Result<U256, CollectorError> {
    let text = field.as_text();
    U256::from_dec_str(text.trim())
        .map_err(|_| CollectorError::decode_in(tipset_hash, format!("{} is not an integer: {:?}", name, text)))
}

fn parse_decimal(
    field: &NumericField,
    name: &str,
    tipset_hash: &HeadReference,
) -> Result<Decimal, CollectorError> {
    field
        .as_text()
        .parse::<Decimal>()
        .map_err(|e| CollectorError::decode_in(tipset_hash, format!("{}: {}", name, e)))
}

//! # Response Body Framing
//!
//! Splits a response body into JSON documents. Handles newline-delimited
//! JSON as well as a single document spread over several lines, in
//! whatever chunk sizes the connection delivers.

use std::io;

use bytes::{Buf, BytesMut};
use serde_json::Value;
use thiserror::Error;
use tokio_util::codec::Decoder;

use crate::error::ClientError;

/// Framing errors.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Reading the body failed.
    #[error("body read failed: {0}")]
    Io(#[from] io::Error),

    /// The body is not valid JSON.
    #[error("invalid JSON document: {0}")]
    Json(serde_json::Error),

    /// One document grew past the configured limit.
    #[error("JSON document exceeds {limit} bytes")]
    TooLarge {
        /// Configured frame limit
        limit: usize,
    },

    /// The body ended in the middle of a document.
    #[error("body ended inside a JSON document ({pending} bytes pending)")]
    Truncated {
        /// Bytes left undecoded at end of body
        pending: usize,
    },
}

impl From<FrameError> for ClientError {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::Io(io) => ClientError::Transport(io.to_string()),
            other => ClientError::Decode(other.to_string()),
        }
    }
}

/// Codec yielding one [`Value`] per JSON document in the body.
#[derive(Debug, Clone)]
pub struct JsonFrameDecoder {
    max_frame_bytes: usize,
}

impl JsonFrameDecoder {
    /// Create a decoder that rejects documents above `max_frame_bytes`.
    pub fn new(max_frame_bytes: usize) -> Self {
        Self { max_frame_bytes }
    }

    fn decode_frame(&self, src: &mut BytesMut, eof: bool) -> Result<Option<Value>, FrameError> {
        skip_whitespace(src);
        if src.is_empty() {
            return Ok(None);
        }

        let mut documents = serde_json::Deserializer::from_slice(&src[..]).into_iter::<Value>();
        match documents.next() {
            Some(Ok(value)) => {
                let consumed = documents.byte_offset();
                // A scalar ending exactly at the buffer edge may continue in
                // the next chunk, so wait for a delimiter unless the body is done.
                if consumed == src.len() && !eof {
                    return self.check_pending(src);
                }
                src.advance(consumed);
                Ok(Some(value))
            }
            Some(Err(e)) if e.is_eof() => self.check_pending(src),
            Some(Err(e)) => Err(FrameError::Json(e)),
            None => Ok(None),
        }
    }

    fn check_pending(&self, src: &BytesMut) -> Result<Option<Value>, FrameError> {
        if src.len() > self.max_frame_bytes {
            return Err(FrameError::TooLarge {
                limit: self.max_frame_bytes,
            });
        }
        Ok(None)
    }
}

impl Decoder for JsonFrameDecoder {
    type Item = Value;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Value>, FrameError> {
        self.decode_frame(src, false)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Value>, FrameError> {
        if let Some(value) = self.decode_frame(src, true)? {
            return Ok(Some(value));
        }
        skip_whitespace(src);
        if src.is_empty() {
            Ok(None)
        } else {
            Err(FrameError::Truncated { pending: src.len() })
        }
    }
}

fn skip_whitespace(src: &mut BytesMut) {
    let leading = src
        .iter()
        .take_while(|b| matches!(b, b' ' | b'\n' | b'\r' | b'\t'))
        .count();
    src.advance(leading);
}

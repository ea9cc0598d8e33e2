//! # Parameter Decoders
//!
//! Lookup table from method name to a function turning the encoded
//! parameter payload into structured JSON.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Decoder for one method's parameters.
pub type ParamDecoder = Arc<dyn Fn(&str) -> Value + Send + Sync>;

/// Method name to decoder mapping.
#[derive(Clone, Default)]
pub struct DecoderTable {
    decoders: HashMap<String, ParamDecoder>,
}

impl DecoderTable {
    /// Empty table; every payload stays raw.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`DecoderTable::register`].
    pub fn with<F>(mut self, method: impl Into<String>, decoder: F) -> Self
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        self.register(method, decoder);
        self
    }

    /// Register a decoder, replacing any previous one for `method`.
    pub fn register<F>(&mut self, method: impl Into<String>, decoder: F)
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        self.decoders.insert(method.into(), Arc::new(decoder));
    }

    /// Decoder registered for `method`.
    pub fn get(&self, method: &str) -> Option<&ParamDecoder> {
        self.decoders.get(method)
    }

    /// Run the decoder for `method`, if any.
    pub fn decode(&self, method: &str, payload: &str) -> Option<Value> {
        self.get(method).map(|decoder| decoder(payload))
    }

    /// Number of registered decoders.
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// True when no decoder is registered.
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl fmt::Debug for DecoderTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&String> = self.decoders.keys().collect();
        methods.sort();
        f.debug_struct("DecoderTable").field("methods", &methods).finish()
    }
}

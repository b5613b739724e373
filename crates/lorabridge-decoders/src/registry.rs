//! Built-in decoder lookup.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

use crate::result::DecodeResult;
use crate::value_sensor::{decoder_value_sensor, DECODER_VALUE_SENSOR};

/// A built-in decoder: `(dev_eui, payload, fport) -> result`.
pub type DecoderFn = fn(&str, &[u8], u8) -> DecodeResult;

static BUILTIN: Lazy<Arc<DecoderRegistry>> =
    Lazy::new(|| Arc::new(DecoderRegistry::builder().with_builtins().build()));

#[derive(Clone)]
struct Entry {
    name: String,
    decoder: DecoderFn,
}

/// Immutable table of decoders, keyed case-insensitively by name.
#[derive(Clone, Default)]
pub struct DecoderRegistry {
    decoders: HashMap<String, Entry>,
}

impl DecoderRegistry {
    /// Shared registry holding the built-in decoders.
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    pub fn builder() -> DecoderRegistryBuilder {
        DecoderRegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<DecoderFn> {
        self.decoders.get(&name.to_lowercase()).map(|e| e.decoder)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.decoders.contains_key(&name.to_lowercase())
    }

    /// Registered names as given at registration, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.decoders.values().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl std::fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderRegistry")
            .field("decoders", &self.names())
            .finish()
    }
}

#[derive(Default)]
pub struct DecoderRegistryBuilder {
    decoders: HashMap<String, Entry>,
}

impl DecoderRegistryBuilder {
    pub fn with_builtins(self) -> Self {
        self.register(DECODER_VALUE_SENSOR, decoder_value_sensor)
    }

    /// Add a decoder. A later registration under the same name (ignoring
    /// case) replaces the earlier one.
    pub fn register(mut self, name: impl Into<String>, decoder: DecoderFn) -> Self {
        let name = name.into();
        self.decoders
            .insert(name.to_lowercase(), Entry { name, decoder });
        self
    }

    pub fn build(self) -> DecoderRegistry {
        DecoderRegistry {
            decoders: self.decoders,
        }
    }
}

//! Catalog of atomic fake-value providers.
//!
//! Each category module exposes plain typed functions (used directly by the
//! entity generators) and registers string-addressable entries used by the
//! custom schema generator.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use rand::RngCore;
use serde::Serialize;
use serde_json::Value;

use datasynth_core::GeneratedValue;

use crate::errors::GenerationError;
use crate::params::{ParamMap, ParamSpec, bind_args, render_signature};

pub mod composite;
pub mod contact;
pub mod financial;
pub mod geo;
pub mod identity;
pub mod network;
pub mod pattern;
pub mod temporal;
pub mod text;

/// Ambient inputs shared by every provider call.
#[derive(Debug, Clone, Copy)]
pub struct ProviderContext {
    /// Reference instant for relative windows such as "last 5 years".
    pub now: NaiveDateTime,
}

pub type ProviderFn =
    fn(&ProviderContext, &ParamMap, &mut dyn RngCore) -> Result<GeneratedValue, GenerationError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderCategory {
    Identity,
    Contact,
    Geo,
    Temporal,
    Financial,
    Network,
    Text,
    Composite,
    Pattern,
}

impl ProviderCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderCategory::Identity => "identity",
            ProviderCategory::Contact => "contact",
            ProviderCategory::Geo => "geo",
            ProviderCategory::Temporal => "temporal",
            ProviderCategory::Financial => "financial",
            ProviderCategory::Network => "network",
            ProviderCategory::Text => "text",
            ProviderCategory::Composite => "composite",
            ProviderCategory::Pattern => "pattern",
        }
    }
}

impl fmt::Display for ProviderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy)]
pub struct ProviderEntry {
    pub id: &'static str,
    pub category: ProviderCategory,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
    pub func: ProviderFn,
}

impl ProviderEntry {
    pub const fn new(
        id: &'static str,
        category: ProviderCategory,
        description: &'static str,
        func: ProviderFn,
    ) -> Self {
        Self {
            id,
            category,
            description,
            params: &[],
            func,
        }
    }

    pub const fn with_params(mut self, params: &'static [ParamSpec]) -> Self {
        self.params = params;
        self
    }

    pub fn signature(&self) -> String {
        format!("{}{}", self.id, render_signature(self.params))
    }

    /// Documented behavior, or the parameter list when undocumented.
    pub fn describe(&self) -> String {
        if self.description.is_empty() {
            format!("{} (undocumented)", self.signature())
        } else {
            self.description.to_string()
        }
    }
}

impl fmt::Debug for ProviderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderEntry")
            .field("id", &self.id)
            .field("category", &self.category)
            .finish()
    }
}

/// Selection guidance for one provider.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderInfo {
    pub id: &'static str,
    pub category: ProviderCategory,
    pub signature: String,
    pub description: String,
}

/// Explicit provider registry keyed by identifier.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: BTreeMap<&'static str, ProviderEntry>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRegistry {
    pub fn new() -> Self {
        let mut registry = Self::empty();
        identity::register(&mut registry);
        contact::register(&mut registry);
        geo::register(&mut registry);
        temporal::register(&mut registry);
        financial::register(&mut registry);
        network::register(&mut registry);
        text::register(&mut registry);
        composite::register(&mut registry);
        pattern::register(&mut registry);
        registry
    }

    pub fn empty() -> Self {
        Self {
            providers: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, entry: ProviderEntry) {
        self.providers.insert(entry.id, entry);
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.providers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<&ProviderEntry, GenerationError> {
        self.providers
            .get(id)
            .ok_or_else(|| GenerationError::UnknownProvider(id.to_string()))
    }

    pub fn describe(&self, id: &str) -> Result<String, GenerationError> {
        self.get(id).map(ProviderEntry::describe)
    }

    pub fn catalog(&self) -> Vec<ProviderInfo> {
        self.providers
            .values()
            .map(|entry| ProviderInfo {
                id: entry.id,
                category: entry.category,
                signature: entry.signature(),
                description: entry.describe(),
            })
            .collect()
    }

    /// Resolve and bind once; the returned handle can be invoked per row.
    pub fn prepare(
        &self,
        id: &str,
        positional: &[Value],
        keyword: &BTreeMap<String, Value>,
    ) -> Result<PreparedProvider, GenerationError> {
        let entry = *self.get(id)?;
        let params = bind_args(entry.id, entry.params, positional, keyword)?;
        Ok(PreparedProvider { entry, params })
    }

    pub fn invoke(
        &self,
        id: &str,
        positional: &[Value],
        keyword: &BTreeMap<String, Value>,
        ctx: &ProviderContext,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        self.prepare(id, positional, keyword)?.invoke(ctx, rng)
    }
}

/// A provider entry with its arguments already bound.
#[derive(Debug, Clone)]
pub struct PreparedProvider {
    entry: ProviderEntry,
    params: ParamMap,
}

impl PreparedProvider {
    pub fn id(&self) -> &'static str {
        self.entry.id
    }

    pub fn invoke(
        &self,
        ctx: &ProviderContext,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        (self.entry.func)(ctx, &self.params, rng)
    }
}

pub(crate) fn provider_error(provider: &str, message: impl Into<String>) -> GenerationError {
    GenerationError::Provider {
        provider: provider.to_string(),
        message: message.into(),
    }
}

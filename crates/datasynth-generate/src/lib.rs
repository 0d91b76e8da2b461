//! Synthetic record generation for datasynth.
//!
//! Built-in entity generators (customer, product, company, transaction) are
//! declared as ordered field descriptors with intra-row derivations; the custom
//! schema path maps arbitrary field names onto the provider catalog. Both run
//! from an explicitly seeded RNG so a fixed seed and base time reproduce a run.

pub mod custom;
pub mod engine;
pub mod entities;
pub mod errors;
pub mod fields;
pub mod model;
pub mod output;
pub mod params;
pub mod providers;
pub mod references;

pub use engine::{EntityRequest, GenerationEngine, GenerationResult};
pub use entities::{EntityGenerator, EntityKind};
pub use errors::GenerationError;
pub use model::{
    FieldSpec, GenerateOptions, GenerationIssue, GenerationReport, Probabilities, ReferenceUsage,
};
pub use providers::{ProviderCategory, ProviderInfo, ProviderRegistry};
pub use references::{InMemoryReferences, ReferenceResolver, ReferenceRole};

/// JSON Schema describing a custom schema field entry.
pub fn field_spec_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(FieldSpec)
}

use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use chrono::NaiveDateTime;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use datasynth_core::{RecordSet, Row};

use crate::custom;
use crate::entities::{EntityGenerator, EntityKind};
use crate::errors::GenerationError;
use crate::fields::{FieldContext, FieldDescriptor};
use crate::model::{FieldSpec, GenerateOptions, GenerationIssue, GenerationReport};
use crate::providers::{ProviderContext, ProviderRegistry};
use crate::references::{ReferencePool, ReferenceResolver};

/// Request for one built-in entity run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityRequest {
    pub count: u64,
    /// Inclusion set. Names the entity does not know are ignored.
    pub fields: Vec<String>,
    /// Role (`customers`, `products`, ...) to the table its keys are sampled from.
    #[serde(default)]
    pub references: BTreeMap<String, String>,
}

impl EntityRequest {
    pub fn new<I, S>(count: u64, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            count,
            fields: fields.into_iter().map(Into::into).collect(),
            references: BTreeMap::new(),
        }
    }

    pub fn with_reference(mut self, role: impl Into<String>, table: impl Into<String>) -> Self {
        self.references.insert(role.into(), table.into());
        self
    }
}

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub records: RecordSet,
    pub report: GenerationReport,
}

/// Entry point for entity and custom-schema generation.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
    registry: ProviderRegistry,
    base_time: NaiveDateTime,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self::with_registry(options, ProviderRegistry::new())
    }

    pub fn with_registry(options: GenerateOptions, registry: ProviderRegistry) -> Self {
        let base_time = options
            .base_time
            .unwrap_or_else(|| chrono::Utc::now().naive_utc());
        Self {
            options,
            registry,
            base_time,
        }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn base_time(&self) -> NaiveDateTime {
        self.base_time
    }

    /// Generate rows for a built-in entity kind.
    pub fn generate(
        &self,
        kind: EntityKind,
        request: &EntityRequest,
        resolver: Option<&dyn ReferenceResolver>,
    ) -> Result<GenerationResult, GenerationError> {
        let generator = kind.generator();
        self.generate_entity(generator.as_ref(), request, resolver)
    }

    pub fn generate_entity(
        &self,
        generator: &dyn EntityGenerator,
        request: &EntityRequest,
        resolver: Option<&dyn ReferenceResolver>,
    ) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let kind = generator.kind();
        validate_count(request.count)?;
        if request.fields.is_empty() {
            return Err(GenerationError::InvalidRequest(
                "select at least one field".to_string(),
            ));
        }

        let (included, ignored) = select_fields(generator.fields(), &request.fields);
        if included.is_empty() {
            return Err(GenerationError::InvalidRequest(format!(
                "none of the requested fields belong to entity '{kind}'"
            )));
        }

        let seed = self.run_seed();
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut report = GenerationReport::new(run_id.clone(), kind.as_str(), seed, request.count);
        report.ignored_fields = ignored;
        if !report.ignored_fields.is_empty() {
            debug!(
                entity = %kind,
                ignored = ?report.ignored_fields,
                "ignoring fields unknown to entity"
            );
        }
        for role in request.references.keys() {
            if !generator.reference_roles().iter().any(|known| known.role == role.as_str()) {
                report.record_warning(GenerationIssue {
                    level: "warning".to_string(),
                    code: "unknown_reference_role".to_string(),
                    message: format!("entity '{kind}' has no reference role '{role}'"),
                    field: None,
                    provider: None,
                    row: None,
                });
            }
        }

        info!(
            run_id = %run_id,
            entity = %kind,
            rows = request.count,
            fields = included.len(),
            seed,
            "generation started"
        );

        // Key lists are fetched once per run and dropped with the pool.
        let (pool, usage) =
            ReferencePool::load(generator.reference_roles(), &request.references, resolver);
        for (role, usage) in usage {
            report.record_reference(role, usage);
        }

        let probabilities = self.options.probabilities.clamped();
        let mut rng = ChaCha8Rng::seed_from_u64(hash_seed(seed, kind.as_str()));
        let mut records = RecordSet::new();

        for _ in 0..request.count {
            let mut row = Row::with_capacity(included.len());
            for field in &included {
                let value = {
                    let mut ctx = FieldContext {
                        row: &row,
                        rng: &mut rng,
                        now: self.base_time,
                        probabilities: &probabilities,
                        references: &pool,
                    };
                    field.evaluate(&mut ctx)
                };
                if value.is_fallback() {
                    report.record_fallback(field.name);
                }
                row.insert(field.name, value.into_value());
            }
            records.push(row);
        }

        report.rows_generated = records.len() as u64;
        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            run_id = %run_id,
            entity = %kind,
            rows_generated = report.rows_generated,
            fallbacks = report.fallback_count(),
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationResult { records, report })
    }

    /// Generate rows from a caller-defined schema.
    ///
    /// Input errors (zero count, empty or duplicate field names) fail fast.
    /// Provider failures never do: the cell becomes null and the report
    /// carries one issue per failing cell.
    pub fn generate_custom(
        &self,
        count: u64,
        specs: &[FieldSpec],
    ) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        validate_count(count)?;
        custom::validate_specs(specs)?;

        let seed = self.run_seed();
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut report = GenerationReport::new(run_id.clone(), "custom", seed, count);

        info!(
            run_id = %run_id,
            rows = count,
            fields = specs.len(),
            seed,
            "custom generation started"
        );

        let ctx = ProviderContext {
            now: self.base_time,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(hash_seed(seed, "custom"));
        let records =
            custom::generate_rows(&self.registry, specs, count, &ctx, &mut rng, &mut report);

        report.rows_generated = records.len() as u64;
        report.duration_ms = start.elapsed().as_millis() as u64;
        if report.failed_fields.is_empty() {
            info!(
                run_id = %run_id,
                rows_generated = report.rows_generated,
                duration_ms = report.duration_ms,
                "custom generation completed"
            );
        } else {
            warn!(
                run_id = %run_id,
                rows_generated = report.rows_generated,
                failed_fields = ?report.failed_fields,
                duration_ms = report.duration_ms,
                "custom generation completed with null-substituted fields"
            );
        }

        Ok(GenerationResult { records, report })
    }

    fn run_seed(&self) -> u64 {
        self.options.seed.unwrap_or_else(rand::random)
    }
}

fn validate_count(count: u64) -> Result<(), GenerationError> {
    if count == 0 {
        return Err(GenerationError::InvalidRequest(
            "record count must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Descriptors in catalog order that were requested, plus requested names the catalog lacks.
fn select_fields<'a>(
    catalog: &'a [FieldDescriptor],
    requested: &[String],
) -> (Vec<&'a FieldDescriptor>, Vec<String>) {
    let wanted: HashSet<&str> = requested.iter().map(String::as_str).collect();
    let included = catalog
        .iter()
        .filter(|field| wanted.contains(field.name))
        .collect();

    let mut ignored: Vec<String> = Vec::new();
    for name in requested {
        let known = catalog.iter().any(|field| field.name == name.as_str());
        if !known && !ignored.contains(name) {
            ignored.push(name.clone());
        }
    }
    (included, ignored)
}

fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_seed_separates_keys() {
        assert_ne!(hash_seed(7, "customer"), hash_seed(7, "product"));
        assert_eq!(hash_seed(7, "customer"), hash_seed(7, "customer"));
    }

    #[test]
    fn selection_keeps_catalog_order_and_reports_unknown_names() {
        let generator = EntityKind::Customer.generator();
        let requested = vec![
            "email".to_string(),
            "favourite_color".to_string(),
            "customer_id".to_string(),
            "favourite_color".to_string(),
        ];
        let (included, ignored) = select_fields(generator.fields(), &requested);
        let names: Vec<&str> = included.iter().map(|field| field.name).collect();
        assert_eq!(names, ["customer_id", "email"]);
        assert_eq!(ignored, ["favourite_color"]);
    }
}

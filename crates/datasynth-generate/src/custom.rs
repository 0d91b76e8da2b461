//! Custom schema generation: arbitrary field names mapped to catalog providers.

use std::collections::{BTreeSet, HashSet};

use rand::RngCore;
use tracing::{debug, warn};

use datasynth_core::{GeneratedValue, RecordSet, Row};

use crate::errors::GenerationError;
use crate::model::{FieldSpec, GenerationIssue, GenerationReport};
use crate::providers::{PreparedProvider, ProviderContext, ProviderRegistry};

/// Rejects schemas that cannot produce a record set.
pub fn validate_specs(specs: &[FieldSpec]) -> Result<(), GenerationError> {
    if specs.is_empty() {
        return Err(GenerationError::InvalidRequest(
            "custom schema has no fields".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for spec in specs {
        if spec.name.trim().is_empty() {
            return Err(GenerationError::InvalidRequest(
                "custom field names must not be empty".to_string(),
            ));
        }
        if !seen.insert(spec.name.as_str()) {
            return Err(GenerationError::InvalidRequest(format!(
                "duplicate custom field '{}'",
                spec.name
            )));
        }
    }
    Ok(())
}

/// One spec with its provider resolved and arguments bound, or the reason it could not be.
struct BoundField<'a> {
    spec: &'a FieldSpec,
    provider: Result<PreparedProvider, GenerationError>,
}

/// Generates `count` rows; provider failures become nulls plus report issues.
pub(crate) fn generate_rows(
    registry: &ProviderRegistry,
    specs: &[FieldSpec],
    count: u64,
    ctx: &ProviderContext,
    rng: &mut dyn RngCore,
    report: &mut GenerationReport,
) -> RecordSet {
    let fields: Vec<BoundField<'_>> = specs
        .iter()
        .map(|spec| BoundField {
            spec,
            provider: registry.prepare(&spec.provider, &spec.args, &spec.kwargs),
        })
        .collect();

    let mut records = RecordSet::new();
    let mut warned: BTreeSet<&str> = BTreeSet::new();

    for row_index in 0..count {
        let mut row = Row::with_capacity(fields.len());
        for field in &fields {
            let outcome = match &field.provider {
                Ok(provider) => provider.invoke(ctx, rng),
                Err(err) => Err(clone_error(err)),
            };
            let value = match outcome {
                Ok(value) => value,
                Err(err) => {
                    let issue = provider_issue(field.spec, &err, row_index);
                    if warned.insert(field.spec.name.as_str()) {
                        warn!(
                            code = %issue.code,
                            field = %field.spec.name,
                            provider = %field.spec.provider,
                            message = %issue.message,
                            "custom field failed; writing null"
                        );
                    } else {
                        debug!(
                            field = %field.spec.name,
                            row = row_index,
                            "custom field failed again"
                        );
                    }
                    report.record_field_failure(issue);
                    GeneratedValue::Null
                }
            };
            row.insert(field.spec.name.clone(), value);
        }
        records.push(row);
    }

    records
}

fn provider_issue(spec: &FieldSpec, err: &GenerationError, row: u64) -> GenerationIssue {
    GenerationIssue {
        level: "warning".to_string(),
        code: err.code().to_string(),
        message: err.to_string(),
        field: Some(spec.name.clone()),
        provider: Some(spec.provider.clone()),
        row: Some(row),
    }
}

/// Binding errors are replayed for every row; only the variants `prepare` can return matter.
fn clone_error(err: &GenerationError) -> GenerationError {
    match err {
        GenerationError::UnknownProvider(id) => GenerationError::UnknownProvider(id.clone()),
        GenerationError::InvalidArgs { provider, message } => GenerationError::InvalidArgs {
            provider: provider.clone(),
            message: message.clone(),
        },
        other => GenerationError::Provider {
            provider: String::new(),
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rejects_empty_and_duplicate_schemas() {
        assert!(validate_specs(&[]).is_err());
        let specs = vec![
            FieldSpec::new("name", "name"),
            FieldSpec::new("name", "first_name"),
        ];
        assert!(validate_specs(&specs).is_err());
        assert!(validate_specs(&[FieldSpec::new(" ", "name")]).is_err());
        let specs = vec![
            FieldSpec::new("code", "bothify").with_args(vec![json!("??##")]),
            FieldSpec::new("name", "name"),
        ];
        assert!(validate_specs(&specs).is_ok());
    }
}

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options for the generation engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Seed for the run. A random seed is drawn (and reported) when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Instant that relative windows ("last 5 years", "next 14 days") are measured from.
    /// Defaults to the wall clock when the engine is built.
    #[serde(default)]
    pub base_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub probabilities: Probabilities,
}

/// Probabilities of the optional, gated fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Probabilities {
    /// Company rows that get a parent company name.
    pub parent_company: f64,
    /// Transactions that carry a coupon code.
    pub coupon_code: f64,
    pub is_gift: f64,
    /// Chance of a gift message when `is_gift` was not requested.
    pub gift_message_without_flag: f64,
}

impl Default for Probabilities {
    fn default() -> Self {
        Self {
            parent_company: 0.3,
            coupon_code: 0.3,
            is_gift: 0.5,
            gift_message_without_flag: 0.0,
        }
    }
}

impl Probabilities {
    /// Out-of-range values are clamped into `[0, 1]`; NaN reads as 0.
    pub fn clamped(self) -> Self {
        let clamp = |value: f64| if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        Self {
            parent_company: clamp(self.parent_company),
            coupon_code: clamp(self.coupon_code),
            is_gift: clamp(self.is_gift),
            gift_message_without_flag: clamp(self.gift_message_without_flag),
        }
    }
}

/// One output column of a custom schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldSpec {
    /// Output field name, unique within one schema.
    pub name: String,
    /// Provider identifier from the catalog.
    pub provider: String,
    /// Positional arguments, bound in declared parameter order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,
    /// Keyword arguments, bound by parameter name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub kwargs: BTreeMap<String, Value>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider: provider.into(),
            args: Vec::new(),
            kwargs: BTreeMap::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    pub fn with_kwarg(mut self, key: impl Into<String>, value: Value) -> Self {
        self.kwargs.insert(key.into(), value);
        self
    }
}

/// Structured generation issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationIssue {
    pub level: String,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<u64>,
}

/// How a reference role was filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ReferenceUsage {
    /// Sampled from `keys` distinct values of `table`.
    Sampled { table: String, keys: usize },
    /// No usable reference data; identifiers were synthesized.
    Synthesized,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    /// Entity kind, or `custom`.
    pub mode: String,
    pub seed: u64,
    pub rows_requested: u64,
    pub rows_generated: u64,
    pub ignored_fields: Vec<String>,
    pub reference_usage: BTreeMap<String, ReferenceUsage>,
    /// Derived fields produced through their unconstrained fallback, per field.
    pub fallback_usage: BTreeMap<String, u64>,
    /// Provider failures per custom field.
    pub failed_fields: BTreeMap<String, u64>,
    pub warnings_by_code: BTreeMap<String, u64>,
    pub warnings: Vec<GenerationIssue>,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, mode: impl Into<String>, seed: u64, rows_requested: u64) -> Self {
        Self {
            run_id,
            mode: mode.into(),
            seed,
            rows_requested,
            rows_generated: 0,
            ignored_fields: Vec::new(),
            reference_usage: BTreeMap::new(),
            fallback_usage: BTreeMap::new(),
            failed_fields: BTreeMap::new(),
            warnings_by_code: BTreeMap::new(),
            warnings: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn record_fallback(&mut self, field: &str) {
        *self.fallback_usage.entry(field.to_string()).or_insert(0) += 1;
    }

    pub fn fallback_count(&self) -> u64 {
        self.fallback_usage.values().sum()
    }

    pub fn record_reference(&mut self, role: &str, usage: ReferenceUsage) {
        self.reference_usage.insert(role.to_string(), usage);
    }

    /// Counts every failing cell; only the first issue per field is kept in `warnings`.
    pub fn record_field_failure(&mut self, issue: GenerationIssue) {
        let Some(field) = issue.field.as_ref() else {
            self.record_warning(issue);
            return;
        };
        let failures = self.failed_fields.entry(field.clone()).or_insert(0);
        *failures += 1;
        if *failures == 1 {
            self.record_warning(issue);
        } else {
            *self.warnings_by_code.entry(issue.code).or_insert(0) += 1;
        }
    }

    pub fn record_warning(&mut self, issue: GenerationIssue) {
        *self.warnings_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.warnings.push(issue);
    }
}

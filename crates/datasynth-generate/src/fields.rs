//! Declarative per-field descriptors for the built-in entities.
//!
//! A descriptor either generates its value unconditionally or derives it from
//! a field placed earlier in the same row. When that source field was not
//! requested, the descriptor falls back to its unconstrained generator.

use chrono::NaiveDateTime;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use datasynth_core::{GeneratedValue, Row, round_to};

use crate::model::Probabilities;
use crate::providers::{financial, identity};
use crate::references::ReferencePool;

pub type FieldFn = fn(&mut FieldContext<'_>) -> GeneratedValue;
pub type DeriveFn = fn(&GeneratedValue, &mut FieldContext<'_>) -> GeneratedValue;

/// Everything a field generator may read while building one row.
pub struct FieldContext<'a> {
    /// Fields already placed in the row being built.
    pub row: &'a Row,
    pub rng: &'a mut dyn RngCore,
    pub now: NaiveDateTime,
    pub probabilities: &'a Probabilities,
    pub references: &'a ReferencePool,
}

impl FieldContext<'_> {
    pub fn choose(&mut self, options: &[&str]) -> GeneratedValue {
        options
            .choose(self.rng)
            .map(|value| GeneratedValue::text(*value))
            .unwrap_or(GeneratedValue::Null)
    }

    /// Uniform float in `[min, max]` rounded to 2 places.
    pub fn money(&mut self, min: f64, max: f64) -> GeneratedValue {
        GeneratedValue::Float(financial::money(min, max, self.rng))
    }

    pub fn int_between(&mut self, min: i64, max: i64) -> GeneratedValue {
        GeneratedValue::Int(self.rng.random_range(min..=max))
    }

    pub fn flip(&mut self) -> GeneratedValue {
        GeneratedValue::Bool(self.rng.random_bool(0.5))
    }

    /// True with probability `p`; values outside `[0, 1]` are clamped.
    pub fn chance(&mut self, p: f64) -> bool {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        self.rng.random_bool(p)
    }

    pub fn uuid(&mut self) -> GeneratedValue {
        GeneratedValue::Text(identity::uuid4(self.rng))
    }

    /// Sampled key for `field` when reference data was loaded, a fresh UUID otherwise.
    pub fn reference_or_uuid(&mut self, field: &str) -> GeneratedValue {
        match self.references.sample(field, self.rng) {
            Some(value) => value,
            None => self.uuid(),
        }
    }

    /// Numeric value of an already generated field, if present.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.row.get(field).and_then(GeneratedValue::as_f64)
    }

    pub fn scaled(&mut self, base: f64, min_factor: f64, max_factor: f64) -> GeneratedValue {
        let factor = self.rng.random_range(min_factor..=max_factor);
        GeneratedValue::Float(round_to(base * factor, 2))
    }
}

pub fn text(value: String) -> GeneratedValue {
    GeneratedValue::Text(value)
}

#[derive(Clone, Copy)]
pub struct Derivation {
    pub depends_on: &'static str,
    pub rule: DeriveFn,
}

#[derive(Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// Unconstrained path; also the fallback when the dependency is absent.
    pub generate: FieldFn,
    pub derive: Option<Derivation>,
}

/// Outcome of evaluating one descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Generated(GeneratedValue),
    Derived(GeneratedValue),
    /// Derived field whose source was not part of the row.
    Fallback(GeneratedValue),
}

impl FieldValue {
    pub fn into_value(self) -> GeneratedValue {
        match self {
            FieldValue::Generated(value)
            | FieldValue::Derived(value)
            | FieldValue::Fallback(value) => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FieldValue::Fallback(_))
    }
}

impl FieldDescriptor {
    pub fn new(name: &'static str, generate: FieldFn) -> Self {
        Self {
            name,
            generate,
            derive: None,
        }
    }

    pub fn derived(
        name: &'static str,
        depends_on: &'static str,
        rule: DeriveFn,
        fallback: FieldFn,
    ) -> Self {
        Self {
            name,
            generate: fallback,
            derive: Some(Derivation { depends_on, rule }),
        }
    }

    pub fn depends_on(&self) -> Option<&'static str> {
        self.derive.map(|derivation| derivation.depends_on)
    }

    pub fn evaluate(&self, ctx: &mut FieldContext<'_>) -> FieldValue {
        let Some(derivation) = self.derive else {
            return FieldValue::Generated((self.generate)(ctx));
        };
        let row = ctx.row;
        match row.get(derivation.depends_on) {
            Some(source) => FieldValue::Derived((derivation.rule)(source, ctx)),
            None => FieldValue::Fallback((self.generate)(ctx)),
        }
    }
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("depends_on", &self.depends_on())
            .finish()
    }
}

/// Checks that every dependency names a field declared earlier in `fields`.
pub fn validate_order(fields: &[FieldDescriptor]) -> Result<(), String> {
    for (idx, field) in fields.iter().enumerate() {
        if fields[..idx].iter().any(|earlier| earlier.name == field.name) {
            return Err(format!("field '{}' declared twice", field.name));
        }
        if let Some(source) = field.depends_on() {
            if !fields[..idx].iter().any(|earlier| earlier.name == source) {
                return Err(format!(
                    "field '{}' depends on '{}' which is not declared before it",
                    field.name, source
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    fn doubled() -> FieldDescriptor {
        FieldDescriptor::derived(
            "double",
            "base",
            |source, _| GeneratedValue::Float(source.as_f64().unwrap_or_default() * 2.0),
            |_| GeneratedValue::Float(-1.0),
        )
    }

    #[test]
    fn derives_from_present_source_and_falls_back_otherwise() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let probabilities = Probabilities::default();
        let references = ReferencePool::empty();

        let mut row = Row::new();
        row.insert("base", GeneratedValue::Float(4.0));
        let mut ctx = FieldContext {
            row: &row,
            rng: &mut rng,
            now: now(),
            probabilities: &probabilities,
            references: &references,
        };
        assert_eq!(
            doubled().evaluate(&mut ctx),
            FieldValue::Derived(GeneratedValue::Float(8.0))
        );

        let empty = Row::new();
        let mut ctx = FieldContext {
            row: &empty,
            rng: &mut rng,
            now: now(),
            probabilities: &probabilities,
            references: &references,
        };
        assert!(doubled().evaluate(&mut ctx).is_fallback());
    }

    #[test]
    fn rejects_forward_dependencies() {
        let base = FieldDescriptor::new("base", |_| GeneratedValue::Float(1.0));
        assert!(validate_order(&[base, doubled()]).is_ok());
        assert!(validate_order(&[doubled(), base]).is_err());
    }
}

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::json;

use datasynth_core::GeneratedValue;
use datasynth_generate::providers::ProviderContext;
use datasynth_generate::{GenerationError, ProviderRegistry};

fn context() -> ProviderContext {
    ProviderContext {
        now: NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("valid now"),
    }
}

#[test]
fn provider_ids_are_sorted_and_unique() {
    let registry = ProviderRegistry::new();
    let ids = registry.ids();
    assert!(!ids.is_empty());

    let mut sorted = ids.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(ids, sorted);

    for expected in ["name", "email", "address", "uuid4", "date_between", "bothify", "ean13"] {
        assert!(ids.contains(&expected), "missing provider {expected}");
    }
}

#[test]
fn catalog_describes_every_provider() {
    let registry = ProviderRegistry::new();
    let catalog = registry.catalog();
    assert_eq!(catalog.len(), registry.len());
    for info in &catalog {
        assert!(info.signature.starts_with(info.id));
        assert!(!info.description.is_empty());
    }

    let undocumented = registry.describe("random_int").expect("describe");
    assert!(undocumented.contains("(undocumented)"));
    assert!(undocumented.starts_with("random_int("));

    let err = registry.describe("nope").expect_err("unknown");
    assert!(matches!(err, GenerationError::UnknownProvider(_)));
}

#[test]
fn every_provider_produces_a_value_with_defaults() {
    let registry = ProviderRegistry::new();
    let ctx = context();
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let no_kwargs = BTreeMap::new();
    for id in registry.ids() {
        let entry = registry.get(id).expect("entry");
        if entry.params.iter().any(|spec| spec.required) {
            continue;
        }
        let value = registry
            .invoke(id, &[], &no_kwargs, &ctx, &mut rng)
            .unwrap_or_else(|err| panic!("{id} failed: {err}"));
        if id != "null_boolean" {
            assert!(!value.is_null(), "{id} returned null");
        }
    }
}

#[test]
fn arguments_bind_positionally_and_by_name() {
    let registry = ProviderRegistry::new();
    let ctx = context();
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let positional = registry
        .invoke("numerify", &[json!("ID-###")], &BTreeMap::new(), &ctx, &mut rng)
        .expect("numerify");
    let text = positional.as_str().expect("text");
    assert!(text.starts_with("ID-"));
    assert!(text[3..].chars().all(|c| c.is_ascii_digit()));

    let mut kwargs = BTreeMap::new();
    kwargs.insert("text".to_string(), json!("x"));
    let err = registry
        .invoke("numerify", &[json!("#")], &kwargs, &ctx, &mut rng)
        .expect_err("duplicate binding");
    assert!(matches!(err, GenerationError::InvalidArgs { .. }));

    let err = registry
        .invoke("bothify", &[], &BTreeMap::new(), &ctx, &mut rng)
        .expect_err("missing mask");
    assert!(matches!(err, GenerationError::InvalidArgs { .. }));

    let mut kwargs = BTreeMap::new();
    kwargs.insert("colour".to_string(), json!("red"));
    let err = registry
        .invoke("word", &[], &kwargs, &ctx, &mut rng)
        .expect_err("unknown kwarg");
    assert!(matches!(err, GenerationError::InvalidArgs { .. }));
}

#[test]
fn ean13_check_digit_is_valid() {
    let registry = ProviderRegistry::new();
    let ctx = context();
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    for _ in 0..20 {
        let value = registry
            .invoke("ean13", &[], &BTreeMap::new(), &ctx, &mut rng)
            .expect("ean13");
        let GeneratedValue::Text(code) = value else {
            panic!("ean13 should be text");
        };
        let digits: Vec<u32> = code.chars().filter_map(|c| c.to_digit(10)).collect();
        assert_eq!(digits.len(), 13);
        let sum: u32 = digits
            .iter()
            .enumerate()
            .map(|(index, digit)| if index % 2 == 0 { *digit } else { digit * 3 })
            .sum();
        assert_eq!(sum % 10, 0, "{code}");
    }
}

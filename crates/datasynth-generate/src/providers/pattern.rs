use fake::Fake;
use fake::faker::barcode::en::Isbn13;
use fake::faker::color::en::HexColor;
use fake::faker::internet::en::Password;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use datasynth_core::{GeneratedValue, round_to};

use super::{ProviderCategory, ProviderEntry, ProviderRegistry, provider_error};
use crate::params::{ParamKind, ParamSpec};

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const HEX_DIGITS: &[u8] = b"0123456789abcdef";

const MASK_PARAMS: &[ParamSpec] = &[
    ParamSpec::required("text", ParamKind::String),
    ParamSpec::optional("upper", ParamKind::Bool),
];
const INT_PARAMS: &[ParamSpec] = &[
    ParamSpec::optional("min", ParamKind::Int),
    ParamSpec::optional("max", ParamKind::Int),
];
const FLOAT_PARAMS: &[ParamSpec] = &[
    ParamSpec::optional("min_value", ParamKind::Float),
    ParamSpec::optional("max_value", ParamKind::Float),
    ParamSpec::optional("right_digits", ParamKind::Int),
];
const ELEMENT_PARAMS: &[ParamSpec] = &[ParamSpec::required("elements", ParamKind::StringList)];
const BOOL_PARAMS: &[ParamSpec] = &[ParamSpec::optional("chance_of_getting_true", ParamKind::Int)];
const PASSWORD_PARAMS: &[ParamSpec] = &[ParamSpec::optional("length", ParamKind::Int)];

pub fn register(registry: &mut ProviderRegistry) {
    use ProviderCategory::Pattern;

    registry.register(
        ProviderEntry::new(
            "bothify",
            Pattern,
            "Replace '#' with digits and '?' with letters in `text`.",
            |_, params, rng| Ok(GeneratedValue::Text(masked(params, rng, bothify))),
        )
        .with_params(MASK_PARAMS),
    );
    registry.register(
        ProviderEntry::new(
            "numerify",
            Pattern,
            "Replace '#' with digits in `text`.",
            |_, params, rng| Ok(GeneratedValue::Text(masked(params, rng, numerify))),
        )
        .with_params(MASK_PARAMS),
    );
    registry.register(
        ProviderEntry::new(
            "lexify",
            Pattern,
            "Replace '?' with letters in `text`.",
            |_, params, rng| Ok(GeneratedValue::Text(masked(params, rng, lexify))),
        )
        .with_params(MASK_PARAMS),
    );
    registry.register(
        ProviderEntry::new(
            "hexify",
            Pattern,
            "Replace '^' with hexadecimal digits in `text`.",
            |_, params, rng| Ok(GeneratedValue::Text(masked(params, rng, hexify))),
        )
        .with_params(MASK_PARAMS),
    );
    registry.register(ProviderEntry::new(
        "ean13",
        Pattern,
        "EAN-13 barcode with a valid check digit.",
        |_, _, rng| Ok(GeneratedValue::Text(ean(13, rng))),
    ));
    registry.register(ProviderEntry::new(
        "ean8",
        Pattern,
        "EAN-8 barcode with a valid check digit.",
        |_, _, rng| Ok(GeneratedValue::Text(ean(8, rng))),
    ));
    registry.register(ProviderEntry::new(
        "isbn13",
        Pattern,
        "ISBN-13 book identifier.",
        |_, _, rng| Ok(GeneratedValue::Text(Isbn13().fake_with_rng(rng))),
    ));
    registry.register(
        ProviderEntry::new("random_int", Pattern, "", |_, params, rng| {
            let min = params.get_i64("min").unwrap_or(0);
            let max = params.get_i64("max").unwrap_or(9999);
            if min > max {
                return Err(provider_error("random_int", "min must be <= max"));
            }
            Ok(GeneratedValue::Int(rng.random_range(min..=max)))
        })
        .with_params(INT_PARAMS),
    );
    registry.register(
        ProviderEntry::new(
            "pyfloat",
            Pattern,
            "Float between `min_value` and `max_value` rounded to `right_digits`.",
            |_, params, rng| {
                let min = params.get_f64("min_value").unwrap_or(0.0);
                let max = params.get_f64("max_value").unwrap_or(10_000.0);
                let digits = params.get_i64("right_digits").unwrap_or(2);
                if min > max {
                    return Err(provider_error("pyfloat", "min_value must be <= max_value"));
                }
                if !(0..=15).contains(&digits) {
                    return Err(provider_error("pyfloat", "right_digits must be within 0..=15"));
                }
                if !(max - min).is_finite() {
                    return Err(provider_error("pyfloat", "value range is too wide"));
                }
                let value = rng.random_range(min..=max);
                Ok(GeneratedValue::Float(round_to(value, digits as u32)))
            },
        )
        .with_params(FLOAT_PARAMS),
    );
    registry.register(
        ProviderEntry::new(
            "random_element",
            Pattern,
            "One of `elements`, chosen uniformly.",
            |_, params, rng| {
                let elements = params.get_str_list("elements").unwrap_or_default();
                elements
                    .choose(rng)
                    .map(|value| GeneratedValue::Text(value.to_string()))
                    .ok_or_else(|| provider_error("random_element", "elements must not be empty"))
            },
        )
        .with_params(ELEMENT_PARAMS),
    );
    registry.register(
        ProviderEntry::new(
            "boolean",
            Pattern,
            "True with `chance_of_getting_true` percent probability (default 50).",
            |_, params, rng| {
                let chance = params.get_i64("chance_of_getting_true").unwrap_or(50);
                if !(0..=100).contains(&chance) {
                    return Err(provider_error(
                        "boolean",
                        "chance_of_getting_true must be within 0..=100",
                    ));
                }
                Ok(GeneratedValue::Bool(rng.random_bool(chance as f64 / 100.0)))
            },
        )
        .with_params(BOOL_PARAMS),
    );
    registry.register(ProviderEntry::new(
        "null_boolean",
        Pattern,
        "True, false or null with equal probability.",
        |_, _, rng| {
            Ok(match rng.random_range(0..3) {
                0 => GeneratedValue::Null,
                1 => GeneratedValue::Bool(true),
                _ => GeneratedValue::Bool(false),
            })
        },
    ));
    registry.register(
        ProviderEntry::new("password", Pattern, "", |_, params, rng| {
            let length = params.get_usize("length").unwrap_or(12);
            if length == 0 {
                return Err(provider_error("password", "length must be positive"));
            }
            let value: String = Password(length..length + 1).fake_with_rng(rng);
            Ok(GeneratedValue::Text(value))
        })
        .with_params(PASSWORD_PARAMS),
    );
    registry.register(ProviderEntry::new(
        "hex_color",
        Pattern,
        "Color as '#rrggbb'.",
        |_, _, rng| Ok(GeneratedValue::Text(HexColor().fake_with_rng(rng))),
    ));
}

fn masked(
    params: &crate::params::ParamMap,
    rng: &mut dyn RngCore,
    apply: fn(&str, &mut dyn RngCore) -> String,
) -> String {
    let text = params.get_str("text").unwrap_or_default();
    let value = apply(text, rng);
    if params.get_bool("upper").unwrap_or(false) {
        value.to_uppercase()
    } else {
        value
    }
}

/// `#` becomes a digit, `?` a letter.
pub fn bothify(mask: &str, rng: &mut dyn RngCore) -> String {
    mask.chars()
        .map(|ch| match ch {
            '#' => digit(rng),
            '?' => letter(rng),
            other => other,
        })
        .collect()
}

pub fn numerify(mask: &str, rng: &mut dyn RngCore) -> String {
    mask.chars()
        .map(|ch| if ch == '#' { digit(rng) } else { ch })
        .collect()
}

pub fn lexify(mask: &str, rng: &mut dyn RngCore) -> String {
    mask.chars()
        .map(|ch| if ch == '?' { letter(rng) } else { ch })
        .collect()
}

pub fn hexify(mask: &str, rng: &mut dyn RngCore) -> String {
    mask.chars()
        .map(|ch| {
            if ch == '^' {
                HEX_DIGITS[rng.random_range(0..HEX_DIGITS.len())] as char
            } else {
                ch
            }
        })
        .collect()
}

/// EAN barcode of `length` digits (8 or 13) whose last digit is the check digit.
pub fn ean(length: usize, rng: &mut dyn RngCore) -> String {
    let body: Vec<u32> = (0..length.saturating_sub(1))
        .map(|_| rng.random_range(0..10))
        .collect();
    let check = ean_check_digit(&body);
    body.iter()
        .chain(std::iter::once(&check))
        .map(|digit| char::from_digit(*digit, 10).unwrap_or('0'))
        .collect()
}

/// Weights alternate 3,1 starting from the rightmost body digit.
pub fn ean_check_digit(body: &[u32]) -> u32 {
    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, digit)| if idx % 2 == 0 { digit * 3 } else { *digit })
        .sum();
    (10 - sum % 10) % 10
}

fn digit(rng: &mut dyn RngCore) -> char {
    char::from(b'0' + rng.random_range(0..10_u8))
}

fn letter(rng: &mut dyn RngCore) -> char {
    LETTERS[rng.random_range(0..LETTERS.len())] as char
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn masks_replace_only_placeholders() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let value = bothify("ORD-##??", &mut rng);
        assert!(value.starts_with("ORD-"));
        assert!(value[4..6].chars().all(|ch| ch.is_ascii_digit()));
        assert!(value[6..].chars().all(|ch| ch.is_ascii_alphabetic()));
        assert_eq!(numerify("no placeholders", &mut rng), "no placeholders");
        assert!(hexify("^^^^", &mut rng).chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn ean13_check_digit_is_valid() {
        // 400638133393 -> 1 (known EAN-13 4006381333931)
        assert_eq!(ean_check_digit(&[4, 0, 0, 6, 3, 8, 1, 3, 3, 3, 9, 3]), 1);

        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..100 {
            let code = ean(13, &mut rng);
            assert_eq!(code.len(), 13);
            let digits: Vec<u32> = code.chars().filter_map(|ch| ch.to_digit(10)).collect();
            assert_eq!(ean_check_digit(&digits[..12]), digits[12]);
        }
    }
}

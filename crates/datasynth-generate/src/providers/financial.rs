use chrono::{Datelike, Months, NaiveDate};
use fake::Fake;
use fake::faker::creditcard::en::CreditCardNumber;
use fake::faker::currency::en::{CurrencyCode, CurrencyName, CurrencySymbol};
use fake::faker::finance::en::Bic;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use datasynth_core::{GeneratedValue, round_to};

use super::pattern::numerify;
use super::{ProviderCategory, ProviderEntry, ProviderRegistry, provider_error};
use crate::params::{ParamKind, ParamSpec};

pub const CARD_PROVIDERS: &[&str] = &[
    "VISA 16 digit",
    "VISA 13 digit",
    "Mastercard",
    "American Express",
    "Discover",
    "JCB 16 digit",
    "Diners Club / Carte Blanche",
    "Maestro",
];

const AMOUNT_PARAMS: &[ParamSpec] = &[
    ParamSpec::optional("min", ParamKind::Float),
    ParamSpec::optional("max", ParamKind::Float),
];

pub fn register(registry: &mut ProviderRegistry) {
    use ProviderCategory::Financial;

    registry.register(ProviderEntry::new(
        "credit_card_number",
        Financial,
        "Card number with a valid Luhn checksum.",
        |_, _, rng| Ok(GeneratedValue::Text(credit_card_number(rng))),
    ));
    registry.register(ProviderEntry::new(
        "credit_card_provider",
        Financial,
        "Card network name.",
        |_, _, rng| Ok(GeneratedValue::Text(credit_card_provider(rng))),
    ));
    registry.register(ProviderEntry::new(
        "credit_card_expire",
        Financial,
        "Expiry as MM/YY within the next ten years.",
        |ctx, _, rng| Ok(GeneratedValue::Text(credit_card_expire(ctx.now.date(), rng))),
    ));
    registry.register(ProviderEntry::new(
        "credit_card_security_code",
        Financial,
        "Three-digit card verification code.",
        |_, _, rng| Ok(GeneratedValue::Text(numerify("###", rng))),
    ));
    registry.register(ProviderEntry::new(
        "currency_code",
        Financial,
        "ISO 4217 currency code.",
        |_, _, rng| Ok(GeneratedValue::Text(currency_code(rng))),
    ));
    registry.register(ProviderEntry::new(
        "currency_name",
        Financial,
        "Currency name.",
        |_, _, rng| Ok(GeneratedValue::Text(CurrencyName().fake_with_rng(rng))),
    ));
    registry.register(ProviderEntry::new(
        "currency_symbol",
        Financial,
        "Currency symbol.",
        |_, _, rng| Ok(GeneratedValue::Text(CurrencySymbol().fake_with_rng(rng))),
    ));
    registry.register(ProviderEntry::new(
        "swift",
        Financial,
        "SWIFT/BIC bank identifier.",
        |_, _, rng| Ok(GeneratedValue::Text(Bic().fake_with_rng(rng))),
    ));
    registry.register(
        ProviderEntry::new(
            "amount",
            Financial,
            "Monetary amount between `min` (default 0) and `max` (default 1000), 2 decimals.",
            |_, params, rng| {
                let min = params.get_f64("min").unwrap_or(0.0);
                let max = params.get_f64("max").unwrap_or(1000.0);
                if min > max {
                    return Err(provider_error("amount", "min must be <= max"));
                }
                if !(max - min).is_finite() {
                    return Err(provider_error("amount", "value range is too wide"));
                }
                Ok(GeneratedValue::Float(money(min, max, rng)))
            },
        )
        .with_params(AMOUNT_PARAMS),
    );
}

pub fn credit_card_number(rng: &mut dyn RngCore) -> String {
    CreditCardNumber().fake_with_rng(rng)
}

pub fn credit_card_provider(rng: &mut dyn RngCore) -> String {
    CARD_PROVIDERS
        .choose(rng)
        .copied()
        .unwrap_or("Mastercard")
        .to_string()
}

/// Month and two-digit year of a date within ten years after `today`.
pub fn credit_card_expire(today: NaiveDate, rng: &mut dyn RngCore) -> String {
    let offset = rng.random_range(0..=120);
    let expiry = today
        .checked_add_months(Months::new(offset))
        .unwrap_or(today);
    format!("{:02}/{:02}", expiry.month(), expiry.year().rem_euclid(100))
}

pub fn currency_code(rng: &mut dyn RngCore) -> String {
    CurrencyCode().fake_with_rng(rng)
}

/// Uniform monetary value in `[min, max]` rounded to cents.
pub fn money(min: f64, max: f64, rng: &mut dyn RngCore) -> f64 {
    if min >= max {
        return round_to(min, 2);
    }
    round_to(rng.random_range(min..=max), 2)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn expiry_is_month_slash_year() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default();
        for _ in 0..50 {
            let value = credit_card_expire(today, &mut rng);
            let (month, year) = value.split_once('/').expect("slash");
            let month: u32 = month.parse().expect("month");
            let year: u32 = year.parse().expect("year");
            assert!((1..=12).contains(&month));
            assert!((24..=34).contains(&year), "unexpected year {year}");
        }
    }

    #[test]
    fn money_rounds_to_cents() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            let value = money(1.0, 1000.0, &mut rng);
            assert!((1.0..=1000.0).contains(&value));
            assert_eq!(round_to(value, 2), value);
        }
    }
}

//! Dates and timestamps inside bounded windows.
//!
//! Relative windows are resolved against [`ProviderContext::now`] so a pinned
//! base time makes seeded runs reproducible.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use datasynth_core::GeneratedValue;

use super::{ProviderCategory, ProviderContext, ProviderEntry, ProviderRegistry, provider_error};
use crate::errors::GenerationError;
use crate::params::{ParamKind, ParamMap, ParamSpec, parse_date_bound};

const MONTHS: &[&str] = &[
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const WEEKDAYS: &[&str] = &[
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

const RANGE_PARAMS: &[ParamSpec] = &[
    ParamSpec::optional("start_date", ParamKind::DateBound),
    ParamSpec::optional("end_date", ParamKind::DateBound),
];
const AGE_PARAMS: &[ParamSpec] = &[
    ParamSpec::optional("minimum_age", ParamKind::Int),
    ParamSpec::optional("maximum_age", ParamKind::Int),
];

pub fn register(registry: &mut ProviderRegistry) {
    use ProviderCategory::Temporal;

    registry.register(
        ProviderEntry::new(
            "date_time_between",
            Temporal,
            "Timestamp between `start_date` (default -30y) and `end_date` (default now).",
            |ctx, params, rng| {
                let (start, end) = bounds(ctx, params, "date_time_between", "-30y", "now")?;
                Ok(GeneratedValue::Timestamp(timestamp_between(start, end, rng)))
            },
        )
        .with_params(RANGE_PARAMS),
    );
    registry.register(
        ProviderEntry::new(
            "date_between",
            Temporal,
            "Date between `start_date` (default -30y) and `end_date` (default today).",
            |ctx, params, rng| {
                let (start, end) = bounds(ctx, params, "date_between", "-30y", "today")?;
                Ok(GeneratedValue::Date(date_between(start.date(), end.date(), rng)))
            },
        )
        .with_params(RANGE_PARAMS),
    );
    registry.register(
        ProviderEntry::new(
            "date_of_birth",
            Temporal,
            "Birth date for someone aged `minimum_age` (default 0) to `maximum_age` (default 115).",
            |ctx, params, rng| {
                let min = params.get_i64("minimum_age").unwrap_or(0);
                let max = params.get_i64("maximum_age").unwrap_or(115);
                if min < 0 || min > max {
                    return Err(provider_error(
                        "date_of_birth",
                        "ages must satisfy 0 <= minimum_age <= maximum_age",
                    ));
                }
                let (Ok(min), Ok(max)) = (u32::try_from(min), u32::try_from(max)) else {
                    return Err(provider_error("date_of_birth", "age window out of range"));
                };
                date_of_birth(ctx.now.date(), min, max, rng)
                    .map(GeneratedValue::Date)
                    .ok_or_else(|| provider_error("date_of_birth", "age window out of range"))
            },
        )
        .with_params(AGE_PARAMS),
    );
    registry.register(ProviderEntry::new(
        "date_this_year",
        Temporal,
        "Date between January 1st of the current year and today.",
        |ctx, _, rng| {
            let today = ctx.now.date();
            let start = today.with_ordinal(1).unwrap_or(today);
            Ok(GeneratedValue::Date(date_between(start, today, rng)))
        },
    ));
    registry.register(ProviderEntry::new(
        "past_date",
        Temporal,
        "Date within the last 30 days.",
        |ctx, _, rng| {
            let today = ctx.now.date();
            Ok(GeneratedValue::Date(date_between(
                today - Duration::days(30),
                today - Duration::days(1),
                rng,
            )))
        },
    ));
    registry.register(ProviderEntry::new(
        "future_date",
        Temporal,
        "Date within the next 30 days.",
        |ctx, _, rng| {
            let today = ctx.now.date();
            Ok(GeneratedValue::Date(date_between(
                today + Duration::days(1),
                today + Duration::days(30),
                rng,
            )))
        },
    ));
    registry.register(ProviderEntry::new(
        "time",
        Temporal,
        "Time of day as HH:MM:SS.",
        |_, _, rng| Ok(GeneratedValue::Text(time_of_day(rng).format("%H:%M:%S").to_string())),
    ));
    registry.register(ProviderEntry::new(
        "iso8601",
        Temporal,
        "Timestamp within the last 30 years rendered as ISO 8601.",
        |ctx, _, rng| {
            let value = within_last_days(ctx.now, 30 * 365, rng);
            Ok(GeneratedValue::Text(value.format("%Y-%m-%dT%H:%M:%S").to_string()))
        },
    ));
    registry.register(ProviderEntry::new(
        "unix_time",
        Temporal,
        "Seconds since the epoch, up to now.",
        |ctx, _, rng| {
            let upper = ctx.now.and_utc().timestamp().max(0);
            Ok(GeneratedValue::Int(rng.random_range(0..=upper)))
        },
    ));
    registry.register(ProviderEntry::new(
        "year",
        Temporal,
        "Year between 1970 and the current year.",
        |ctx, _, rng| {
            let current = i64::from(ctx.now.year()).max(1970);
            Ok(GeneratedValue::Text(rng.random_range(1970..=current).to_string()))
        },
    ));
    registry.register(ProviderEntry::new(
        "month_name",
        Temporal,
        "",
        |_, _, rng| Ok(GeneratedValue::Text(pick(MONTHS, rng))),
    ));
    registry.register(ProviderEntry::new(
        "day_of_week",
        Temporal,
        "",
        |_, _, rng| Ok(GeneratedValue::Text(pick(WEEKDAYS, rng))),
    ));
}

fn bounds(
    ctx: &ProviderContext,
    params: &ParamMap,
    provider: &str,
    default_start: &str,
    default_end: &str,
) -> Result<(NaiveDateTime, NaiveDateTime), GenerationError> {
    let resolve = |key: &str, default: &str| {
        let raw = params.get_str(key).unwrap_or(default);
        parse_date_bound(raw, ctx.now)
            .ok_or_else(|| provider_error(provider, format!("cannot resolve {key} '{raw}'")))
    };
    let start = resolve("start_date", default_start)?;
    let end = resolve("end_date", default_end)?;
    if start > end {
        return Err(provider_error(provider, "start_date must not be after end_date"));
    }
    Ok((start, end))
}

/// Uniform timestamp in `[start, end]` at second resolution. Reversed bounds yield `start`.
pub fn timestamp_between(
    start: NaiveDateTime,
    end: NaiveDateTime,
    rng: &mut dyn RngCore,
) -> NaiveDateTime {
    let span = (end - start).num_seconds();
    if span <= 0 {
        return start;
    }
    start + Duration::seconds(rng.random_range(0..=span))
}

/// Uniform date in `[start, end]`. Reversed bounds yield `start`.
pub fn date_between(start: NaiveDate, end: NaiveDate, rng: &mut dyn RngCore) -> NaiveDate {
    let span = (end - start).num_days();
    if span <= 0 {
        return start;
    }
    start + Duration::days(rng.random_range(0..=span))
}

/// Timestamp in the `days`-long window ending at `now`.
pub fn within_last_days(now: NaiveDateTime, days: i64, rng: &mut dyn RngCore) -> NaiveDateTime {
    timestamp_between(now - Duration::days(days), now, rng)
}

/// Birth date such that the age at `today` lies in `[min_age, max_age]`.
pub fn date_of_birth(
    today: NaiveDate,
    min_age: u32,
    max_age: u32,
    rng: &mut dyn RngCore,
) -> Option<NaiveDate> {
    let latest = today.checked_sub_months(Months::new(min_age.checked_mul(12)?))?;
    let earliest = today
        .checked_sub_months(Months::new(max_age.checked_add(1)?.checked_mul(12)?))?
        .checked_add_signed(Duration::days(1))?;
    Some(date_between(earliest, latest, rng))
}

fn time_of_day(rng: &mut dyn RngCore) -> NaiveTime {
    let seconds = rng.random_range(0..86_400_u32);
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).unwrap_or_default()
}

fn pick(values: &[&str], rng: &mut dyn RngCore) -> String {
    values.choose(rng).copied().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default()
    }

    #[test]
    fn date_of_birth_respects_age_window() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..500 {
            let born = date_of_birth(today(), 18, 90, &mut rng).expect("birth date");
            let age = today().years_since(born).expect("born before today");
            assert!((18..=90).contains(&age), "age {age} out of range");
        }
    }

    #[test]
    fn reversed_bounds_collapse_to_start() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let start = today();
        let end = start - Duration::days(3);
        assert_eq!(date_between(start, end, &mut rng), start);
    }
}

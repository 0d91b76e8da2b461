use chrono::Duration;

use datasynth_core::GeneratedValue;

use super::{CURRENCIES, EntityGenerator, EntityKind};
use crate::fields::{FieldContext, FieldDescriptor, text};
use crate::providers::{composite, contact, geo, identity, network, pattern, temporal};

const COMPANY_TYPES: &[&str] = &[
    "Corporation",
    "LLC",
    "Partnership",
    "Sole Proprietorship",
    "Non-Profit",
    "Public Company",
];
const INDUSTRIES: &[&str] = &[
    "Technology",
    "Healthcare",
    "Finance",
    "Retail",
    "Manufacturing",
    "Energy",
    "Education",
    "Entertainment",
    "Transportation",
    "Agriculture",
    "Construction",
    "Hospitality",
    "Real Estate",
    "Telecommunications",
    "Media",
    "Consulting",
];
const STATUSES: &[&str] = &["Active", "Inactive", "Bankrupt", "Acquired", "Merged", "IPO"];
const LEGAL_SUFFIXES: &[&str] = &["Inc.", "LLC", "Corp.", "Ltd.", "Group"];
const STOCK_EXCHANGES: &[&str] = &["NYSE", "NASDAQ", "LSE", "TSX", "JPX", "SSE"];

/// Organizational size class; selects the employee and revenue ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeTier {
    pub name: &'static str,
    pub employees: (i64, i64),
    pub revenue: (f64, f64),
}

pub const SIZE_TIERS: &[SizeTier] = &[
    SizeTier {
        name: "Startup",
        employees: (1, 50),
        revenue: (0.0, 1_000_000.0),
    },
    SizeTier {
        name: "Small",
        employees: (51, 200),
        revenue: (1_000_000.0, 10_000_000.0),
    },
    SizeTier {
        name: "Medium",
        employees: (201, 1_000),
        revenue: (10_000_000.0, 100_000_000.0),
    },
    SizeTier {
        name: "Large",
        employees: (1_001, 10_000),
        revenue: (100_000_000.0, 1_000_000_000.0),
    },
    SizeTier {
        name: "Enterprise",
        employees: (10_001, 100_000),
        revenue: (1_000_000_000.0, 10_000_000_000.0),
    },
];

/// Ranges used when the size tier was not requested.
pub const ANY_SIZE_EMPLOYEES: (i64, i64) = (1, 100_000);
pub const ANY_SIZE_REVENUE: (f64, f64) = (0.0, 10_000_000_000.0);

pub fn size_tier(name: &str) -> Option<&'static SizeTier> {
    SIZE_TIERS.iter().find(|tier| tier.name == name)
}

/// Organizations with size-correlated headcount and revenue.
#[derive(Debug)]
pub struct CompanyGenerator {
    fields: Vec<FieldDescriptor>,
}

impl Default for CompanyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CompanyGenerator {
    pub fn new() -> Self {
        Self {
            fields: vec![
                FieldDescriptor::new("company_id", |ctx| ctx.uuid()),
                FieldDescriptor::new("company_name", |ctx| text(identity::company(ctx.rng))),
                FieldDescriptor::new("legal_name", |ctx| {
                    let name = identity::company(ctx.rng);
                    let suffix = ctx.choose(LEGAL_SUFFIXES).to_text();
                    text(format!("{name} {suffix}"))
                }),
                FieldDescriptor::new("description", |ctx| {
                    let phrase = identity::catch_phrase(ctx.rng);
                    let bs = identity::bs(ctx.rng);
                    text(format!("{phrase}. {bs}"))
                }),
                FieldDescriptor::new("slogan", |ctx| text(identity::catch_phrase(ctx.rng))),
                FieldDescriptor::new("company_type", |ctx| ctx.choose(COMPANY_TYPES)),
                FieldDescriptor::new("industry", |ctx| ctx.choose(INDUSTRIES)),
                FieldDescriptor::new("company_size", |ctx| {
                    let names: Vec<&str> = SIZE_TIERS.iter().map(|tier| tier.name).collect();
                    ctx.choose(&names)
                }),
                FieldDescriptor::derived(
                    "employees",
                    "company_size",
                    |size, ctx| {
                        let (min, max) = size
                            .as_str()
                            .and_then(size_tier)
                            .map_or(ANY_SIZE_EMPLOYEES, |tier| tier.employees);
                        ctx.int_between(min, max)
                    },
                    |ctx| ctx.int_between(ANY_SIZE_EMPLOYEES.0, ANY_SIZE_EMPLOYEES.1),
                ),
                FieldDescriptor::new("email", |ctx| {
                    text(format!("contact@{}", network::domain_name(ctx.rng)))
                }),
                FieldDescriptor::new("phone", |ctx| text(contact::phone_number(ctx.rng))),
                FieldDescriptor::new("website", |ctx| {
                    text(format!("https://www.{}", network::domain_name(ctx.rng)))
                }),
                FieldDescriptor::new("fax", |ctx| text(contact::phone_number(ctx.rng))),
                FieldDescriptor::new("street_address", |ctx| text(geo::street_address(ctx.rng))),
                FieldDescriptor::new("city", |ctx| text(geo::city(ctx.rng))),
                FieldDescriptor::new("state", |ctx| text(geo::state(ctx.rng))),
                FieldDescriptor::new("zipcode", |ctx| text(geo::zipcode(ctx.rng))),
                FieldDescriptor::new("country", |ctx| text(geo::country(ctx.rng))),
                FieldDescriptor::new("latitude", |ctx| {
                    GeneratedValue::Float(geo::latitude(ctx.rng))
                }),
                FieldDescriptor::new("longitude", |ctx| {
                    GeneratedValue::Float(geo::longitude(ctx.rng))
                }),
                FieldDescriptor::derived(
                    "revenue",
                    "company_size",
                    |size, ctx| {
                        let (min, max) = size
                            .as_str()
                            .and_then(size_tier)
                            .map_or(ANY_SIZE_REVENUE, |tier| tier.revenue);
                        ctx.money(min, max)
                    },
                    |ctx| ctx.money(ANY_SIZE_REVENUE.0, ANY_SIZE_REVENUE.1),
                ),
                FieldDescriptor::new("currency", |ctx| ctx.choose(CURRENCIES)),
                FieldDescriptor::new("tax_id", |ctx| text(pattern::bothify("??-#######", ctx.rng))),
                FieldDescriptor::new("duns_number", |ctx| {
                    text(pattern::numerify("###-###-###", ctx.rng))
                }),
                FieldDescriptor::new("stock_symbol", |ctx| {
                    text(pattern::lexify("????", ctx.rng).to_uppercase())
                }),
                FieldDescriptor::new("stock_exchange", |ctx| ctx.choose(STOCK_EXCHANGES)),
                FieldDescriptor::new("founded_date", founded_window),
                FieldDescriptor::derived(
                    "registration_date",
                    "founded_date",
                    |founded, ctx| match founded.as_date() {
                        Some(founded) => GeneratedValue::Date(temporal::date_between(
                            founded,
                            founded + Duration::days(365),
                            ctx.rng,
                        )),
                        None => founded_window(ctx),
                    },
                    founded_window,
                ),
                FieldDescriptor::new("status", |ctx| ctx.choose(STATUSES)),
                FieldDescriptor::new("logo_url", |ctx| {
                    let id = identity::uuid4(ctx.rng);
                    text(format!("https://example.com/logos/{id}.png"))
                }),
                FieldDescriptor::new("parent_company", |ctx| {
                    if ctx.chance(ctx.probabilities.parent_company) {
                        text(identity::company(ctx.rng))
                    } else {
                        GeneratedValue::Null
                    }
                }),
                FieldDescriptor::new("ceo", |ctx| text(identity::name(ctx.rng))),
                FieldDescriptor::new("social_media", |ctx| {
                    GeneratedValue::Map(composite::social_media(ctx.rng))
                }),
            ],
        }
    }
}

impl EntityGenerator for CompanyGenerator {
    fn kind(&self) -> EntityKind {
        EntityKind::Company
    }

    fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

/// Between 50 years and 1 year ago.
fn founded_window(ctx: &mut FieldContext<'_>) -> GeneratedValue {
    let today = ctx.now.date();
    GeneratedValue::Date(temporal::date_between(
        today - Duration::days(50 * 365),
        today - Duration::days(365),
        ctx.rng,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_disjoint_and_ascending() {
        for pair in SIZE_TIERS.windows(2) {
            assert!(pair[0].employees.1 < pair[1].employees.0);
            assert!(pair[0].revenue.1 <= pair[1].revenue.0);
        }
        assert_eq!(size_tier("Medium").map(|tier| tier.employees), Some((201, 1_000)));
        assert_eq!(size_tier("Startup"), SIZE_TIERS.first());
        assert!(size_tier("Galactic").is_none());
    }
}

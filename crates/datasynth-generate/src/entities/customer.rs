use chrono::Duration;

use datasynth_core::GeneratedValue;

use super::{EntityGenerator, EntityKind};
use crate::fields::{FieldDescriptor, text};
use crate::providers::{contact, financial, geo, identity, network, temporal};

const GENDERS: &[&str] = &["Male", "Female", "Other", "Prefer not to say"];
const ACCOUNT_STATUSES: &[&str] = &["Active", "Inactive", "Suspended", "Pending"];
const SEGMENTS: &[&str] = &["New", "Regular", "VIP", "Inactive"];

/// People with contact, address, payment and account details.
#[derive(Debug)]
pub struct CustomerGenerator {
    fields: Vec<FieldDescriptor>,
}

impl Default for CustomerGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerGenerator {
    pub fn new() -> Self {
        Self {
            fields: vec![
                FieldDescriptor::new("customer_id", |ctx| ctx.uuid()),
                FieldDescriptor::new("first_name", |ctx| text(identity::first_name(ctx.rng))),
                FieldDescriptor::new("last_name", |ctx| text(identity::last_name(ctx.rng))),
                FieldDescriptor::new("email", |ctx| text(contact::email(ctx.rng))),
                FieldDescriptor::new("phone_number", |ctx| text(contact::phone_number(ctx.rng))),
                FieldDescriptor::new("street_address", |ctx| text(geo::street_address(ctx.rng))),
                FieldDescriptor::new("city", |ctx| text(geo::city(ctx.rng))),
                FieldDescriptor::new("state", |ctx| text(geo::state(ctx.rng))),
                FieldDescriptor::new("zipcode", |ctx| text(geo::zipcode(ctx.rng))),
                FieldDescriptor::new("country", |ctx| text(geo::country(ctx.rng))),
                FieldDescriptor::new("date_of_birth", |ctx| {
                    temporal::date_of_birth(ctx.now.date(), 18, 90, ctx.rng)
                        .map(GeneratedValue::Date)
                        .unwrap_or(GeneratedValue::Null)
                }),
                FieldDescriptor::new("registration_date", |ctx| {
                    GeneratedValue::Timestamp(temporal::within_last_days(ctx.now, 5 * 365, ctx.rng))
                }),
                FieldDescriptor::derived(
                    "last_login",
                    "registration_date",
                    |registered, ctx| {
                        let window_start = ctx.now - Duration::days(365);
                        let start = registered
                            .as_timestamp()
                            .map_or(window_start, |registered| registered.max(window_start));
                        let login = temporal::timestamp_between(start, ctx.now, ctx.rng);
                        GeneratedValue::Timestamp(login)
                    },
                    |ctx| {
                        GeneratedValue::Timestamp(temporal::within_last_days(ctx.now, 365, ctx.rng))
                    },
                ),
                FieldDescriptor::new("gender", |ctx| ctx.choose(GENDERS)),
                FieldDescriptor::new("credit_card", |ctx| {
                    text(financial::credit_card_number(ctx.rng))
                }),
                FieldDescriptor::new("credit_card_provider", |ctx| {
                    text(financial::credit_card_provider(ctx.rng))
                }),
                FieldDescriptor::new("credit_card_expiry", |ctx| {
                    text(financial::credit_card_expire(ctx.now.date(), ctx.rng))
                }),
                FieldDescriptor::new("user_agent", |ctx| text(network::user_agent(ctx.rng))),
                FieldDescriptor::new("ip_address", |ctx| text(network::ipv4(ctx.rng))),
                FieldDescriptor::new("job_title", |ctx| text(identity::job(ctx.rng))),
                FieldDescriptor::new("company", |ctx| text(identity::company(ctx.rng))),
                FieldDescriptor::new("ssn", |ctx| text(identity::ssn(ctx.rng))),
                FieldDescriptor::new("preferred_language", |ctx| {
                    text(identity::language_name(ctx.rng))
                }),
                FieldDescriptor::new("account_status", |ctx| ctx.choose(ACCOUNT_STATUSES)),
                FieldDescriptor::new("loyalty_points", |ctx| ctx.int_between(0, 10_000)),
                FieldDescriptor::new("customer_segment", |ctx| ctx.choose(SEGMENTS)),
            ],
        }
    }
}

impl EntityGenerator for CustomerGenerator {
    fn kind(&self) -> EntityKind {
        EntityKind::Customer
    }

    fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

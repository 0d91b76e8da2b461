use chrono::Duration;
use rand::Rng;

use datasynth_core::{GeneratedValue, round_to};

use super::{CURRENCIES, EntityGenerator, EntityKind};
use crate::fields::{FieldContext, FieldDescriptor, text};
use crate::providers::{self, geo, network, pattern, temporal};
use crate::references::ReferenceRole;

const PAYMENT_METHODS: &[&str] = &[
    "Credit Card",
    "Debit Card",
    "PayPal",
    "Bank Transfer",
    "Cash",
    "Check",
    "Cryptocurrency",
    "Gift Card",
    "Store Credit",
    "Mobile Payment",
];
const TRANSACTION_TYPES: &[&str] = &[
    "Purchase",
    "Refund",
    "Exchange",
    "Subscription",
    "Renewal",
    "Cancellation",
    "Upgrade",
    "Downgrade",
    "Chargeback",
    "Adjustment",
];
const TRANSACTION_STATUSES: &[&str] = &[
    "Completed",
    "Pending",
    "Failed",
    "Cancelled",
    "Refunded",
    "Partially Refunded",
    "Disputed",
    "Processing",
    "On Hold",
    "Authorized",
];
const SHIPPING_METHODS: &[&str] = &[
    "Standard",
    "Express",
    "Next Day",
    "Two-Day",
    "International",
    "Local Pickup",
    "Digital Delivery",
    "Freight",
    "Same Day",
    "Economy",
];
const PAYMENT_STATUSES: &[&str] = &["Paid", "Pending", "Failed", "Refunded", "Partially Refunded"];
const CARD_TYPES: &[&str] = &["Visa", "Mastercard", "American Express", "Discover", "JCB"];
const SOURCES: &[&str] = &[
    "Website",
    "Mobile App",
    "In-Store",
    "Phone",
    "Email",
    "Social Media",
];

/// Longest gap between a transaction and its estimated delivery.
pub const MAX_DELIVERY_DAYS: i64 = 14;

pub const REFERENCE_ROLES: &[ReferenceRole] = &[
    ReferenceRole::new("customers", "customer_id", "customer_id"),
    ReferenceRole::new("products", "product_id", "product_id"),
    ReferenceRole::new("companies", "company_id", "company_id"),
];

/// Monetary components summed into `total`; discount is subtracted.
pub const TOTAL_ADDITIVE: &[&str] = &["amount", "tax", "shipping_cost"];
pub const TOTAL_SUBTRACTIVE: &[&str] = &["discount"];

/// Purchases that can reference previously generated customers, products and companies.
#[derive(Debug)]
pub struct TransactionGenerator {
    fields: Vec<FieldDescriptor>,
}

impl Default for TransactionGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionGenerator {
    pub fn new() -> Self {
        Self {
            fields: vec![
                FieldDescriptor::new("transaction_id", |ctx| ctx.uuid()),
                FieldDescriptor::new("order_id", |ctx| {
                    text(pattern::numerify("ORD-######", ctx.rng))
                }),
                FieldDescriptor::new("invoice_id", |ctx| {
                    text(pattern::numerify("INV-######", ctx.rng))
                }),
                FieldDescriptor::new("customer_id", |ctx| ctx.reference_or_uuid("customer_id")),
                FieldDescriptor::new("product_id", |ctx| ctx.reference_or_uuid("product_id")),
                FieldDescriptor::new("company_id", |ctx| ctx.reference_or_uuid("company_id")),
                FieldDescriptor::new("transaction_date", |ctx| {
                    GeneratedValue::Timestamp(temporal::within_last_days(ctx.now, 365, ctx.rng))
                }),
                FieldDescriptor::new("transaction_type", |ctx| ctx.choose(TRANSACTION_TYPES)),
                FieldDescriptor::new("transaction_status", |ctx| ctx.choose(TRANSACTION_STATUSES)),
                FieldDescriptor::new("amount", |ctx| ctx.money(1.0, 1000.0)),
                FieldDescriptor::derived(
                    "tax",
                    "amount",
                    |amount, ctx| match amount.as_f64() {
                        Some(amount) => ctx.scaled(amount, 0.05, 0.25),
                        None => ctx.money(0.1, 100.0),
                    },
                    |ctx| ctx.money(0.1, 100.0),
                ),
                FieldDescriptor::new("shipping_cost", |ctx| ctx.money(0.0, 50.0)),
                FieldDescriptor::derived(
                    "discount",
                    "amount",
                    |amount, ctx| match amount.as_f64() {
                        Some(amount) => ctx.scaled(amount, 0.0, 0.3),
                        None => ctx.money(0.0, 100.0),
                    },
                    |ctx| ctx.money(0.0, 100.0),
                ),
                FieldDescriptor::new("total", total),
                FieldDescriptor::new("currency", |ctx| ctx.choose(CURRENCIES)),
                FieldDescriptor::new("payment_method", |ctx| ctx.choose(PAYMENT_METHODS)),
                FieldDescriptor::new("payment_status", |ctx| ctx.choose(PAYMENT_STATUSES)),
                FieldDescriptor::new("card_type", |ctx| ctx.choose(CARD_TYPES)),
                FieldDescriptor::new("card_last_four", |ctx| {
                    text(pattern::numerify("####", ctx.rng))
                }),
                FieldDescriptor::new("shipping_method", |ctx| ctx.choose(SHIPPING_METHODS)),
                FieldDescriptor::new("shipping_address", |ctx| {
                    text(geo::street_address(ctx.rng))
                }),
                FieldDescriptor::new("shipping_city", |ctx| text(geo::city(ctx.rng))),
                FieldDescriptor::new("shipping_state", |ctx| text(geo::state(ctx.rng))),
                FieldDescriptor::new("shipping_zipcode", |ctx| text(geo::zipcode(ctx.rng))),
                FieldDescriptor::new("shipping_country", |ctx| text(geo::country(ctx.rng))),
                FieldDescriptor::new("tracking_number", |ctx| {
                    text(pattern::numerify("TRK-############", ctx.rng))
                }),
                FieldDescriptor::derived(
                    "estimated_delivery",
                    "transaction_date",
                    |placed, ctx| match placed.as_date() {
                        Some(placed) => {
                            let days = ctx.rng.random_range(1..=MAX_DELIVERY_DAYS);
                            GeneratedValue::Date(placed + Duration::days(days))
                        }
                        None => delivery_window(ctx),
                    },
                    delivery_window,
                ),
                FieldDescriptor::new("notes", |ctx| {
                    text(providers::text::text(100, ctx.rng))
                }),
                FieldDescriptor::new("is_gift", |ctx| {
                    GeneratedValue::Bool(ctx.chance(ctx.probabilities.is_gift))
                }),
                FieldDescriptor::derived(
                    "gift_message",
                    "is_gift",
                    |is_gift, ctx| {
                        if is_gift.as_bool().unwrap_or(false) {
                            gift_message(ctx)
                        } else {
                            GeneratedValue::Null
                        }
                    },
                    |ctx| {
                        if ctx.chance(ctx.probabilities.gift_message_without_flag) {
                            gift_message(ctx)
                        } else {
                            GeneratedValue::Null
                        }
                    },
                ),
                FieldDescriptor::new("source", |ctx| ctx.choose(SOURCES)),
                FieldDescriptor::new("ip_address", |ctx| text(network::ipv4(ctx.rng))),
                FieldDescriptor::new("user_agent", |ctx| text(network::user_agent(ctx.rng))),
                FieldDescriptor::new("coupon_code", |ctx| {
                    if ctx.chance(ctx.probabilities.coupon_code) {
                        text(pattern::bothify("???###", ctx.rng).to_uppercase())
                    } else {
                        GeneratedValue::Null
                    }
                }),
            ],
        }
    }
}

impl EntityGenerator for TransactionGenerator {
    fn kind(&self) -> EntityKind {
        EntityKind::Transaction
    }

    fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    fn reference_roles(&self) -> &[ReferenceRole] {
        REFERENCE_ROLES
    }
}

/// Sum of whichever monetary components are in the row, floored at zero.
fn total(ctx: &mut FieldContext<'_>) -> GeneratedValue {
    let added: f64 = TOTAL_ADDITIVE.iter().filter_map(|field| ctx.number(field)).sum();
    let removed: f64 = TOTAL_SUBTRACTIVE
        .iter()
        .filter_map(|field| ctx.number(field))
        .sum();
    GeneratedValue::Float(round_to((added - removed).max(0.0), 2))
}

/// Today through two weeks out.
fn delivery_window(ctx: &mut FieldContext<'_>) -> GeneratedValue {
    let today = ctx.now.date();
    GeneratedValue::Date(temporal::date_between(
        today,
        today + Duration::days(MAX_DELIVERY_DAYS),
        ctx.rng,
    ))
}

fn gift_message(ctx: &mut FieldContext<'_>) -> GeneratedValue {
    text(providers::text::text(50, ctx.rng))
}

use chrono::Duration;
use rand::Rng;

use datasynth_core::{GeneratedValue, round_to};

use super::{CURRENCIES, EntityGenerator, EntityKind};
use crate::fields::{FieldContext, FieldDescriptor, text};
use crate::providers::{self, geo, identity, pattern, temporal};

pub const CATEGORIES: &[&str] = &[
    "Electronics",
    "Clothing",
    "Home & Kitchen",
    "Books",
    "Toys & Games",
    "Sports & Outdoors",
    "Beauty & Personal Care",
    "Health & Household",
    "Automotive",
    "Office Products",
    "Pet Supplies",
    "Grocery",
    "Tools & Home Improvement",
];

/// Used when the category is absent or has no entry in [`subcategories`].
pub const FALLBACK_SUBCATEGORIES: &[&str] = &["Subcategory 1", "Subcategory 2", "Subcategory 3"];

const CONDITIONS: &[&str] = &[
    "New",
    "Used - Like New",
    "Used - Good",
    "Used - Fair",
    "Refurbished",
];
const AVAILABILITY: &[&str] = &[
    "In Stock",
    "Out of Stock",
    "Pre-order",
    "Discontinued",
    "Limited Stock",
];
const WEIGHT_UNITS: &[&str] = &["kg", "g", "lb", "oz"];
const DIMENSION_UNITS: &[&str] = &["cm", "mm", "in"];

pub fn subcategories(category: &str) -> Option<&'static [&'static str]> {
    let options: &'static [&'static str] = match category {
        "Electronics" => &["Smartphones", "Laptops", "Tablets", "Cameras", "Audio", "Wearables"],
        "Clothing" => &["Men's", "Women's", "Children's", "Shoes", "Accessories", "Activewear"],
        "Home & Kitchen" => &["Furniture", "Appliances", "Cookware", "Bedding", "Decor", "Storage"],
        "Books" => &[
            "Fiction",
            "Non-fiction",
            "Children's Books",
            "Textbooks",
            "Comics",
            "Magazines",
        ],
        "Toys & Games" => &[
            "Board Games",
            "Puzzles",
            "Action Figures",
            "Dolls",
            "Educational",
            "Outdoor Play",
        ],
        "Sports & Outdoors" => &[
            "Fitness",
            "Camping",
            "Cycling",
            "Team Sports",
            "Water Sports",
            "Winter Sports",
        ],
        "Beauty & Personal Care" => &[
            "Skincare",
            "Haircare",
            "Makeup",
            "Fragrance",
            "Bath & Body",
            "Men's Grooming",
        ],
        "Health & Household" => &[
            "Vitamins",
            "First Aid",
            "Household Supplies",
            "Personal Care",
            "Baby & Child Care",
        ],
        "Automotive" => &[
            "Interior",
            "Exterior",
            "Tools & Equipment",
            "Parts & Accessories",
            "Electronics",
        ],
        "Office Products" => &[
            "Writing Supplies",
            "Paper Products",
            "Office Furniture",
            "Office Electronics",
        ],
        "Pet Supplies" => &["Dog", "Cat", "Fish", "Bird", "Small Animal", "Reptile"],
        "Grocery" => &["Beverages", "Snacks", "Canned Goods", "Baking", "Dairy", "Produce"],
        "Tools & Home Improvement" => &[
            "Power Tools",
            "Hand Tools",
            "Hardware",
            "Electrical",
            "Plumbing",
        ],
        _ => return None,
    };
    Some(options)
}

/// Catalog items with pricing, inventory and supplier details.
#[derive(Debug)]
pub struct ProductGenerator {
    fields: Vec<FieldDescriptor>,
}

impl Default for ProductGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductGenerator {
    pub fn new() -> Self {
        Self {
            fields: vec![
                FieldDescriptor::new("product_id", |ctx| ctx.uuid()),
                FieldDescriptor::new("product_name", |ctx| text(identity::catch_phrase(ctx.rng))),
                FieldDescriptor::new("description", |ctx| {
                    text(providers::text::paragraph(3, ctx.rng))
                }),
                FieldDescriptor::new("category", |ctx| ctx.choose(CATEGORIES)),
                FieldDescriptor::derived(
                    "subcategory",
                    "category",
                    |category, ctx| {
                        match category.as_str().and_then(subcategories) {
                            Some(options) => ctx.choose(options),
                            None => ctx.choose(FALLBACK_SUBCATEGORIES),
                        }
                    },
                    |ctx| ctx.choose(FALLBACK_SUBCATEGORIES),
                ),
                FieldDescriptor::new("price", |ctx| ctx.money(1.99, 999.99)),
                FieldDescriptor::derived(
                    "cost",
                    "price",
                    |price, ctx| match price.as_f64() {
                        Some(price) => ctx.scaled(price, 0.4, 0.8),
                        None => ctx.money(0.99, 799.99),
                    },
                    |ctx| ctx.money(0.99, 799.99),
                ),
                FieldDescriptor::new("currency", |ctx| ctx.choose(CURRENCIES)),
                FieldDescriptor::new("discount_percentage", |ctx| ctx.money(0.0, 50.0)),
                FieldDescriptor::new("tax_rate", |ctx| ctx.money(0.0, 25.0)),
                FieldDescriptor::new("sku", |ctx| {
                    text(pattern::bothify("??-####-????", ctx.rng).to_uppercase())
                }),
                FieldDescriptor::new("barcode", |ctx| text(pattern::ean(13, ctx.rng))),
                FieldDescriptor::new("stock_quantity", |ctx| ctx.int_between(0, 1000)),
                FieldDescriptor::new("availability", |ctx| ctx.choose(AVAILABILITY)),
                FieldDescriptor::new("condition", |ctx| ctx.choose(CONDITIONS)),
                FieldDescriptor::new("weight", |ctx| ctx.money(0.1, 50.0)),
                FieldDescriptor::new("weight_unit", |ctx| ctx.choose(WEIGHT_UNITS)),
                FieldDescriptor::new("dimensions", dimensions),
                FieldDescriptor::new("dimensions_unit", |ctx| ctx.choose(DIMENSION_UNITS)),
                FieldDescriptor::new("supplier_id", |ctx| ctx.uuid()),
                FieldDescriptor::new("supplier_name", |ctx| text(identity::company(ctx.rng))),
                FieldDescriptor::new("manufacturer", |ctx| text(identity::company(ctx.rng))),
                FieldDescriptor::new("country_of_origin", |ctx| text(geo::country(ctx.rng))),
                FieldDescriptor::new("created_date", |ctx| {
                    GeneratedValue::Timestamp(temporal::within_last_days(ctx.now, 2 * 365, ctx.rng))
                }),
                FieldDescriptor::derived(
                    "modified_date",
                    "created_date",
                    |created, ctx| {
                        let start = created
                            .as_timestamp()
                            .unwrap_or(ctx.now - Duration::days(365));
                        let modified = temporal::timestamp_between(start, ctx.now, ctx.rng);
                        GeneratedValue::Timestamp(modified)
                    },
                    |ctx| {
                        GeneratedValue::Timestamp(temporal::within_last_days(ctx.now, 365, ctx.rng))
                    },
                ),
                FieldDescriptor::new("is_featured", |ctx| ctx.flip()),
                FieldDescriptor::new("is_active", |ctx| ctx.flip()),
                FieldDescriptor::new("rating", |ctx| {
                    GeneratedValue::Float(round_to(ctx.rng.random_range(1.0..=5.0), 1))
                }),
                FieldDescriptor::new("review_count", |ctx| ctx.int_between(0, 1000)),
                FieldDescriptor::new("tags", tags),
                FieldDescriptor::new("image_url", |ctx| {
                    let id = identity::uuid4(ctx.rng);
                    text(format!("https://example.com/images/products/{id}.jpg"))
                }),
            ],
        }
    }
}

impl EntityGenerator for ProductGenerator {
    fn kind(&self) -> EntityKind {
        EntityKind::Product
    }

    fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

fn dimensions(ctx: &mut FieldContext<'_>) -> GeneratedValue {
    let [a, b, c]: [u32; 3] = std::array::from_fn(|_| ctx.rng.random_range(1..=100));
    text(format!("{a}x{b}x{c}"))
}

fn tags(ctx: &mut FieldContext<'_>) -> GeneratedValue {
    let count = ctx.rng.random_range(1..=5);
    let words: Vec<String> = (0..count)
        .map(|_| providers::text::word(ctx.rng))
        .collect();
    text(words.join(", "))
}

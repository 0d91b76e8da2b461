//! Built-in entity generators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;
use crate::fields::FieldDescriptor;
use crate::references::ReferenceRole;

pub mod company;
pub mod customer;
pub mod product;
pub mod transaction;

pub use company::CompanyGenerator;
pub use customer::CustomerGenerator;
pub use product::ProductGenerator;
pub use transaction::TransactionGenerator;

pub const CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "CAD", "AUD", "JPY"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Customer,
    Product,
    Company,
    Transaction,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Customer,
        EntityKind::Product,
        EntityKind::Company,
        EntityKind::Transaction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Customer => "customer",
            EntityKind::Product => "product",
            EntityKind::Company => "company",
            EntityKind::Transaction => "transaction",
        }
    }

    /// Table name used when the caller does not pick one.
    pub fn default_table(self) -> &'static str {
        match self {
            EntityKind::Customer => "customers",
            EntityKind::Product => "products",
            EntityKind::Company => "companies",
            EntityKind::Transaction => "transactions",
        }
    }

    pub fn generator(self) -> Box<dyn EntityGenerator> {
        match self {
            EntityKind::Customer => Box::new(CustomerGenerator::new()),
            EntityKind::Product => Box::new(ProductGenerator::new()),
            EntityKind::Company => Box::new(CompanyGenerator::new()),
            EntityKind::Transaction => Box::new(TransactionGenerator::new()),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = GenerationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "customer" | "customers" => Ok(EntityKind::Customer),
            "product" | "products" => Ok(EntityKind::Product),
            "company" | "companies" => Ok(EntityKind::Company),
            "transaction" | "transactions" => Ok(EntityKind::Transaction),
            other => Err(GenerationError::InvalidRequest(format!(
                "unknown entity '{other}'"
            ))),
        }
    }
}

/// Produces rows for one built-in entity from a fixed, ordered field catalog.
pub trait EntityGenerator {
    fn kind(&self) -> EntityKind;

    /// Descriptors in generation order; dependencies always point backwards.
    fn fields(&self) -> &[FieldDescriptor];

    fn reference_roles(&self) -> &[ReferenceRole] {
        &[]
    }

    fn field_names(&self) -> Vec<&'static str> {
        self.fields().iter().map(|field| field.name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::validate_order;

    #[test]
    fn catalogs_are_topologically_ordered() {
        for kind in EntityKind::ALL {
            let generator = kind.generator();
            assert_eq!(generator.kind(), kind);
            validate_order(generator.fields()).expect("valid order");
        }
    }

    #[test]
    fn parses_singular_and_plural_names() {
        assert_eq!("companies".parse::<EntityKind>().ok(), Some(EntityKind::Company));
        assert_eq!("Customer".parse::<EntityKind>().ok(), Some(EntityKind::Customer));
        assert!("invoices".parse::<EntityKind>().is_err());
    }
}

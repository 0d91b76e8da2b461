use fake::Fake;
use fake::faker::company::en::{
    Bs, Buzzword, BuzzwordMiddle, BuzzwordTail, CompanyName, CompanySuffix, Industry,
};
use fake::faker::internet::en::Username;
use fake::faker::job::en::Title as JobTitle;
use fake::faker::name::en::{FirstName, LastName, Name, Suffix, Title};
use rand::RngCore;
use rand::seq::IndexedRandom;

use datasynth_core::GeneratedValue;

use super::pattern::numerify;
use super::{ProviderCategory, ProviderEntry, ProviderRegistry};

const LANGUAGES: &[&str] = &[
    "English", "Spanish", "French", "German", "Italian", "Portuguese", "Dutch", "Swedish",
    "Polish", "Russian", "Japanese", "Korean", "Mandarin", "Hindi", "Arabic", "Turkish",
];

pub fn register(registry: &mut ProviderRegistry) {
    use ProviderCategory::Identity;

    registry.register(ProviderEntry::new(
        "first_name",
        Identity,
        "Random given name.",
        |_, _, rng| Ok(GeneratedValue::Text(first_name(rng))),
    ));
    registry.register(ProviderEntry::new(
        "last_name",
        Identity,
        "Random family name.",
        |_, _, rng| Ok(GeneratedValue::Text(last_name(rng))),
    ));
    registry.register(ProviderEntry::new(
        "name",
        Identity,
        "Random full name.",
        |_, _, rng| Ok(GeneratedValue::Text(name(rng))),
    ));
    registry.register(ProviderEntry::new(
        "prefix",
        Identity,
        "Name prefix such as 'Mr.' or 'Dr.'.",
        |_, _, rng| Ok(GeneratedValue::Text(Title().fake_with_rng(rng))),
    ));
    registry.register(ProviderEntry::new(
        "suffix",
        Identity,
        "Name suffix such as 'Jr.'.",
        |_, _, rng| Ok(GeneratedValue::Text(Suffix().fake_with_rng(rng))),
    ));
    registry.register(ProviderEntry::new(
        "job",
        Identity,
        "Job title.",
        |_, _, rng| Ok(GeneratedValue::Text(job(rng))),
    ));
    registry.register(ProviderEntry::new(
        "company",
        Identity,
        "Company name.",
        |_, _, rng| Ok(GeneratedValue::Text(company(rng))),
    ));
    registry.register(ProviderEntry::new(
        "company_suffix",
        Identity,
        "Company suffix such as 'LLC'.",
        |_, _, rng| Ok(GeneratedValue::Text(CompanySuffix().fake_with_rng(rng))),
    ));
    registry.register(ProviderEntry::new(
        "catch_phrase",
        Identity,
        "Marketing catch phrase built from three buzzwords.",
        |_, _, rng| Ok(GeneratedValue::Text(catch_phrase(rng))),
    ));
    registry.register(ProviderEntry::new(
        "bs",
        Identity,
        "Business-speak phrase.",
        |_, _, rng| Ok(GeneratedValue::Text(bs(rng))),
    ));
    registry.register(ProviderEntry::new(
        "industry",
        Identity,
        "Industry name.",
        |_, _, rng| Ok(GeneratedValue::Text(Industry().fake_with_rng(rng))),
    ));
    registry.register(ProviderEntry::new(
        "user_name",
        Identity,
        "Login-style user name.",
        |_, _, rng| Ok(GeneratedValue::Text(user_name(rng))),
    ));
    registry.register(ProviderEntry::new(
        "uuid4",
        Identity,
        "Random version 4 UUID in canonical hyphenated form.",
        |_, _, rng| Ok(GeneratedValue::Text(uuid4(rng))),
    ));
    registry.register(ProviderEntry::new(
        "ssn",
        Identity,
        "US social security number (###-##-####).",
        |_, _, rng| Ok(GeneratedValue::Text(ssn(rng))),
    ));
    registry.register(ProviderEntry::new(
        "language_name",
        Identity,
        "Spoken language name.",
        |_, _, rng| Ok(GeneratedValue::Text(language_name(rng))),
    ));
}

pub fn first_name(rng: &mut dyn RngCore) -> String {
    FirstName().fake_with_rng(rng)
}

pub fn last_name(rng: &mut dyn RngCore) -> String {
    LastName().fake_with_rng(rng)
}

pub fn name(rng: &mut dyn RngCore) -> String {
    Name().fake_with_rng(rng)
}

pub fn job(rng: &mut dyn RngCore) -> String {
    JobTitle().fake_with_rng(rng)
}

pub fn company(rng: &mut dyn RngCore) -> String {
    CompanyName().fake_with_rng(rng)
}

pub fn catch_phrase(rng: &mut dyn RngCore) -> String {
    let head: String = Buzzword().fake_with_rng(rng);
    let middle: String = BuzzwordMiddle().fake_with_rng(rng);
    let tail: String = BuzzwordTail().fake_with_rng(rng);
    format!("{head} {middle} {tail}")
}

pub fn bs(rng: &mut dyn RngCore) -> String {
    Bs().fake_with_rng(rng)
}

pub fn user_name(rng: &mut dyn RngCore) -> String {
    Username().fake_with_rng(rng)
}

pub fn uuid4(rng: &mut dyn RngCore) -> String {
    let mut bytes = [0_u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string()
}

pub fn ssn(rng: &mut dyn RngCore) -> String {
    numerify("###-##-####", rng)
}

pub fn language_name(rng: &mut dyn RngCore) -> String {
    LANGUAGES.choose(rng).copied().unwrap_or("English").to_string()
}

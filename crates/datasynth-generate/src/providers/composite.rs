use std::collections::BTreeMap;

use rand::seq::IndexedRandom;
use rand::RngCore;

use datasynth_core::GeneratedValue;

use super::{ProviderCategory, ProviderEntry, ProviderRegistry, contact, geo, identity, temporal};

pub fn register(registry: &mut ProviderRegistry) {
    use ProviderCategory::Composite;

    registry.register(ProviderEntry::new(
        "social_media",
        Composite,
        "Facebook, Twitter and LinkedIn profile URLs for one handle.",
        |_, _, rng| Ok(GeneratedValue::Map(social_media(rng))),
    ));
    registry.register(ProviderEntry::new(
        "simple_profile",
        Composite,
        "Username, name, sex, mail, address and birthdate of one person.",
        |ctx, _, rng| {
            let mut profile = BTreeMap::new();
            profile.insert("username".to_string(), identity::user_name(rng));
            profile.insert("name".to_string(), identity::name(rng));
            let sex = ["M", "F"].choose(rng).copied().unwrap_or("F");
            profile.insert("sex".to_string(), sex.to_string());
            profile.insert("mail".to_string(), contact::email(rng));
            profile.insert("address".to_string(), geo::address(rng));
            let birthdate = temporal::date_of_birth(ctx.now.date(), 0, 115, rng)
                .map(|date| date.to_string())
                .unwrap_or_default();
            profile.insert("birthdate".to_string(), birthdate);
            Ok(GeneratedValue::Map(profile))
        },
    ));
    registry.register(ProviderEntry::new(
        "location_on_land",
        Composite,
        "Coordinates together with a city and country name.",
        |_, _, rng| {
            let mut location = BTreeMap::new();
            location.insert("latitude".to_string(), geo::latitude(rng).to_string());
            location.insert("longitude".to_string(), geo::longitude(rng).to_string());
            location.insert("city".to_string(), geo::city(rng));
            location.insert("country".to_string(), geo::country(rng));
            Ok(GeneratedValue::Map(location))
        },
    ));
}

/// One slug shared by the three networks.
pub fn social_media(rng: &mut dyn RngCore) -> BTreeMap<String, String> {
    let handle = identity::user_name(rng).to_lowercase().replace(' ', "");
    BTreeMap::from([
        (
            "facebook".to_string(),
            format!("https://facebook.com/{handle}"),
        ),
        ("twitter".to_string(), format!("https://twitter.com/{handle}")),
        (
            "linkedin".to_string(),
            format!("https://linkedin.com/company/{handle}"),
        ),
    ])
}

use fake::Fake;
use fake::faker::address::en::{
    BuildingNumber, CityName, CountryCode, CountryName, SecondaryAddress, StateAbbr, StateName,
    StreetName, TimeZone, ZipCode,
};
use rand::{Rng, RngCore};

use datasynth_core::{GeneratedValue, round_to};

use super::{ProviderCategory, ProviderEntry, ProviderRegistry};

pub fn register(registry: &mut ProviderRegistry) {
    use ProviderCategory::Geo;

    registry.register(ProviderEntry::new(
        "street_address",
        Geo,
        "Building number and street name.",
        |_, _, rng| Ok(GeneratedValue::Text(street_address(rng))),
    ));
    registry.register(ProviderEntry::new(
        "secondary_address",
        Geo,
        "Apartment or suite designator.",
        |_, _, rng| Ok(GeneratedValue::Text(SecondaryAddress().fake_with_rng(rng))),
    ));
    registry.register(ProviderEntry::new(
        "address",
        Geo,
        "Single-line postal address.",
        |_, _, rng| Ok(GeneratedValue::Text(address(rng))),
    ));
    registry.register(ProviderEntry::new(
        "city",
        Geo,
        "City name.",
        |_, _, rng| Ok(GeneratedValue::Text(city(rng))),
    ));
    registry.register(ProviderEntry::new(
        "state",
        Geo,
        "State name.",
        |_, _, rng| Ok(GeneratedValue::Text(state(rng))),
    ));
    registry.register(ProviderEntry::new(
        "state_abbr",
        Geo,
        "Two-letter state abbreviation.",
        |_, _, rng| Ok(GeneratedValue::Text(StateAbbr().fake_with_rng(rng))),
    ));
    registry.register(ProviderEntry::new(
        "zipcode",
        Geo,
        "Postal code.",
        |_, _, rng| Ok(GeneratedValue::Text(zipcode(rng))),
    ));
    registry.register(ProviderEntry::new(
        "country",
        Geo,
        "Country name.",
        |_, _, rng| Ok(GeneratedValue::Text(country(rng))),
    ));
    registry.register(ProviderEntry::new(
        "country_code",
        Geo,
        "ISO 3166 alpha-2 country code.",
        |_, _, rng| Ok(GeneratedValue::Text(CountryCode().fake_with_rng(rng))),
    ));
    registry.register(ProviderEntry::new(
        "latitude",
        Geo,
        "Latitude in decimal degrees (6 places).",
        |_, _, rng| Ok(GeneratedValue::Float(latitude(rng))),
    ));
    registry.register(ProviderEntry::new(
        "longitude",
        Geo,
        "Longitude in decimal degrees (6 places).",
        |_, _, rng| Ok(GeneratedValue::Float(longitude(rng))),
    ));
    registry.register(ProviderEntry::new(
        "timezone",
        Geo,
        "IANA time zone name.",
        |_, _, rng| Ok(GeneratedValue::Text(TimeZone().fake_with_rng(rng))),
    ));
}

pub fn street_address(rng: &mut dyn RngCore) -> String {
    let number: String = BuildingNumber().fake_with_rng(rng);
    let street: String = StreetName().fake_with_rng(rng);
    format!("{number} {street}")
}

pub fn address(rng: &mut dyn RngCore) -> String {
    let street = street_address(rng);
    let city = city(rng);
    let state: String = StateAbbr().fake_with_rng(rng);
    let zip = zipcode(rng);
    format!("{street}, {city}, {state} {zip}")
}

pub fn city(rng: &mut dyn RngCore) -> String {
    CityName().fake_with_rng(rng)
}

pub fn state(rng: &mut dyn RngCore) -> String {
    StateName().fake_with_rng(rng)
}

pub fn zipcode(rng: &mut dyn RngCore) -> String {
    ZipCode().fake_with_rng(rng)
}

pub fn country(rng: &mut dyn RngCore) -> String {
    CountryName().fake_with_rng(rng)
}

pub fn latitude(rng: &mut dyn RngCore) -> f64 {
    round_to(rng.random_range(-90.0..=90.0), 6)
}

pub fn longitude(rng: &mut dyn RngCore) -> f64 {
    round_to(rng.random_range(-180.0..=180.0), 6)
}

use fake::Fake;
use fake::faker::internet::en::{DomainSuffix, IPv4, IPv6, MACAddress, UserAgent};
use fake::faker::lorem::en::Word;
use rand::{Rng, RngCore};

use datasynth_core::GeneratedValue;

use super::{ProviderCategory, ProviderEntry, ProviderRegistry, provider_error};
use crate::params::{ParamKind, ParamSpec};

const IMAGE_PARAMS: &[ParamSpec] = &[
    ParamSpec::optional("width", ParamKind::Int),
    ParamSpec::optional("height", ParamKind::Int),
];

pub fn register(registry: &mut ProviderRegistry) {
    use ProviderCategory::Network;

    registry.register(ProviderEntry::new(
        "ipv4",
        Network,
        "IPv4 address in dotted notation.",
        |_, _, rng| Ok(GeneratedValue::Text(ipv4(rng))),
    ));
    registry.register(ProviderEntry::new(
        "ipv6",
        Network,
        "IPv6 address.",
        |_, _, rng| Ok(GeneratedValue::Text(IPv6().fake_with_rng(rng))),
    ));
    registry.register(ProviderEntry::new(
        "mac_address",
        Network,
        "MAC address as six colon-separated octets.",
        |_, _, rng| Ok(GeneratedValue::Text(MACAddress().fake_with_rng(rng))),
    ));
    registry.register(ProviderEntry::new(
        "user_agent",
        Network,
        "Browser user-agent string.",
        |_, _, rng| Ok(GeneratedValue::Text(user_agent(rng))),
    ));
    registry.register(ProviderEntry::new(
        "domain_name",
        Network,
        "Second-level domain with a public suffix.",
        |_, _, rng| Ok(GeneratedValue::Text(domain_name(rng))),
    ));
    registry.register(ProviderEntry::new(
        "url",
        Network,
        "HTTPS URL on a random domain.",
        |_, _, rng| Ok(GeneratedValue::Text(url(rng))),
    ));
    registry.register(
        ProviderEntry::new(
            "image_url",
            Network,
            "Placeholder image URL of `width` x `height` pixels (random when omitted).",
            |_, params, rng| {
                let width = params.get_i64("width");
                let height = params.get_i64("height");
                if width.is_some_and(|w| w <= 0) || height.is_some_and(|h| h <= 0) {
                    return Err(provider_error("image_url", "dimensions must be positive"));
                }
                let width = width.unwrap_or_else(|| rng.random_range(100..=1024));
                let height = height.unwrap_or_else(|| rng.random_range(100..=1024));
                Ok(GeneratedValue::Text(image_url_sized(width, height)))
            },
        )
        .with_params(IMAGE_PARAMS),
    );
}

pub fn ipv4(rng: &mut dyn RngCore) -> String {
    IPv4().fake_with_rng(rng)
}

pub fn user_agent(rng: &mut dyn RngCore) -> String {
    UserAgent().fake_with_rng(rng)
}

pub fn domain_name(rng: &mut dyn RngCore) -> String {
    let word: String = Word().fake_with_rng(rng);
    let suffix: String = DomainSuffix().fake_with_rng(rng);
    format!("{}.{suffix}", word.to_lowercase())
}

pub fn url(rng: &mut dyn RngCore) -> String {
    format!("https://www.{}/", domain_name(rng))
}

pub fn image_url(rng: &mut dyn RngCore) -> String {
    let width = rng.random_range(100..=1024);
    let height = rng.random_range(100..=1024);
    image_url_sized(width, height)
}

fn image_url_sized(width: i64, height: i64) -> String {
    format!("https://dummyimage.com/{width}x{height}")
}

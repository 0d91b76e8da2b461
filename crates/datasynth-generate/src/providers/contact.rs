use fake::Fake;
use fake::faker::internet::en::{FreeEmail, FreeEmailProvider, SafeEmail};
use fake::faker::phone_number::en::{CellNumber, PhoneNumber};
use rand::RngCore;

use datasynth_core::GeneratedValue;

use super::pattern::numerify;
use super::{ProviderCategory, ProviderEntry, ProviderRegistry};

pub fn register(registry: &mut ProviderRegistry) {
    use ProviderCategory::Contact;

    registry.register(ProviderEntry::new(
        "email",
        Contact,
        "Email address on a safe example domain.",
        |_, _, rng| Ok(GeneratedValue::Text(email(rng))),
    ));
    registry.register(ProviderEntry::new(
        "free_email",
        Contact,
        "Email address on a free webmail domain.",
        |_, _, rng| Ok(GeneratedValue::Text(FreeEmail().fake_with_rng(rng))),
    ));
    registry.register(ProviderEntry::new(
        "free_email_domain",
        Contact,
        "Free webmail domain such as 'gmail.com'.",
        |_, _, rng| Ok(GeneratedValue::Text(FreeEmailProvider().fake_with_rng(rng))),
    ));
    registry.register(ProviderEntry::new(
        "phone_number",
        Contact,
        "Landline phone number.",
        |_, _, rng| Ok(GeneratedValue::Text(phone_number(rng))),
    ));
    registry.register(ProviderEntry::new(
        "cell_phone",
        Contact,
        "Mobile phone number.",
        |_, _, rng| Ok(GeneratedValue::Text(CellNumber().fake_with_rng(rng))),
    ));
    registry.register(ProviderEntry::new(
        "fax_number",
        Contact,
        "Fax number in +1-###-###-#### form.",
        |_, _, rng| Ok(GeneratedValue::Text(fax_number(rng))),
    ));
}

pub fn email(rng: &mut dyn RngCore) -> String {
    SafeEmail().fake_with_rng(rng)
}

pub fn phone_number(rng: &mut dyn RngCore) -> String {
    PhoneNumber().fake_with_rng(rng)
}

pub fn fax_number(rng: &mut dyn RngCore) -> String {
    numerify("+1-###-###-####", rng)
}

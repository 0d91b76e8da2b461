use fake::Fake;
use fake::faker::lorem::en::{Paragraph, Sentence, Word, Words};
use rand::RngCore;

use datasynth_core::GeneratedValue;

use super::{ProviderCategory, ProviderEntry, ProviderRegistry, provider_error};
use crate::params::{ParamKind, ParamSpec};

const WORDS_PARAMS: &[ParamSpec] = &[ParamSpec::optional("nb", ParamKind::Int)];
const SENTENCE_PARAMS: &[ParamSpec] = &[ParamSpec::optional("nb_words", ParamKind::Int)];
const PARAGRAPH_PARAMS: &[ParamSpec] = &[ParamSpec::optional("nb_sentences", ParamKind::Int)];
const TEXT_PARAMS: &[ParamSpec] = &[ParamSpec::optional("max_nb_chars", ParamKind::Int)];

pub fn register(registry: &mut ProviderRegistry) {
    use ProviderCategory::Text;

    registry.register(ProviderEntry::new(
        "word",
        Text,
        "Single lorem word.",
        |_, _, rng| Ok(GeneratedValue::Text(word(rng))),
    ));
    registry.register(
        ProviderEntry::new(
            "words",
            Text,
            "`nb` (default 3) lorem words separated by spaces.",
            |_, params, rng| {
                let nb = params.get_usize("nb").unwrap_or(3);
                if nb == 0 {
                    return Err(provider_error("words", "nb must be positive"));
                }
                Ok(GeneratedValue::Text(words(nb, rng).join(" ")))
            },
        )
        .with_params(WORDS_PARAMS),
    );
    registry.register(
        ProviderEntry::new(
            "sentence",
            Text,
            "Sentence of about `nb_words` (default 6) words.",
            |_, params, rng| {
                let nb = params.get_usize("nb_words").unwrap_or(6);
                if nb == 0 {
                    return Err(provider_error("sentence", "nb_words must be positive"));
                }
                let value: String = Sentence(nb..nb + 1).fake_with_rng(rng);
                Ok(GeneratedValue::Text(value))
            },
        )
        .with_params(SENTENCE_PARAMS),
    );
    registry.register(
        ProviderEntry::new(
            "paragraph",
            Text,
            "Paragraph of `nb_sentences` (default 3) sentences.",
            |_, params, rng| {
                let nb = params.get_usize("nb_sentences").unwrap_or(3);
                if nb == 0 {
                    return Err(provider_error("paragraph", "nb_sentences must be positive"));
                }
                Ok(GeneratedValue::Text(paragraph(nb, rng)))
            },
        )
        .with_params(PARAGRAPH_PARAMS),
    );
    registry.register(
        ProviderEntry::new(
            "text",
            Text,
            "Lorem text no longer than `max_nb_chars` (default 200) characters.",
            |_, params, rng| {
                let max = params.get_usize("max_nb_chars").unwrap_or(200);
                if max < 5 {
                    return Err(provider_error("text", "max_nb_chars must be at least 5"));
                }
                Ok(GeneratedValue::Text(text(max, rng)))
            },
        )
        .with_params(TEXT_PARAMS),
    );
    registry.register(ProviderEntry::new(
        "slug",
        Text,
        "Lower-case words joined by hyphens.",
        |_, _, rng| Ok(GeneratedValue::Text(words(3, rng).join("-").to_lowercase())),
    ));
}

pub fn word(rng: &mut dyn RngCore) -> String {
    Word().fake_with_rng(rng)
}

pub fn words(count: usize, rng: &mut dyn RngCore) -> Vec<String> {
    Words(count..count + 1).fake_with_rng(rng)
}

pub fn sentence(rng: &mut dyn RngCore) -> String {
    Sentence(4..10).fake_with_rng(rng)
}

pub fn paragraph(sentences: usize, rng: &mut dyn RngCore) -> String {
    Paragraph(sentences..sentences + 1).fake_with_rng(rng)
}

/// Whole sentences while they fit in `max_chars`, cut on a word boundary otherwise.
pub fn text(max_chars: usize, rng: &mut dyn RngCore) -> String {
    let mut out = String::new();
    loop {
        let next: String = Sentence(3..8).fake_with_rng(rng);
        let needed = if out.is_empty() { next.len() } else { next.len() + 1 };
        if out.len() + needed > max_chars {
            if out.is_empty() {
                out = truncate_words(&next, max_chars);
            }
            return out;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&next);
    }
}

fn truncate_words(value: &str, max_chars: usize) -> String {
    let mut out = String::new();
    for word in value.split_whitespace() {
        let needed = if out.is_empty() { word.len() } else { word.len() + 1 };
        if out.len() + needed + 1 > max_chars {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn text_stays_within_limit() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for max in [5, 20, 100, 200] {
            for _ in 0..20 {
                let value = text(max, &mut rng);
                assert!(value.len() <= max, "{value:?} exceeds {max}");
                assert!(!value.is_empty());
            }
        }
    }
}

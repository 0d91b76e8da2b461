use std::io::Write;

use datasynth_core::RecordSet;

use crate::errors::GenerationError;

/// Write records as a pretty-printed JSON array of objects.
///
/// Every object carries every column; absent cells and nulls are `null` and
/// map values nest as objects. Returns the number of bytes written.
pub fn write_json<W: Write>(records: &RecordSet, mut writer: W) -> Result<u64, GenerationError> {
    let bytes = serde_json::to_vec_pretty(&records.to_json())?;
    writer.write_all(&bytes)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(bytes.len() as u64 + 1)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::{Value, json};

    use datasynth_core::{GeneratedValue, Row};

    use super::*;

    #[test]
    fn nulls_and_maps_keep_their_json_shape() {
        let mut first = Row::new();
        first.insert("name", GeneratedValue::text("Acme"));
        first.insert(
            "social_media",
            GeneratedValue::Map(BTreeMap::from([(
                "twitter".to_string(),
                "https://twitter.com/acme".to_string(),
            )])),
        );
        let mut second = Row::new();
        second.insert("name", GeneratedValue::Null);
        let records = RecordSet::from_rows(vec![first, second]);

        let mut out = Vec::new();
        write_json(&records, &mut out).expect("json");
        let parsed: Value = serde_json::from_slice(&out).expect("parse");
        assert_eq!(
            parsed,
            json!([
                {"name": "Acme", "social_media": {"twitter": "https://twitter.com/acme"}},
                {"name": null, "social_media": null}
            ])
        );
    }
}

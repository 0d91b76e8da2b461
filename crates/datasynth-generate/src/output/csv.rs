use std::io::Write;

use datasynth_core::RecordSet;

use crate::errors::GenerationError;

/// Write records as CSV with a header row in column order.
///
/// Embedded line breaks are replaced by spaces so every record stays on one
/// line; nulls become empty cells. Returns the number of bytes written.
pub fn write_csv<W: Write>(records: &RecordSet, writer: W) -> Result<u64, GenerationError> {
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    writer.write_record(records.columns())?;
    for row in records.rows() {
        let record: Vec<String> = records
            .columns()
            .iter()
            .map(|column| flatten_newlines(&records.cell(row, column).to_text()))
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

fn flatten_newlines(value: &str) -> String {
    if value.contains(['\r', '\n']) {
        value.replace("\r\n", " ").replace(['\r', '\n'], " ")
    } else {
        value.to_string()
    }
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use datasynth_core::{GeneratedValue, Row};

    use super::*;

    #[test]
    fn normalizes_newlines_and_renders_nulls_empty() {
        let mut row = Row::new();
        row.insert("note", GeneratedValue::text("line one\r\nline two\nend"));
        row.insert("coupon", GeneratedValue::Null);
        row.insert("total", GeneratedValue::Float(12.5));
        let records = RecordSet::from_rows(vec![row]);

        let mut out = Vec::new();
        let bytes = write_csv(&records, &mut out).expect("csv");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(bytes as usize, text.len());
        assert_eq!(text, "note,coupon,total\nline one line two end,,12.5\n");
    }
}

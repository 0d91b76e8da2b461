use serde_json::{Map, Value};

use crate::value::GeneratedValue;

/// One generated record. Fields keep the order they were inserted in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, GeneratedValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Inserts or replaces a field, keeping the original position on replace.
    pub fn insert(&mut self, name: impl Into<String>, value: GeneratedValue) {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&GeneratedValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GeneratedValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect::<Map<String, Value>>(),
        )
    }
}

impl FromIterator<(String, GeneratedValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, GeneratedValue)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (key, value) in iter {
            row.insert(key, value);
        }
        row
    }
}

static NULL: GeneratedValue = GeneratedValue::Null;

/// Ordered rows sharing one schema.
///
/// `columns` is the union of populated field names in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record set with a fixed column list (used when reading tables back).
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut records = Self::new();
        for row in rows {
            records.push(row);
        }
        records
    }

    pub fn push(&mut self, row: Row) {
        for key in row.keys() {
            if !self.columns.iter().any(|column| column == key) {
                self.columns.push(key.to_string());
            }
        }
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell lookup; absent fields read as null.
    pub fn cell<'a>(&'a self, row: &'a Row, column: &str) -> &'a GeneratedValue {
        row.get(column).unwrap_or(&NULL)
    }

    /// All values of one column in row order, absent cells as null.
    pub fn column_values(&self, column: &str) -> Vec<GeneratedValue> {
        self.rows
            .iter()
            .map(|row| row.get(column).cloned().unwrap_or(GeneratedValue::Null))
            .collect()
    }

    pub fn to_json(&self) -> Value {
        Value::Array(
            self.rows
                .iter()
                .map(|row| {
                    Value::Object(
                        self.columns
                            .iter()
                            .map(|column| (column.clone(), self.cell(row, column).to_json()))
                            .collect::<Map<String, Value>>(),
                    )
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_union_in_first_seen_order() {
        let mut first = Row::new();
        first.insert("a", GeneratedValue::Int(1));
        first.insert("b", GeneratedValue::Int(2));
        let mut second = Row::new();
        second.insert("c", GeneratedValue::Int(3));
        second.insert("a", GeneratedValue::Int(4));

        let records = RecordSet::from_rows(vec![first, second]);
        assert_eq!(records.columns(), ["a", "b", "c"]);
        assert_eq!(
            records.column_values("b"),
            vec![GeneratedValue::Int(2), GeneratedValue::Null]
        );
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut row = Row::new();
        row.insert("a", GeneratedValue::Int(1));
        row.insert("b", GeneratedValue::Int(2));
        row.insert("a", GeneratedValue::Int(9));
        assert_eq!(row.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(row.get("a"), Some(&GeneratedValue::Int(9)));
    }
}

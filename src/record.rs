//! The render input: a flat map of named values plus named row-lists.

use crate::error::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

/// One row of a row-list, keyed by column name
pub type Row = HashMap<String, String>;

/// A single value of a [`Record`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Empty,
    Text(String),
    Number(f64),
    Flag(bool),
    Rows(Vec<Row>),
}

impl FieldValue {
    /// The value as display text. Row-lists have no text form.
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.trim().to_string(),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Flag(b) => b.to_string(),
            FieldValue::Empty | FieldValue::Rows(_) => String::new(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

impl From<Vec<Row>> for FieldValue {
    fn from(rows: Vec<Row>) -> Self {
        FieldValue::Rows(rows)
    }
}

/// The fixed shape of a row-list and where its rows come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSchema {
    /// Key of an explicit list of rows in the record
    pub key: &'static str,
    /// Prefix of the scalar fields holding the leading row, e.g. `main` for `main_gene`
    pub prefix: Option<&'static str>,
    /// Key of the semicolon separated text with further rows, one per line
    pub text_key: &'static str,
    pub columns: &'static [&'static str],
}

const VARIANT_COLUMNS: &[&str] = &[
    "gene",
    "transcript",
    "variant_c",
    "variant_p",
    "dbsnp",
    "zygosity",
    "inheritance",
    "classification",
    "condition",
];

const CNV_COLUMNS: &[&str] = &["event", "coordinate", "cytoband", "zygosity", "classification"];

impl RowSchema {
    /// Reportable variants
    pub const VARIANTS: RowSchema = RowSchema {
        key: "main_variant_rows",
        prefix: Some("main"),
        text_key: "main_variant_extra_rows_text",
        columns: VARIANT_COLUMNS,
    };

    /// Variants of uncertain significance
    pub const VUS: RowSchema = RowSchema {
        key: "vus_variant_rows",
        prefix: Some("vus"),
        text_key: "vus_variant_extra_rows_text",
        columns: VARIANT_COLUMNS,
    };

    /// Copy-number variants
    pub const CNV: RowSchema = RowSchema {
        key: "main_cnv_rows",
        prefix: None,
        text_key: "main_cnv_rows_text",
        columns: CNV_COLUMNS,
    };
}

/// Parse semicolon separated rows, one per line. Cells are trimmed, missing
/// trailing cells are empty and surplus cells are ignored; blank lines are skipped.
pub fn parse_rows(schema: &RowSchema, text: &str) -> Vec<Row> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut cells = line.split(';').map(str::trim);
            schema
                .columns
                .iter()
                .map(|column| (column.to_string(), cells.next().unwrap_or_default().to_string()))
                .collect()
        })
        .collect()
}

/// A clinical record as handed over by the storage layer
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Record> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Record> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Set a field
    pub fn with<K: ToString, V: Into<FieldValue>>(mut self, key: K, value: V) -> Record {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// The display text of a field; missing fields are empty
    pub fn text(&self, key: &str) -> String {
        self.fields
            .get(key)
            .map(FieldValue::as_text)
            .unwrap_or_default()
    }

    /// The first of `keys` with non-empty text
    pub fn first_text(&self, keys: &[&str]) -> String {
        keys.iter()
            .map(|key| self.text(key))
            .find(|text| !text.is_empty())
            .unwrap_or_default()
    }

    /// Whether a field is set: a true flag, a non-zero number or text other
    /// than `false` or `0`. Missing fields are unset.
    pub fn flag(&self, key: &str) -> bool {
        match self.fields.get(key) {
            Some(FieldValue::Flag(b)) => *b,
            Some(FieldValue::Number(n)) => *n != 0.0,
            Some(FieldValue::Text(s)) => {
                let s = s.trim();
                !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
            }
            Some(FieldValue::Rows(rows)) => !rows.is_empty(),
            Some(FieldValue::Empty) | None => false,
        }
    }

    /// Non-empty texts of `keys`, joined by single spaces
    pub fn joined(&self, keys: &[&str]) -> String {
        keys.iter()
            .map(|key| self.text(key))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The rows of a row-list.
    ///
    /// An explicit list under `schema.key` wins. Otherwise the rows are the
    /// leading row built from the prefixed scalar fields, when any of them is
    /// set, followed by the rows parsed from `schema.text_key`.
    pub fn rows(&self, schema: &RowSchema) -> Vec<Row> {
        if let Some(FieldValue::Rows(rows)) = self.fields.get(schema.key) {
            return rows.clone();
        }

        let mut rows = Vec::new();
        if let Some(prefix) = schema.prefix {
            let leading: Row = schema
                .columns
                .iter()
                .map(|column| (column.to_string(), self.text(&format!("{prefix}_{column}"))))
                .collect();
            if leading.values().any(|v| !v.is_empty()) {
                rows.push(leading);
            }
        }
        rows.extend(parse_rows(schema, &self.text(schema.text_key)));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_render_as_text() {
        let record = Record::new()
            .with("name", "  JANE DOE ")
            .with("coverage", 523.0)
            .with("ratio", 99.5)
            .with("admin", true);
        assert_eq!(record.text("name"), "JANE DOE");
        assert_eq!(record.text("coverage"), "523");
        assert_eq!(record.text("ratio"), "99.5");
        assert_eq!(record.text("admin"), "true");
        assert_eq!(record.text("missing"), "");
    }

    #[test]
    fn display_fields_fall_back_to_raw_fields() {
        let record = Record::new()
            .with("requester_display", "")
            .with("requester_name", "Dr. Smith");
        assert_eq!(
            record.first_text(&["requester_display", "requester_name"]),
            "Dr. Smith"
        );
        assert_eq!(record.joined(&["requester_name", "missing", "requester_name"]), "Dr. Smith Dr. Smith");
    }

    #[test]
    fn row_lists_combine_scalars_and_text() {
        let record = Record::new()
            .with("main_gene", "GAA")
            .with("main_variant_c", "c.2560C>T")
            .with(
                "main_variant_extra_rows_text",
                "GAA; NM_000152.5; c.-32-13T>G; p.(?); rs386834236\n\n",
            )
            .with(
                "main_cnv_rows_text",
                "Deletion; chr1:93270347-103006350; 1p22.1-p21.1; Heterozygous; VUS",
            );

        let variants = record.rows(&RowSchema::VARIANTS);
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0]["variant_c"], "c.2560C>T");
        assert_eq!(variants[1]["variant_c"], "c.-32-13T>G");
        assert_eq!(variants[1]["condition"], "");

        let cnv = record.rows(&RowSchema::CNV);
        assert_eq!(cnv.len(), 1);
        assert_eq!(cnv[0]["coordinate"], "chr1:93270347-103006350");

        assert!(record.rows(&RowSchema::VUS).is_empty());
    }

    #[test]
    fn json_records_accept_explicit_rows() {
        let record = Record::from_json(
            r#"{
                "patient_name": "JANE DOE",
                "metrics_coverage_mean": 312,
                "is_admin": false,
                "notes_text": null,
                "main_cnv_rows": [
                    { "event": "Duplication", "coordinate": "chr2:1-2" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(record.text("metrics_coverage_mean"), "312");
        assert_eq!(record.text("notes_text"), "");
        let cnv = record.rows(&RowSchema::CNV);
        assert_eq!(cnv.len(), 1);
        assert_eq!(cnv[0]["event"], "Duplication");
        assert!(!record.flag("is_admin"));
    }

    #[test]
    fn flags_follow_the_field_value() {
        let record = Record::new()
            .with("flag", true)
            .with("number", 1.0)
            .with("zero", 0.0)
            .with("text", "yes")
            .with("false_text", " False ")
            .with("blank", "  ");
        assert!(record.flag("flag"));
        assert!(record.flag("number"));
        assert!(record.flag("text"));
        assert!(!record.flag("zero"));
        assert!(!record.flag("false_text"));
        assert!(!record.flag("blank"));
        assert!(!record.flag("missing"));
    }
}

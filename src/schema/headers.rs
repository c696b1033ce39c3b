//! Headers: the ordered field names of a record set plus an optional
//! field dictionary.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};

/// One dictionary entry as it appears in a JSON dictionary file.
///
/// ```json
/// [{"Fieldname": "MMSI", "Description": "Maritime Mobile Service Identity"}]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Definition {
    #[serde(rename = "Fieldname", alias = "fieldname", default)]
    pub fieldname: String,
    #[serde(rename = "Description", alias = "description", default)]
    pub description: String,
}

impl Definition {
    pub fn new(fieldname: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            fieldname: fieldname.into(),
            description: description.into(),
        }
    }
}

/// The headers row of an AIS file.
///
/// `fields` fixes the column index of every record in the owning store.
/// The dictionary is optional and need not describe every field.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    fields: Vec<String>,
    dictionary: Option<HashMap<String, String>>,
}

impl Headers {
    /// Creates headers from field names and, optionally, a set of
    /// definitions used verbatim as the dictionary.
    pub fn new(fields: Vec<String>, defs: Option<&[Definition]>) -> Self {
        let dictionary = defs.map(|defs| {
            defs.iter()
                .map(|d| (d.fieldname.clone(), d.description.clone()))
                .collect()
        });
        Self { fields, dictionary }
    }

    /// Shorthand for headers without a dictionary.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            dictionary: None,
        }
    }

    /// Returns the field names in column order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the index of `field`, or `None` when the headers do not
    /// contain it.
    pub fn contains(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
    }

    /// Resolves `field` to its index or fails with a schema violation
    /// naming `context`.
    pub fn require(&self, context: &str, field: &str) -> SchemaResult<usize> {
        self.contains(field)
            .ok_or_else(|| SchemaError::missing_field(context, field))
    }

    /// Returns a copy of these headers with `field` appended.
    pub fn with_field(&self, field: impl Into<String>) -> Self {
        let mut h = self.clone();
        h.fields.push(field.into());
        h
    }

    /// Returns the attached dictionary, if any.
    pub fn dictionary(&self) -> Option<&HashMap<String, String>> {
        self.dictionary.as_ref()
    }

    /// Description of `field` from the dictionary.
    pub fn describe(&self, field: &str) -> Option<&str> {
        self.dictionary.as_ref()?.get(field).map(String::as_str)
    }

    /// Decodes a JSON array of [`Definition`] and attaches it as the
    /// dictionary.
    ///
    /// The import is all-or-nothing: a decode failure clears any dictionary
    /// already attached, and an entry with an empty name or description
    /// rejects the whole blob. Names and descriptions are trimmed.
    pub fn set_dictionary(&mut self, blob: &[u8]) -> SchemaResult<()> {
        let defs: Vec<Definition> = match serde_json::from_slice(blob) {
            Ok(defs) => defs,
            Err(e) => {
                self.dictionary = None;
                return Err(SchemaError::invalid_dictionary(format!(
                    "unmarshal blob: {}",
                    e
                )));
            }
        };

        if defs
            .iter()
            .any(|d| d.fieldname.is_empty() || d.description.is_empty())
        {
            return Err(SchemaError::invalid_dictionary(
                "fieldnames in json blob may not match Definition fields",
            ));
        }

        let dict = defs
            .iter()
            .map(|d| {
                (
                    d.fieldname.trim().to_string(),
                    d.description.trim().to_string(),
                )
            })
            .collect();
        self.dictionary = Some(dict);
        Ok(())
    }

    /// Drops the dictionary.
    pub fn clear_dictionary(&mut self) {
        self.dictionary = None;
    }
}

/// Headers are equal when their field sequences match and both either have
/// or lack a dictionary. Dictionary contents are not compared.
impl PartialEq for Headers {
    fn eq(&self, other: &Self) -> bool {
        self.dictionary.is_some() == other.dictionary.is_some() && self.fields == other.fields
    }
}

impl Eq for Headers {}

/// Pretty-prints one aligned line per field: index, name and description.
impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self
            .fields
            .iter()
            .map(|h| format!("{}:", h.trim()))
            .collect();
        let width = labels.iter().map(|l| l.len()).max().unwrap_or(0);

        for (i, (field, label)) in self.fields.iter().zip(&labels).enumerate() {
            let description = match &self.dictionary {
                Some(dict) => dict
                    .get(field.trim())
                    .map(String::as_str)
                    .unwrap_or("No definition in dictionary."),
                None => "",
            };
            let line = format!("{:>2} {:<width$} {}", i, label, description, width = width);
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ais_headers() -> Headers {
        Headers::from_fields(["MMSI", "BaseDateTime", "LAT", "LON"])
    }

    #[test]
    fn test_contains() {
        let h = ais_headers();
        assert_eq!(h.contains("MMSI"), Some(0));
        assert_eq!(h.contains("LON"), Some(3));
        assert_eq!(h.contains("VesselName"), None);
    }

    #[test]
    fn test_require_names_context() {
        let h = ais_headers();
        let err = h.require("unique vessels", "VesselName").unwrap_err();
        assert!(err.message().contains("unique vessels"));
        assert_eq!(err.field(), Some("VesselName"));
    }

    #[test]
    fn test_equality_ignores_dictionary_contents() {
        let defs_a = vec![Definition::new("MMSI", "identity")];
        let defs_b = vec![Definition::new("LAT", "latitude")];
        let fields: Vec<String> = ["MMSI", "LAT"].iter().map(|s| s.to_string()).collect();

        let a = Headers::new(fields.clone(), Some(&defs_a));
        let b = Headers::new(fields.clone(), Some(&defs_b));
        let c = Headers::new(fields, None);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_equality_compares_order() {
        let a = Headers::from_fields(["LAT", "LON"]);
        let b = Headers::from_fields(["LON", "LAT"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_set_dictionary_trims() {
        let mut h = ais_headers();
        let blob = br#"[{"Fieldname": " MMSI ", "Description": " Vessel identity  "}]"#;
        h.set_dictionary(blob).unwrap();
        assert_eq!(h.describe("MMSI"), Some("Vessel identity"));
        assert_eq!(h.describe("LAT"), None);
    }

    #[test]
    fn test_set_dictionary_rejects_empty_entries_atomically() {
        let mut h = ais_headers();
        let blob = br#"[
            {"Fieldname": "MMSI", "Description": "identity"},
            {"Name": "LAT", "Text": "latitude"}
        ]"#;
        let err = h.set_dictionary(blob).unwrap_err();
        assert_eq!(
            err.code(),
            super::super::errors::SchemaErrorCode::AisSchemaInvalidDictionary
        );
        assert!(h.dictionary().is_none());
    }

    #[test]
    fn test_set_dictionary_bad_json_clears_existing() {
        let mut h = ais_headers();
        h.set_dictionary(br#"[{"Fieldname": "MMSI", "Description": "identity"}]"#)
            .unwrap();
        assert!(h.dictionary().is_some());

        assert!(h.set_dictionary(b"not json").is_err());
        assert!(h.dictionary().is_none());
    }

    #[test]
    fn test_clear_dictionary() {
        let mut h = ais_headers();
        h.set_dictionary(br#"[{"Fieldname": "MMSI", "Description": "identity"}]"#)
            .unwrap();
        h.clear_dictionary();
        assert!(h.dictionary().is_none());
        assert_eq!(h.describe("MMSI"), None);
        assert_eq!(h, ais_headers());
    }

    #[test]
    fn test_display_with_dictionary() {
        let mut h = Headers::from_fields(["MMSI", "LAT"]);
        h.set_dictionary(br#"[{"Fieldname": "MMSI", "Description": "identity"}]"#)
            .unwrap();
        let out = h.to_string();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], " 0 MMSI: identity");
        assert_eq!(lines[1], " 1 LAT:  No definition in dictionary.");
    }

    #[test]
    fn test_display_without_dictionary() {
        let h = Headers::from_fields(["MMSI", "LAT"]);
        assert_eq!(h.to_string(), " 0 MMSI:\n 1 LAT:\n");
    }
}

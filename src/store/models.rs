//! Data model for the dashboard capabilities.
//!
//! `Source` and `Exploration` are the persisted entities; `Kapacitor` /
//! `Kapacitors` is the composite agent-descriptor body that exercises the
//! validation contract's collection rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{FormatRegistry, Validate, ValidationErrors};

/// A stored connection descriptor for a time-series backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Store-assigned, unique within the bound store. Zero until assigned.
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default = "default_source_type")]
    pub source_type: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Marks the source the UI selects when none is specified.
    #[serde(default)]
    pub default: bool,
}

fn default_source_type() -> String {
    "influx".to_string()
}

impl Validate for Source {
    fn validate(&self, formats: &FormatRegistry) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        if self.name.is_empty() {
            errs.required("name");
        }
        if self.url.is_empty() {
            errs.required("url");
        } else if !formats.check("uri", &self.url) {
            errs.add("url", format!("{} is not a valid uri", self.url));
        }
        errs.into_result()
    }
}

/// Partial update for a source. Absent fields retain their prior values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub source_type: Option<String>,
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub default: Option<bool>,
}

impl SourceUpdate {
    /// Apply this update on top of `source`.
    pub fn apply(self, source: &mut Source) {
        if let Some(name) = self.name {
            source.name = name;
        }
        if let Some(source_type) = self.source_type {
            source.source_type = source_type;
        }
        if let Some(url) = self.url {
            source.url = url;
        }
        if let Some(username) = self.username {
            source.username = Some(username);
        }
        if let Some(password) = self.password {
            source.password = Some(password);
        }
        if let Some(default) = self.default {
            source.default = default;
        }
    }
}

/// A saved query/visualization scoped to a (source, user) pair.
///
/// The `(source_id, user_id, id)` triple is unique within a store, and an
/// exploration never outlives its source. The foreign key is honored by the
/// store implementations, not enforced by a database constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exploration {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub source_id: u64,
    #[serde(default)]
    pub user_id: u64,
    #[serde(default)]
    pub name: String,
    /// Opaque query payload; the backend never interprets it.
    #[serde(default)]
    pub data: Value,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Partial update for an exploration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExplorationUpdate {
    pub name: Option<String>,
    pub data: Option<Value>,
}

impl ExplorationUpdate {
    pub fn apply(self, exploration: &mut Exploration) {
        if let Some(name) = self.name {
            exploration.name = name;
        }
        if let Some(data) = self.data {
            exploration.data = data;
        }
    }
}

/// A raw query forwarded to the bound time-series backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeriesQuery {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch: Option<String>,
}

/// A backend-agent connection descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kapacitor {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub active: bool,
}

impl Kapacitor {
    /// Zero-valued descriptors are skipped during collection validation.
    pub fn is_zero(&self) -> bool {
        *self == Kapacitor::default()
    }
}

impl Validate for Kapacitor {
    fn validate(&self, formats: &FormatRegistry) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        if self.url.is_empty() {
            errs.required("url");
        } else if !formats.check("uri", &self.url) {
            errs.add("url", format!("{} is not a valid uri", self.url));
        }
        errs.into_result()
    }
}

/// Named wrapper around an ordered sequence of agent descriptors.
///
/// The wrapper field is required; a missing or null sequence is one error
/// for the field itself. Elements are validated individually, zero-valued
/// elements skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kapacitors {
    #[serde(default)]
    pub kapacitors: Option<Vec<Kapacitor>>,
}

impl Validate for Kapacitors {
    fn validate(&self, formats: &FormatRegistry) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        match &self.kapacitors {
            None => errs.required("kapacitors"),
            Some(elements) => {
                for (i, element) in elements.iter().enumerate() {
                    if element.is_zero() {
                        continue;
                    }
                    if let Err(element_errs) = element.validate(formats) {
                        errs.merge_under(&format!("kapacitors.{i}"), element_errs);
                    }
                }
            }
        }
        errs.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> FormatRegistry {
        FormatRegistry::default()
    }

    #[test]
    fn test_source_requires_name_and_url() {
        let source = Source {
            id: 0,
            name: String::new(),
            source_type: "influx".to_string(),
            url: String::new(),
            username: None,
            password: None,
            default: false,
        };
        let errs = source.validate(&registry()).unwrap_err();
        assert_eq!(errs.len(), 2);
        assert_eq!(errs.errors[0].path, "name");
        assert_eq!(errs.errors[1].path, "url");
    }

    #[test]
    fn test_source_url_format_checked() {
        let source = Source {
            id: 0,
            name: "prod".to_string(),
            source_type: "influx".to_string(),
            url: "not a url".to_string(),
            username: None,
            password: None,
            default: false,
        };
        let errs = source.validate(&registry()).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.errors[0].path, "url");
    }

    #[test]
    fn test_source_update_retains_absent_fields() {
        let mut source = Source {
            id: 7,
            name: "prod".to_string(),
            source_type: "influx".to_string(),
            url: "http://db:8086".to_string(),
            username: Some("admin".to_string()),
            password: None,
            default: true,
        };
        SourceUpdate {
            name: Some("staging".to_string()),
            ..Default::default()
        }
        .apply(&mut source);
        assert_eq!(source.name, "staging");
        assert_eq!(source.url, "http://db:8086");
        assert_eq!(source.username.as_deref(), Some("admin"));
        assert!(source.default);
    }

    #[test]
    fn test_kapacitors_null_sequence_is_one_error() {
        let body: Kapacitors = serde_json::from_str(r#"{"kapacitors": null}"#).unwrap();
        let errs = body.validate(&registry()).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.errors[0].message, "kapacitors is required");
    }

    #[test]
    fn test_kapacitors_zero_element_skipped() {
        let body: Kapacitors =
            serde_json::from_str(r#"{"kapacitors": [{}, {"url": "bad"}]}"#).unwrap();
        let errs = body.validate(&registry()).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.errors[0].path, "kapacitors.1.url");
    }

    #[test]
    fn test_kapacitors_empty_sequence_is_valid() {
        let body: Kapacitors = serde_json::from_str(r#"{"kapacitors": []}"#).unwrap();
        assert!(body.validate(&registry()).is_ok());
    }
}

//! # Validation Contract
//!
//! Request/response bodies are composite values that must be checked before
//! they reach a backend. Validation is pure: a value plus a [`FormatRegistry`]
//! in, either `Ok` or an aggregated [`ValidationErrors`] out. Every
//! independently checkable field is checked; the caller receives all
//! violations in one round-trip rather than one at a time.
//!
//! Rules for composite bodies:
//!
//! - A required collection field that is absent produces exactly one error
//!   for that field and its elements are not examined.
//! - A zero-valued element inside a present collection is skipped. Note that
//!   this makes an intentionally-empty element indistinguishable from an
//!   absent one; both serialize to the zero value. Preserved as-is, see
//!   DESIGN.md.
//! - A populated element is validated recursively and its errors surface
//!   under an indexed path (`kapacitors.1.url`).

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path to the offending field, indexed for sequence elements.
    pub path: String,
    pub message: String,
}

/// Ordered, non-empty collection of field errors.
///
/// Construction starts empty; [`ValidationErrors::into_result`] turns an
/// empty collection into `Ok(())` so callers never observe an empty error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation at `path`.
    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            path: path.into(),
            message: message.into(),
        });
    }

    /// Record the canonical "required field absent" violation.
    pub fn required(&mut self, path: &str) {
        self.add(path, format!("{path} is required"));
    }

    /// Re-parent every error of `other` under `prefix`.
    pub fn merge_under(&mut self, prefix: &str, other: ValidationErrors) {
        for err in other.errors {
            self.errors.push(FieldError {
                path: format!("{prefix}.{}", err.path),
                message: err.message,
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// `Ok(())` when no violation was recorded, the aggregate otherwise.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for err in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", err.path, err.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Named semantic string formats (`uri`, `date-time`).
///
/// The registry is an opaque collaborator from the validation contract's
/// point of view: a format name maps to a predicate over the raw string.
/// Unknown formats are accepted, matching the permissive behavior of
/// generated binding layers.
pub struct FormatRegistry {
    formats: HashMap<&'static str, fn(&str) -> bool>,
}

impl FormatRegistry {
    pub fn empty() -> Self {
        Self {
            formats: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &'static str, check: fn(&str) -> bool) {
        self.formats.insert(name, check);
    }

    /// True when `value` satisfies `format`, or when the format is unknown.
    pub fn check(&self, format: &str, value: &str) -> bool {
        match self.formats.get(format) {
            Some(check) => check(value),
            None => true,
        }
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("uri", is_uri);
        registry.register("date-time", is_date_time);
        registry
    }
}

fn is_uri(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}

fn is_date_time(value: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(value).is_ok()
}

/// The validation contract implemented by every composite body.
pub trait Validate {
    fn validate(&self, formats: &FormatRegistry) -> Result<(), ValidationErrors>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection_is_ok() {
        let errs = ValidationErrors::new();
        assert!(errs.into_result().is_ok());
    }

    #[test]
    fn test_errors_preserve_order() {
        let mut errs = ValidationErrors::new();
        errs.add("name", "name is required");
        errs.add("url", "url is not a valid uri");
        let errs = errs.into_result().unwrap_err();
        assert_eq!(errs.errors[0].path, "name");
        assert_eq!(errs.errors[1].path, "url");
    }

    #[test]
    fn test_merge_under_indexes_paths() {
        let mut child = ValidationErrors::new();
        child.add("url", "url is not a valid uri");
        let mut parent = ValidationErrors::new();
        parent.merge_under("kapacitors.1", child);
        assert_eq!(parent.errors[0].path, "kapacitors.1.url");
    }

    #[test]
    fn test_display_joins_errors() {
        let mut errs = ValidationErrors::new();
        errs.required("kapacitors");
        errs.add("url", "bad");
        assert_eq!(
            errs.to_string(),
            "kapacitors: kapacitors is required; url: bad"
        );
    }

    #[test]
    fn test_default_registry_checks_uri() {
        let registry = FormatRegistry::default();
        assert!(registry.check("uri", "http://db:8086"));
        assert!(!registry.check("uri", "bad"));
    }

    #[test]
    fn test_default_registry_checks_date_time() {
        let registry = FormatRegistry::default();
        assert!(registry.check("date-time", "2016-04-01T12:00:00Z"));
        assert!(!registry.check("date-time", "yesterday"));
    }

    #[test]
    fn test_unknown_format_is_accepted() {
        let registry = FormatRegistry::default();
        assert!(registry.check("hostname", "anything at all"));
    }
}

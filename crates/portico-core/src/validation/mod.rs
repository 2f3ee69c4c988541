//! Structural validation of bound targets.
//!
//! Targets implement [`Validate`], normally through `#[derive(Validate)]`
//! from `portico-macros`, which expands each `#[validate(...)]` field
//! attribute into calls to the helpers in [`rules`]. Validation collects every
//! violation rather than stopping at the first one.
//!
//! # Example
//!
//! ```rust
//! use portico_core::validation::{rules, Validate, ValidationErrors};
//!
//! struct Signup {
//!     email: String,
//!     age: u8,
//! }
//!
//! impl Validate for Signup {
//!     fn validate(&self) -> Result<(), ValidationErrors> {
//!         let mut errors = ValidationErrors::new();
//!         if let Err(message) = rules::email(&self.email) {
//!             errors.add("email", "email", message);
//!         }
//!         if let Err(message) = rules::range(&self.age, Some(18.0), None) {
//!             errors.add("age", "range", message);
//!         }
//!         errors.into_result()
//!     }
//! }
//!
//! let signup = Signup { email: "nope".into(), age: 12 };
//! let errors = signup.validate().unwrap_err();
//! assert_eq!(errors.len(), 2);
//! ```

pub mod rules;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A type whose declared constraints can be checked after binding.
pub trait Validate {
    /// Checks every constraint, returning all violations found.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

impl Validate for () {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Some(value) => value.validate(),
            None => Ok(()),
        }
    }
}

impl<T: Validate + ?Sized> Validate for Box<T> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        (**self).validate()
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (index, item) in self.iter().enumerate() {
            if let Err(nested) = item.validate() {
                errors.merge_nested(&format!("[{index}]"), nested);
            }
        }
        errors.into_result()
    }
}

/// A single constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Field path, e.g. `email` or `items[2].sku`.
    pub field: String,
    /// Name of the violated rule, e.g. `length`.
    pub rule: String,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All violations found while validating a target, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    /// Creates an empty set of violations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation.
    pub fn add(
        &mut self,
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.violations.push(FieldViolation {
            field: field.into(),
            rule: rule.into(),
            message: message.into(),
        });
    }

    /// Folds violations of a nested value in under `prefix`.
    ///
    /// Index segments join without a dot: `items` + `[1].sku` gives
    /// `items[1].sku`, `address` + `city` gives `address.city`.
    pub fn merge_nested(&mut self, prefix: &str, nested: ValidationErrors) {
        for mut violation in nested.violations {
            violation.field = if violation.field.starts_with('[') || prefix.is_empty() {
                format!("{prefix}{}", violation.field)
            } else {
                format!("{prefix}.{}", violation.field)
            };
            self.violations.push(violation);
        }
    }

    /// Returns `true` if no violation was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns all violations.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Returns the violations recorded for one field path.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldViolation> {
        self.violations.iter().filter(move |v| v.field == field)
    }

    /// `Ok(())` when empty, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        sku: String,
    }

    impl Validate for Item {
        fn validate(&self) -> Result<(), ValidationErrors> {
            let mut errors = ValidationErrors::new();
            if let Err(message) = rules::required(&self.sku) {
                errors.add("sku", "required", message);
            }
            errors.into_result()
        }
    }

    #[test]
    fn test_empty_errors_are_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
        assert!(().validate().is_ok());
    }

    #[test]
    fn test_add_and_display() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "required", "is required");
        errors.add("age", "range", "must be at most 150");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.to_string(), "name: is required; age: must be at most 150");
        assert_eq!(errors.for_field("age").count(), 1);
    }

    #[test]
    fn test_merge_nested_paths() {
        let mut inner = ValidationErrors::new();
        inner.add("city", "required", "is required");

        let mut errors = ValidationErrors::new();
        errors.merge_nested("address", inner);

        assert_eq!(errors.violations()[0].field, "address.city");
    }

    #[test]
    fn test_vec_indexes_violations() {
        let items = vec![
            Item { sku: "A-1".into() },
            Item { sku: String::new() },
        ];

        let errors = items.validate().unwrap_err();
        assert_eq!(errors.violations()[0].field, "[1].sku");

        let mut outer = ValidationErrors::new();
        outer.merge_nested("items", errors);
        assert_eq!(outer.violations()[0].field, "items[1].sku");
    }

    #[test]
    fn test_option_none_skips_validation() {
        let missing: Option<Item> = None;
        assert!(missing.validate().is_ok());

        let present = Some(Item { sku: String::new() });
        assert!(present.validate().is_err());
    }

    #[test]
    fn test_serializes_as_list() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "email", "must be a valid email address");

        let json = serde_json::to_value(errors.violations()).unwrap();
        assert_eq!(json[0]["field"], "email");
        assert_eq!(json[0]["message"], "must be a valid email address");
    }
}

//! Field-scoped validation results.
//!
//! Validation is a pure function over input that either yields the valid
//! value or an ordered list of field errors. Nothing here touches storage.

use serde::Serialize;

/// One field-scoped validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Input field name.
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// Ordered collection of field errors.
///
/// Only the first error recorded for a field is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(Vec<FieldError>);

/// A validated value or the reasons it was rejected.
pub type Validated<T> = Result<T, FieldErrors>;

impl FieldErrors {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Records `message` against `field` unless the field already has one.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if !self.contains(field) {
            self.0.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    /// Records `message` against `field` when `ok` is false.
    pub fn check(&mut self, ok: bool, field: &'static str, message: impl Into<String>) {
        if !ok {
            self.add(field, message);
        }
    }

    /// Returns true if an error was recorded for `field`.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// Message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates errors in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Finishes validation: `Ok(value)` if nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Validated<T> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Returns true if `value` has non-whitespace content.
#[must_use]
pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Returns true if `value` contains no control characters.
#[must_use]
pub fn printable(value: &str) -> bool {
    !value.chars().any(char::is_control)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_error_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.add("nip", "NIP must not be blank");
        errors.add("nip", "NIP must have 10 digits");
        errors.add("number", "Number must not be blank");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("nip"), Some("NIP must not be blank"));
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["nip", "number"]);
    }

    #[test]
    fn test_check_only_records_failures() {
        let mut errors = FieldErrors::new();
        errors.check(true, "a", "unused");
        errors.check(false, "b", "recorded");
        assert!(!errors.contains("a"));
        assert!(errors.contains("b"));
    }

    #[test]
    fn test_into_result() {
        assert_eq!(FieldErrors::new().into_result(7), Ok(7));

        let mut errors = FieldErrors::new();
        errors.add("x", "bad");
        assert!(errors.into_result(7).is_err());
    }

    #[test]
    fn test_display_joins_in_order() {
        let mut errors = FieldErrors::new();
        errors.add("a", "first");
        errors.add("b", "second");
        assert_eq!(errors.to_string(), "a: first; b: second");
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("x"));
        assert!(!not_blank(""));
        assert!(!not_blank("  \t"));
    }

    #[test]
    fn test_printable() {
        assert!(printable("Acme & Sons S.A."));
        assert!(printable("Zakład Łódź"));
        assert!(!printable("A\u{1}B"));
        assert!(!printable("line\nbreak"));
        assert!(!printable("\u{7f}"));
    }
}

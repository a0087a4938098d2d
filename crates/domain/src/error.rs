//! Unified error types for the domain layer
//!
//! Value objects and entity constructors report failures through
//! [`DomainError`], so adapters never have to deal with bare strings.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects and resource paths)
    #[error("Parse error: {0}")]
    Parse(String),

    /// A reserved word was used where a concrete value is required
    #[error("Reserved value: '{0}' cannot be used here")]
    Reserved(String),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// Use this when domain invariants are violated:
    /// - Required fields are empty or missing
    /// - Values exceed allowed lengths
    /// - Values contain forbidden characters
    ///
    /// # Example
    /// ```ignore
    /// if name.is_empty() {
    ///     return Err(DomainError::validation("Package name cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a reserved value error
    pub fn reserved(value: impl Into<String>) -> Self {
        Self::Reserved(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("name cannot be empty");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: name cannot be empty");
    }

    #[test]
    fn test_parse_error() {
        let err = DomainError::parse("not a version path");
        assert_eq!(err.to_string(), "Parse error: not a version path");
    }

    #[test]
    fn test_reserved_error() {
        let err = DomainError::reserved("any");
        assert_eq!(err.to_string(), "Reserved value: 'any' cannot be used here");
    }
}

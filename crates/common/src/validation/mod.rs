//! Field-level validation toolkit
//!
//! Collects per-field failures into a single [`ValidationError`] so callers
//! can report every problem at once instead of stopping at the first.

mod validators;

pub use validators::{
    clean_phone_number, format_phone_number, is_valid_email, is_valid_phone, is_valid_zip_code,
};

/// Validation error with field-level detail
#[derive(Debug, Clone, Default)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

/// A single failed field
#[derive(Debug, Clone)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Create with a single field error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add_field_error(field, message);
        err
    }

    /// Add a field-level error
    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError { field: field.into(), message: message.into() });
    }

    /// Require a non-blank value, recording an error when it is missing
    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add_field_error(field, "is required");
        }
    }

    /// Validate an optional email address
    pub fn check_email(&mut self, field: &str, value: Option<&str>) {
        if let Some(email) = value {
            if !email.trim().is_empty() && !is_valid_email(email) {
                self.add_field_error(field, "is not a valid email address");
            }
        }
    }

    /// Validate an optional phone number
    pub fn check_phone(&mut self, field: &str, value: Option<&str>) {
        if let Some(phone) = value {
            if !phone.trim().is_empty() && !is_valid_phone(phone) {
                self.add_field_error(field, "is not a valid phone number");
            }
        }
    }

    /// Validate a zip code (required)
    pub fn check_zip_code(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add_field_error(field, "is required");
        } else if !is_valid_zip_code(value) {
            self.add_field_error(field, "is not a valid zip code");
        }
    }

    /// True when no failures were recorded
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert the accumulator into a `Result`, erring when any field failed
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for err in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{} {}", err.field, err.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

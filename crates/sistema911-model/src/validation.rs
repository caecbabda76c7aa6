//! Input validation
//!
//! Checks run on create/update inputs before they are sent. Every check
//! returns a [`ValidationResult`] so several failures can be reported at once.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Validation error with detailed context
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub code: ValidationErrorCode,
}

/// Specific validation error codes for programmatic handling
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorCode {
    Required,
    InvalidFormat,
    OutOfRange,
    TooShort,
    Mismatch,
    InvalidCheckDigit,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result that can accumulate multiple errors
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add_error(&mut self, field: &str, message: &str, code: ValidationErrorCode) {
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.to_string(),
            code,
        });
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }

    /// Collapse into a single message, joined with `; `
    pub fn into_result(self) -> Result<(), String> {
        if self.is_valid() {
            Ok(())
        } else {
            let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
            Err(messages.join("; "))
        }
    }
}

/// Field must contain something other than whitespace
pub fn require(field: &str, value: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    if value.trim().is_empty() {
        result.add_error(field, "es obligatorio", ValidationErrorCode::Required);
    }
    result
}

/// Minimal email shape check: one `@`, non-empty local part, dotted domain
pub fn validate_email(field: &str, email: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    let email = email.trim();

    if email.is_empty() {
        result.add_error(field, "es obligatorio", ValidationErrorCode::Required);
        return result;
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        result.add_error(field, "correo electrónico inválido", ValidationErrorCode::InvalidFormat);
    }
    result
}

/// Phone numbers: optional leading `+`, then 7 to 15 digits; spaces,
/// hyphens and parentheses are ignored.
pub fn validate_phone(field: &str, phone: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    let phone = phone.trim();

    if phone.is_empty() {
        result.add_error(field, "es obligatorio", ValidationErrorCode::Required);
        return result;
    }

    let body = phone.strip_prefix('+').unwrap_or(phone);
    let mut digits = 0usize;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' | '(' | ')' => {}
            _ => {
                result.add_error(field, "contiene caracteres inválidos", ValidationErrorCode::InvalidFormat);
                return result;
            }
        }
    }

    if !(7..=15).contains(&digits) {
        result.add_error(field, "debe tener entre 7 y 15 dígitos", ValidationErrorCode::OutOfRange);
    }
    result
}

/// Compute the modulo-11 check digit of a RUT body ('0'-'9' or 'K').
pub fn rut_check_digit(body: u32) -> char {
    let mut sum = 0u32;
    let mut factor = 2u32;
    let mut n = body;
    while n > 0 {
        sum += (n % 10) * factor;
        n /= 10;
        factor = if factor == 7 { 2 } else { factor + 1 };
    }
    match 11 - (sum % 11) {
        11 => '0',
        10 => 'K',
        d => char::from_digit(d, 10).unwrap_or('0'),
    }
}

/// Validate a Chilean RUT such as `12.345.678-5`, `12345678-5` or `123456785`.
pub fn validate_rut(field: &str, rut: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    let cleaned: String = rut
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | ' '))
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if cleaned.is_empty() {
        result.add_error(field, "es obligatorio", ValidationErrorCode::Required);
        return result;
    }

    if cleaned.len() < 2 {
        result.add_error(field, "RUT demasiado corto", ValidationErrorCode::TooShort);
        return result;
    }

    let (body, dv) = cleaned.split_at(cleaned.len() - 1);
    let body: u32 = match body.parse() {
        Ok(n) if body.chars().all(|c| c.is_ascii_digit()) => n,
        _ => {
            result.add_error(field, "RUT con formato inválido", ValidationErrorCode::InvalidFormat);
            return result;
        }
    };

    let expected = rut_check_digit(body);
    if !dv.starts_with(expected) {
        result.add_error(field, "dígito verificador incorrecto", ValidationErrorCode::InvalidCheckDigit);
    }
    result
}

/// Registration passwords: at least 8 characters with a lowercase letter,
/// an uppercase letter and a digit.
pub fn validate_password(field: &str, password: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    if password.chars().count() < 8 {
        result.add_error(field, "debe tener al menos 8 caracteres", ValidationErrorCode::TooShort);
    }
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        result.add_error(
            field,
            "debe incluir mayúsculas, minúsculas y números",
            ValidationErrorCode::InvalidFormat,
        );
    }
    result
}

pub const BLOOD_TYPES: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

/// ABO group plus Rh factor, e.g. `O+`
pub fn validate_blood_type(field: &str, blood_type: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    let normalized = blood_type.trim().to_ascii_uppercase();
    if !BLOOD_TYPES.contains(&normalized.as_str()) {
        result.add_error(field, "grupo sanguíneo inválido", ValidationErrorCode::InvalidFormat);
    }
    result
}

/// WGS84 coordinates
pub fn validate_coordinates(latitude: f64, longitude: f64) -> ValidationResult {
    let mut result = ValidationResult::new();
    if !(-90.0..=90.0).contains(&latitude) || latitude.is_nan() {
        result.add_error("location.latitude", "fuera de rango", ValidationErrorCode::OutOfRange);
    }
    if !(-180.0..=180.0).contains(&longitude) || longitude.is_nan() {
        result.add_error("location.longitude", "fuera de rango", ValidationErrorCode::OutOfRange);
    }
    result
}

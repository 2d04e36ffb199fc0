//! Form checks run before any request is sent.

use secrecy::{ExposeSecret, SecretString};
use shop_console_core::{EmailError, Price, PriceError};
use thiserror::Error;

/// Maximum number of product images.
pub const MAX_PRODUCT_IMAGES: usize = 4;

/// Minimum password length for admin-initiated resets.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A form that failed client-side validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Price cannot be greater than regular price")]
    PriceAboveRegular,

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    #[error("Stock cannot be negative")]
    NegativeStock,

    #[error("{field} is not a valid number: {reason}")]
    NotANumber { field: &'static str, reason: String },

    #[error("You can upload at most {max} images")]
    TooManyImages { max: usize },

    #[error("{file} must be {expected} file")]
    WrongMediaType { file: String, expected: &'static str },

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password cannot be reset for Google accounts")]
    GoogleAccount,

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Parent must be an existing main category")]
    InvalidParentCategory,

    #[error("A category with sub-categories cannot have a parent")]
    ParentOfSubCategories,

    #[error("End date cannot be before start date")]
    EndBeforeStart,

    #[error("Select at least one display location")]
    NoDisplayLocation,
}

/// Trimmed value of a required text field.
///
/// # Errors
///
/// [`ValidationError::Required`] when blank.
pub fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(value)
    }
}

/// Parse a required, strictly positive amount.
///
/// # Errors
///
/// `Required`, `NotANumber` or `NotPositive`.
pub fn positive_price(field: &'static str, raw: &str) -> Result<Price, ValidationError> {
    let price = Price::parse(required(field, raw)?).map_err(|e| match e {
        PriceError::Negative => ValidationError::NotPositive(field),
        PriceError::Invalid(_) => ValidationError::NotANumber {
            field,
            reason: e.to_string(),
        },
    })?;
    if price.is_positive() {
        Ok(price)
    } else {
        Err(ValidationError::NotPositive(field))
    }
}

/// Parse a stock count; blank means zero.
///
/// # Errors
///
/// `NotANumber` or `NegativeStock`.
pub fn stock(raw: &str) -> Result<i64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    let value: i64 = raw.parse().map_err(|e: std::num::ParseIntError| ValidationError::NotANumber {
        field: "Stock",
        reason: e.to_string(),
    })?;
    if value < 0 {
        return Err(ValidationError::NegativeStock);
    }
    Ok(value)
}

/// Check a new password and its confirmation.
///
/// # Errors
///
/// `PasswordTooShort` or `PasswordMismatch`.
pub fn new_password(password: &SecretString, confirm: &SecretString) -> Result<(), ValidationError> {
    if password.expose_secret().chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort { min: MIN_PASSWORD_LEN });
    }
    if password.expose_secret() != confirm.expose_secret() {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("Name", "  Lamp "), Ok("Lamp"));
        assert_eq!(required("Name", "   "), Err(ValidationError::Required("Name")));
    }

    #[test]
    fn test_positive_price() {
        assert_eq!(positive_price("Price", "10.5").unwrap().to_string(), "10.50");
        assert_eq!(positive_price("Price", "0"), Err(ValidationError::NotPositive("Price")));
        assert_eq!(positive_price("Price", "-3"), Err(ValidationError::NotPositive("Price")));
        assert!(matches!(
            positive_price("Price", "ten"),
            Err(ValidationError::NotANumber { field: "Price", .. })
        ));
    }

    #[test]
    fn test_stock() {
        assert_eq!(stock(""), Ok(0));
        assert_eq!(stock("12"), Ok(12));
        assert_eq!(stock("-1"), Err(ValidationError::NegativeStock));
        assert!(stock("1.5").is_err());
    }

    #[test]
    fn test_new_password() {
        let short = SecretString::from("abc");
        let good = SecretString::from("abcdef");
        let other = SecretString::from("abcdeg");
        assert_eq!(
            new_password(&short, &short),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
        assert_eq!(new_password(&good, &other), Err(ValidationError::PasswordMismatch));
        assert!(new_password(&good, &good).is_ok());
    }
}

//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate that a text field is present
pub fn validate_required(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }

    Ok(())
}

/// Validate a price: finite and not negative
pub fn validate_price(price: f64) -> Result<(), String> {
    if !price.is_finite() || price < 0.0 {
        return Err("Price must be a non-negative number".to_string());
    }

    Ok(())
}

/// Validate a stock or order quantity
pub fn validate_quantity(quantity: i64, allow_zero: bool) -> Result<(), String> {
    if quantity < 0 || (!allow_zero && quantity == 0) {
        return Err(if allow_zero {
            "Quantity must not be negative".to_string()
        } else {
            "Quantity must be at least 1".to_string()
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("chef@dishdynamo.app").is_ok());
        assert!(validate_email("first.last+tag@mail.co").is_ok());
        assert_eq!(validate_email(""), Err("Email is required".to_string()));
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_validate_numbers() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(-0.5).is_err());
        assert!(validate_price(f64::NAN).is_err());

        assert!(validate_quantity(0, true).is_ok());
        assert!(validate_quantity(0, false).is_err());
        assert!(validate_quantity(-1, true).is_err());
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("foodName", "Ramen").is_ok());
        assert_eq!(
            validate_required("foodName", "   "),
            Err("foodName is required".to_string())
        );
    }
}

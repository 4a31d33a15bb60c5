//! Client-side field validators.
//!
//! Each validator returns `Ok(())` or an operator-facing message; forms attach the field name
//! and collect the results into [`FieldError`](crate::errors::FieldError)s.

use regex::Regex;
use std::sync::LazyLock;

pub type FieldResult = std::result::Result<(), String>;

static SA_PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\+27|0)[1-9]\d{8}$").expect("valid regex"));

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid regex"));

static USER_GROUP_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{2,3}\d{2,3}$").expect("valid regex"));

static LOCATION_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{2,3}\d{2,3}L\d{3}$").expect("valid regex"));

static USERNAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._\-]{3,50}$").expect("valid regex"));

static POSTAL_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}$").expect("valid regex"));

pub fn required(value: &str) -> FieldResult {
    if value.trim().is_empty() {
        return Err("This field is required".to_string());
    }
    Ok(())
}

pub fn max_length(value: &str, max: usize) -> FieldResult {
    if value.chars().count() > max {
        return Err(format!("Must be at most {max} characters"));
    }
    Ok(())
}

/// South African phone number: `0XXXXXXXXX` or `+27XXXXXXXXX`. Spaces and hyphens are ignored.
///
/// An empty value fails only when `required` is set.
pub fn sa_phone(value: &str, required: bool) -> FieldResult {
    let normalized: String = value.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
    if normalized.is_empty() {
        return if required {
            Err("Phone number is required".to_string())
        } else {
            Ok(())
        };
    }
    if SA_PHONE.is_match(&normalized) {
        Ok(())
    } else {
        Err("Enter a valid South African phone number (e.g. 0821234567 or +27821234567)".to_string())
    }
}

/// Optional email address; empty is accepted.
pub fn email(value: &str) -> FieldResult {
    let value = value.trim();
    if value.is_empty() || EMAIL.is_match(value) {
        Ok(())
    } else {
        Err("Enter a valid email address".to_string())
    }
}

/// 13-digit South African ID number with a valid Luhn check digit.
pub fn rsa_id_number(value: &str) -> FieldResult {
    let value = value.trim();
    if value.len() != 13 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err("ID number must be exactly 13 digits".to_string());
    }
    if luhn_valid(value) {
        Ok(())
    } else {
        Err("ID number check digit is invalid".to_string())
    }
}

fn luhn_valid(digits: &str) -> bool {
    let sum: u32 = digits
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

pub fn user_group_code(value: &str) -> FieldResult {
    if USER_GROUP_CODE.is_match(value.trim()) {
        Ok(())
    } else {
        Err("Code must be a province code followed by two or three digits (e.g. WC01)".to_string())
    }
}

pub fn location_code(value: &str) -> FieldResult {
    if LOCATION_CODE.is_match(value.trim()) {
        Ok(())
    } else {
        Err("Code must be a user group code, 'L' and three digits (e.g. WC01L001)".to_string())
    }
}

pub fn username(value: &str) -> FieldResult {
    if USERNAME.is_match(value.trim()) {
        Ok(())
    } else {
        Err("Username must be 3-50 letters, digits, dots, dashes or underscores".to_string())
    }
}

/// Optional four-digit postal code.
pub fn postal_code(value: &str) -> FieldResult {
    let value = value.trim();
    if value.is_empty() || POSTAL_CODE.is_match(value) {
        Ok(())
    } else {
        Err("Postal code must be four digits".to_string())
    }
}

pub fn password(value: &str) -> FieldResult {
    if value.chars().count() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if !value.chars().any(|c| c.is_ascii_digit()) || !value.chars().any(char::is_alphabetic) {
        return Err("Password must contain letters and digits".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sa_phone() {
        assert!(sa_phone("0821234567", true).is_ok());
        assert!(sa_phone("+27821234567", true).is_ok());
        assert!(sa_phone("082 123-4567", true).is_ok());
        assert!(sa_phone("12345", true).is_err());
        assert!(sa_phone("0021234567", true).is_err());
    }

    #[test]
    fn test_sa_phone_empty() {
        assert!(sa_phone("", true).is_err());
        assert!(sa_phone("", false).is_ok());
        assert!(sa_phone("  ", false).is_ok());
    }

    #[test]
    fn test_rsa_id_number() {
        assert!(rsa_id_number("8001015009087").is_ok());
        assert_eq!(
            rsa_id_number("8001015009086").unwrap_err(),
            "ID number check digit is invalid"
        );
        assert!(rsa_id_number("800101500908").is_err());
        assert!(rsa_id_number("80010150090AB").is_err());
    }

    #[test]
    fn test_codes() {
        assert!(user_group_code("WC01").is_ok());
        assert!(user_group_code("KZN12").is_ok());
        assert!(user_group_code("W1").is_err());
        assert!(location_code("WC01L001").is_ok());
        assert!(location_code("WC01001").is_err());
    }

    #[test]
    fn test_three_digit_group_codes() {
        assert!(user_group_code("WC100").is_ok());
        assert!(user_group_code("WC1000").is_err());
        assert!(location_code("WC100L001").is_ok());
        assert!(location_code("KZN100L999").is_ok());
        assert!(location_code("WC100L01").is_err());
    }

    #[test]
    fn test_optional_fields() {
        assert!(email("").is_ok());
        assert!(email("jane@example.gov.za").is_ok());
        assert!(email("jane@").is_err());
        assert!(postal_code("").is_ok());
        assert!(postal_code("8001").is_ok());
        assert!(postal_code("80011").is_err());
    }

    #[test]
    fn test_required_and_length() {
        assert!(required(" ").is_err());
        assert!(required("x").is_ok());
        assert!(max_length("abcd", 3).is_err());
        assert!(max_length("abc", 3).is_ok());
    }

    #[test]
    fn test_password() {
        assert!(password("short1").is_err());
        assert!(password("longenough").is_err());
        assert!(password("longenough1").is_ok());
    }
}

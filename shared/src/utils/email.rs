//! Email address utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Pragmatic address check: one @, non-empty local part, dotted domain.
// Full RFC 5321 validation is the SMTP relay's problem.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap()
});

/// Normalize an email address for storage and lookup keys
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Check whether an address is syntactically plausible
pub fn is_valid_email(email: &str) -> bool {
    let normalized = normalize_email(email);
    normalized.len() <= 254 && EMAIL_REGEX.is_match(&normalized)
}

/// Check whether a submitted verification code is exactly six ASCII digits
pub fn is_valid_code_format(code: &str) -> bool {
    code.len() == 6 && code.chars().all(|c| c.is_ascii_digit())
}

/// Mask an email address for logging (e.g., `jo****@example.com`)
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let visible = local.chars().take(2).collect::<String>();
            format!("{}****@{}", visible, domain)
        }
        _ => "****".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
        assert_eq!(normalize_email("a@b.co"), "a@b.co");
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@domain"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@.com"));
    }

    #[test]
    fn test_is_valid_code_format() {
        assert!(is_valid_code_format("123456"));
        assert!(is_valid_code_format("000000"));
        assert!(!is_valid_code_format("12345"));
        assert!(!is_valid_code_format("1234567"));
        assert!(!is_valid_code_format("12345a"));
        assert!(!is_valid_code_format("12 456"));
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("john.doe@example.com"), "jo****@example.com");
        assert_eq!(mask_email("a@b.co"), "a****@b.co");
        assert_eq!(mask_email("broken"), "****");
    }
}

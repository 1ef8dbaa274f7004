//! Format validators and phone-number helpers

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d\s\-\(\)\+\.]{10,}$").expect("valid phone pattern"));

static ZIP_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("valid zip pattern"));

/// Check an email address against the standard local@domain.tld shape
pub fn is_valid_email(email: &str) -> bool {
    !email.trim().is_empty() && EMAIL_RE.is_match(email)
}

/// Check a phone number: at least ten characters of digits and punctuation
pub fn is_valid_phone(phone: &str) -> bool {
    !phone.trim().is_empty() && PHONE_RE.is_match(phone)
}

/// Check a US zip code (`#####` or `#####-####`)
pub fn is_valid_zip_code(zip_code: &str) -> bool {
    !zip_code.trim().is_empty() && ZIP_CODE_RE.is_match(zip_code)
}

/// Format a phone number as `(###) ###-####` where possible
///
/// Ten-digit numbers and eleven-digit numbers with a leading 1 are
/// reformatted; anything else is returned unchanged.
pub fn format_phone_number(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        10 => format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..10]),
        11 if digits.starts_with('1') => {
            format!("+1 ({}) {}-{}", &digits[1..4], &digits[4..7], &digits[7..11])
        }
        _ => phone.to_string(),
    }
}

/// Strip a phone number down to its digits
pub fn clean_phone_number(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_email_shapes() {
        assert!(is_valid_email("dispatch@acme-alarm.com"));
        assert!(is_valid_email("first.last+tag@example.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn accepts_phone_punctuation() {
        assert!(is_valid_phone("(555) 123-4567"));
        assert!(is_valid_phone("555.123.4567"));
        assert!(is_valid_phone("+1 555 123 4567"));
        assert!(!is_valid_phone("555-1234"));
        assert!(!is_valid_phone("call me"));
    }

    #[test]
    fn zip_code_allows_plus_four() {
        assert!(is_valid_zip_code("04401"));
        assert!(is_valid_zip_code("04401-1234"));
        assert!(!is_valid_zip_code("4401"));
        assert!(!is_valid_zip_code("04401-12"));
    }

    #[test]
    fn formats_ten_digit_numbers() {
        assert_eq!(format_phone_number("5551234567"), "(555) 123-4567");
        assert_eq!(format_phone_number("15551234567"), "+1 (555) 123-4567");
        // Unrecognized lengths pass through untouched
        assert_eq!(format_phone_number("867-5309"), "867-5309");
    }

    #[test]
    fn clean_strips_everything_but_digits() {
        assert_eq!(clean_phone_number("(555) 123-4567"), "5551234567");
        assert_eq!(clean_phone_number(""), "");
    }
}

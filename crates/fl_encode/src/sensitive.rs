use std::sync::LazyLock;

use regex::Regex;

const KEYWORDS: &[&str] = &[
    "password",
    "passwd",
    "pwd",
    "secret",
    "token",
    "key",
    "credential",
    "auth",
    "private",
    "credit",
    "ssn",
    "phone",
    "email",
    "address",
    "card",
    "bank",
];

static PHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{11}").expect("valid regex"));

static CARD_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4}").expect("valid regex")
});

/// Whether a field's rendered value should be hidden from an error message.
///
/// Looks at the field name first, then at the value's shape: email-like,
/// an eleven digit run or a card number.
pub(crate) fn is_sensitive(field: &str, value: &str) -> bool {
    let field = field.to_lowercase();
    if KEYWORDS.iter().any(|keyword| field.contains(keyword)) {
        return true;
    }
    (value.contains('@') && value.contains('.'))
        || PHONE_NUMBER.is_match(value)
        || CARD_NUMBER.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::is_sensitive;

    #[test]
    fn by_field_name() {
        assert!(is_sensitive("UserPassword", "x"));
        assert!(is_sensitive("api_key", "x"));
        assert!(is_sensitive("home_address", "x"));
        assert!(!is_sensitive("count", "42"));
    }

    #[test]
    fn by_value_shape() {
        assert!(is_sensitive("contact", "bob@example.com"));
        assert!(is_sensitive("note", "call 13812345678"));
        assert!(is_sensitive("note", "4111-1111-1111-1111"));
        assert!(is_sensitive("note", "4111 1111 1111 1111"));
        assert!(!is_sensitive("note", "1234-5678"));
        assert!(!is_sensitive("amount", "12.50"));
    }
}

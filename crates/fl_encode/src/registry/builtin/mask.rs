/// `phone`: eleven characters keep the first 3 and last 4.
pub(super) fn phone(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() != 11 {
        return "***".to_owned();
    }
    let mut out: String = chars[..3].iter().collect();
    out.push_str("****");
    out.extend(&chars[7..]);
    out
}

/// `email`: keeps up to three characters of the local part and the domain.
pub(super) fn email(s: &str) -> String {
    let Some(at) = s.find('@') else {
        return "***".to_owned();
    };
    let local = &s[..at];
    let keep = match local.chars().count() {
        0 => return "***".to_owned(),
        1..=3 => 1,
        _ => 3,
    };
    let mut out: String = local.chars().take(keep).collect();
    out.push_str("***");
    out.push_str(&s[at..]);
    out
}

/// Mask used for unknown mask names and by the global mask switch.
///
/// Four characters or fewer become `****`. Longer strings keep their first
/// and last character. Past eight characters the output is one character
/// shorter than the input.
///
/// ```
/// use fl_encode::registry::default_mask;
///
/// assert_eq!(default_mask("abc"), "****");
/// assert_eq!(default_mask("secret"), "s****t");
/// assert_eq!(default_mask("abcdefghij"), "a*******j");
/// ```
pub fn default_mask(s: &str) -> String {
    let len = s.chars().count();
    if len <= 4 {
        return "****".to_owned();
    }
    let mut chars = s.chars();
    let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
        return "****".to_owned();
    };
    let mut out = String::with_capacity(s.len());
    out.push(first);
    let hidden = if len > 8 { len - 3 } else { len - 2 };
    out.extend(core::iter::repeat_n('*', hidden));
    out.push(last);
    out
}

#[cfg(test)]
mod tests {
    use super::{default_mask, email, phone};

    #[test]
    fn phone_mask() {
        assert_eq!(phone("13812345678"), "138****5678");
        assert_eq!(phone("12345"), "***");
    }

    #[test]
    fn email_mask() {
        assert_eq!(email("alice@example.com"), "ali***@example.com");
        assert_eq!(email("bob@example.com"), "b***@example.com");
        assert_eq!(email("@example.com"), "***");
        assert_eq!(email("no-at-sign"), "***");
        assert!(!email("alice@example.com").contains("alice"));
    }

    #[test]
    fn default_mask_is_char_safe() {
        assert_eq!(default_mask(""), "****");
        assert_eq!(default_mask("密码密码"), "****");
        assert_eq!(default_mask("密码是秘密的"), "密****的");
    }

    #[test]
    fn default_mask_long_strings() {
        assert_eq!(default_mask("abcdefgh"), "a******h");
        assert_eq!(default_mask("abcdefghi"), "a******i");
        assert_eq!(default_mask("abcdefghij"), "a*******j");
    }
}

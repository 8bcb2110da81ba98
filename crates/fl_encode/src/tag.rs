//! Field annotation grammar.
//!
//! ```text
//! name[,omitempty][,inline][,string][,ser=ID][,mask=ID][,precision=N][,format=F][,unit=U]
//! ```
//!
//! A bare `-` excludes the field. Unknown segments are ignored.

/// Options parsed from one field annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
    /// Emitted key.
    pub name: String,
    pub omit_empty: bool,
    /// Splice the field's object into the parent. Only set for struct fields.
    pub inline: bool,
    /// Emit the post-processed value as its display string.
    pub force_string: bool,
    /// Round floats to this many decimal places.
    pub precision: Option<u32>,
    pub mask: Option<String>,
    pub serializer: Option<String>,
    /// Reserved.
    pub format: Option<String>,
    /// Reserved.
    pub unit: Option<String>,
}

/// Parses `tag` for a field declared as `declared_name`.
///
/// Returns `None` when the field is excluded. `is_struct` tells whether the
/// declared type is a struct, which `inline` requires.
///
/// ```
/// use fl_encode::tag::parse_field_options;
///
/// let opts = parse_field_options("email,omitempty,mask=email", "user_email", false).unwrap();
/// assert_eq!(opts.name, "email");
/// assert!(opts.omit_empty);
/// assert_eq!(opts.mask.as_deref(), Some("email"));
///
/// assert!(parse_field_options("-", "password", false).is_none());
/// ```
pub fn parse_field_options(tag: &str, declared_name: &str, is_struct: bool) -> Option<FieldOptions> {
    if tag.trim() == "-" {
        return None;
    }

    let mut segments = tag.split(',').map(str::trim).peekable();
    let mut opts = FieldOptions::default();

    match segments.peek().copied() {
        Some(first) if !first.is_empty() && !first.contains('=') => {
            opts.name = first.to_owned();
            segments.next();
        }
        _ => opts.name = declared_name.to_owned(),
    }

    for segment in segments {
        match segment {
            "omitempty" => opts.omit_empty = true,
            "inline" => opts.inline = is_struct,
            "string" => opts.force_string = true,
            _ => {
                let Some((key, value)) = segment.split_once('=') else {
                    continue;
                };
                let value = value.trim();
                match key.trim() {
                    "ser" => opts.serializer = non_empty(value),
                    "mask" => opts.mask = non_empty(value),
                    "precision" => opts.precision = value.parse().ok(),
                    "format" => opts.format = non_empty(value),
                    "unit" => opts.unit = non_empty(value),
                    _ => {}
                }
            }
        }
    }

    Some(opts)
}

#[inline]
fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::parse_field_options;

    #[test]
    fn full_grammar() {
        let opts = parse_field_options(
            " amount , omitempty, string ,precision=2, ser=currency_usd,format=x,unit=ms,future",
            "amount_field",
            false,
        )
        .unwrap();
        assert_eq!(opts.name, "amount");
        assert!(opts.omit_empty);
        assert!(opts.force_string);
        assert_eq!(opts.precision, Some(2));
        assert_eq!(opts.serializer.as_deref(), Some("currency_usd"));
        assert_eq!(opts.format.as_deref(), Some("x"));
        assert_eq!(opts.unit.as_deref(), Some("ms"));
        assert!(!opts.inline);
    }

    #[test]
    fn missing_name_uses_declared() {
        let opts = parse_field_options(",omitempty", "city", false).unwrap();
        assert_eq!(opts.name, "city");
        assert!(opts.omit_empty);

        let opts = parse_field_options("mask=phone", "mobile", false).unwrap();
        assert_eq!(opts.name, "mobile");
        assert_eq!(opts.mask.as_deref(), Some("phone"));

        let opts = parse_field_options("", "plain", false).unwrap();
        assert_eq!(opts.name, "plain");
    }

    #[test]
    fn inline_requires_struct() {
        assert!(parse_field_options("addr,inline", "addr", true).unwrap().inline);
        assert!(!parse_field_options("addr,inline", "addr", false).unwrap().inline);
    }

    #[test]
    fn bad_precision_is_inactive() {
        for tag in ["n,precision=abc", "n,precision=-1", "n,precision="] {
            assert_eq!(parse_field_options(tag, "n", false).unwrap().precision, None);
        }
        assert_eq!(
            parse_field_options("n,precision=0", "n", false).unwrap().precision,
            Some(0)
        );
    }

    #[test]
    fn dash_excludes_after_trim() {
        assert!(parse_field_options("-", "secret", false).is_none());
        assert!(parse_field_options(" -", "secret", false).is_none());
        assert!(parse_field_options("\t- ", "secret", false).is_none());
        assert_eq!(parse_field_options("-,", "x", false).unwrap().name, "-");
    }

    #[test]
    fn empty_serializer_is_absent() {
        assert_eq!(parse_field_options("x,ser=", "x", false).unwrap().serializer, None);
    }
}

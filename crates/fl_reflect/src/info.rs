use crate::kind::LogKind;
use crate::loggable::Typed;

// -----------------------------------------------------------------------------
// NamedField

/// Static description of one struct field: its declared name, the static
/// kind of its type and its raw annotation strings.
///
/// Annotations are kept verbatim. Parsing them is the encoder's concern.
///
/// # Examples
///
/// ```
/// use fl_reflect::{LogKind, info::NamedField};
///
/// const FIELD: NamedField = NamedField::new::<String>("email")
///     .with_log_tag("email,mask=email");
///
/// assert_eq!(FIELD.name(), "email");
/// assert_eq!(FIELD.kind(), LogKind::Str);
/// assert_eq!(FIELD.log_tag(), Some("email,mask=email"));
/// assert_eq!(FIELD.json_tag(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NamedField {
    name: &'static str,
    kind: LogKind,
    log_tag: Option<&'static str>,
    json_tag: Option<&'static str>,
}

impl NamedField {
    /// Creates a field named `name` of type `T` without annotations.
    #[inline]
    pub const fn new<T: Typed + ?Sized>(name: &'static str) -> Self {
        Self {
            name,
            kind: T::KIND,
            log_tag: None,
            json_tag: None,
        }
    }

    /// Attaches the primary `#[log = "..."]` annotation.
    #[inline]
    pub const fn with_log_tag(mut self, tag: &'static str) -> Self {
        self.log_tag = Some(tag);
        self
    }

    /// Attaches the secondary `#[json = "..."]` annotation.
    #[inline]
    pub const fn with_json_tag(mut self, tag: &'static str) -> Self {
        self.json_tag = Some(tag);
        self
    }

    /// Declared field name. Tuple fields use their index.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Static kind of the declared type.
    #[inline]
    pub const fn kind(&self) -> LogKind {
        self.kind
    }

    #[inline]
    pub const fn log_tag(&self) -> Option<&'static str> {
        self.log_tag
    }

    #[inline]
    pub const fn json_tag(&self) -> Option<&'static str> {
        self.json_tag
    }
}

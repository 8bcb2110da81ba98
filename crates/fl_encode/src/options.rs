use core::fmt;
use core::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

// -----------------------------------------------------------------------------
// Level

/// Severity carried by [`Options`].
///
/// The encoder records the level but never filters on it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Level {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    /// Returns `true` if a message at `other` meets this minimum level.
    #[inline]
    pub fn allows(self, other: Level) -> bool {
        other >= self
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown log level '{0}'")]
pub struct ParseLevelError(String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" | "WARNING" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            "FATAL" => Ok(Self::Fatal),
            _ => Err(ParseLevelError(s.to_owned())),
        }
    }
}

impl TryFrom<String> for Level {
    type Error = ParseLevelError;

    #[inline]
    fn try_from(value: String) -> Result<Self, ParseLevelError> {
        value.parse()
    }
}

// -----------------------------------------------------------------------------
// Options

/// Per-call encoder configuration.
///
/// Built from [`Default`] plus builder calls, then only read.
///
/// ```
/// use fl_encode::{Level, Options};
///
/// let opts = Options::new()
///     .with_indent("", "  ")
///     .with_mask_sensitive(true)
///     .with_level(Level::Debug);
///
/// assert!(opts.enable_error_fallback);
/// assert_eq!(opts.indent, "  ");
/// ```
///
/// `Options` also deserializes from any serde format; missing keys keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Skip `MarshalLog` capabilities.
    pub disable_marshal_log: bool,
    /// Skip the generic JSON path for structs without `#[log]` annotations.
    pub disable_json_fallback: bool,
    /// Treat every field as `omitempty`; empty containers become `null`.
    pub omit_empty_by_default: bool,
    /// Apply the `default` mask to every string field without its own mask.
    pub mask_sensitive: bool,
    /// Replace failing fields with an error string instead of failing.
    pub enable_error_fallback: bool,
    /// Indentation unit; empty means compact output.
    pub indent: String,
    /// Line prefix, only used together with `indent`.
    pub prefix: String,
    pub level: Level,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            disable_marshal_log: false,
            disable_json_fallback: false,
            omit_empty_by_default: false,
            mask_sensitive: false,
            enable_error_fallback: true,
            indent: String::new(),
            prefix: String::new(),
            level: Level::Info,
        }
    }
}

impl Options {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-prints with `indent` per level and `prefix` on every line
    /// after the first.
    pub fn with_indent(mut self, prefix: impl Into<String>, indent: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self.indent = indent.into();
        self
    }

    #[inline]
    pub fn with_mask_sensitive(mut self, enabled: bool) -> Self {
        self.mask_sensitive = enabled;
        self
    }

    #[inline]
    pub fn with_error_fallback(mut self, enabled: bool) -> Self {
        self.enable_error_fallback = enabled;
        self
    }

    #[inline]
    pub fn with_omit_empty(mut self, enabled: bool) -> Self {
        self.omit_empty_by_default = enabled;
        self
    }

    #[inline]
    pub fn with_marshal_log(mut self, enabled: bool) -> Self {
        self.disable_marshal_log = !enabled;
        self
    }

    #[inline]
    pub fn with_json_fallback(mut self, enabled: bool) -> Self {
        self.disable_json_fallback = !enabled;
        self
    }

    #[inline]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Returns `true` when output is pretty-printed.
    #[inline]
    pub fn is_pretty(&self) -> bool {
        !self.indent.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Context

/// Request-scoped data passed to
/// [`marshal_with_context`](crate::marshal_with_context).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Context {
    trace_id: Option<String>,
}

impl Context {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    #[inline]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Applies the trace id as output prefix unless one is already set.
    pub(crate) fn apply(&self, options: &mut Options) {
        if let Some(trace_id) = &self.trace_id
            && options.prefix.is_empty()
        {
            options.prefix = trace_id.clone();
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Context, Level, Options};

    #[test]
    fn defaults_enable_error_fallback() {
        let opts = Options::default();
        assert!(opts.enable_error_fallback);
        assert!(!opts.mask_sensitive);
        assert_eq!(opts.level, Level::Info);
        assert!(!opts.is_pretty());
    }

    #[test]
    fn level_parse_and_order() {
        assert_eq!("warn".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("Fatal".parse::<Level>().unwrap(), Level::Fatal);
        assert!("verbose".parse::<Level>().is_err());
        assert!(Level::Info.allows(Level::Error));
        assert!(!Level::Warn.allows(Level::Debug));
        assert_eq!(Level::Error.to_string(), "ERROR");
    }

    #[test]
    fn level_from_owned_string() {
        assert_eq!(Level::try_from(String::from("error")).unwrap(), Level::Error);
        let err = Level::try_from(String::from("loud")).unwrap_err();
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn deserialize_partial() {
        let opts: Options =
            serde_json::from_str(r#"{"mask_sensitive":true,"level":"debug"}"#).unwrap();
        assert!(opts.mask_sensitive);
        assert!(opts.enable_error_fallback);
        assert_eq!(opts.level, Level::Debug);
    }

    #[test]
    fn trace_id_fills_empty_prefix() {
        let ctx = Context::new().with_trace_id("trace-1");

        let mut opts = Options::new();
        ctx.apply(&mut opts);
        assert_eq!(opts.prefix, "trace-1");

        let mut opts = Options::new().with_indent(">", "  ");
        ctx.apply(&mut opts);
        assert_eq!(opts.prefix, ">");
    }
}

use core::cell::RefCell;
use core::mem;
use std::io::Write;

use fl_reflect::Loggable;

use crate::cache::StructInfoCache;
use crate::error::EncodeError;
use crate::guard::VisitedSet;
use crate::node::Node;
use crate::options::{Context, Options};
use crate::registry::Registry;
use crate::resolve::Resolver;

// -----------------------------------------------------------------------------
// Pooled state

/// Upper bound on idle states kept per thread.
const MAX_POOLED: usize = 8;

thread_local! {
    static POOL: RefCell<Vec<EncoderState>> = const { RefCell::new(Vec::new()) };
}

/// Per-call scratch: the visited set and the output buffer.
#[derive(Debug, Default)]
pub(crate) struct EncoderState {
    visited: VisitedSet,
    buf: Vec<u8>,
}

impl EncoderState {
    fn clear(&mut self) {
        self.visited.clear();
        self.buf.clear();
    }
}

/// An [`EncoderState`] owned by one call, returned to the pool on drop.
pub(crate) struct PooledState {
    state: EncoderState,
}

impl PooledState {
    pub fn acquire() -> Self {
        let pooled = POOL
            .try_with(|pool| pool.try_borrow_mut().ok().and_then(|mut pool| pool.pop()))
            .ok()
            .flatten();
        let mut state = pooled.unwrap_or_default();
        state.clear();
        Self { state }
    }
}

impl Drop for PooledState {
    fn drop(&mut self) {
        let mut state = mem::take(&mut self.state);
        state.clear();
        // During thread teardown the pool may be gone; the state is dropped.
        let _ = POOL.try_with(|pool| {
            if let Ok(mut pool) = pool.try_borrow_mut()
                && pool.len() < MAX_POOLED
            {
                pool.push(state);
            }
        });
    }
}

// -----------------------------------------------------------------------------
// Encoder

/// Encodes [`Loggable`] values to JSON with a given registry and options.
///
/// The free functions of this crate use [`Registry::global`]; build an
/// `Encoder` to use a private registry.
///
/// # Examples
///
/// ```
/// use fl_encode::{Encoder, Options, Registry};
/// use fl_reflect::derive::Loggable;
///
/// #[derive(Loggable)]
/// struct Order {
///     #[log = "id"]
///     id: u64,
///     #[log = "total,ser=cents"]
///     total: i64,
/// }
///
/// let registry = Registry::new();
/// registry.register_serializer("cents", |v: &dyn fl_reflect::Loggable| {
///     let cents = v.downcast_ref::<i64>().copied().unwrap_or_default();
///     Ok(format!("\"{}.{:02}\"", cents / 100, cents % 100).into_bytes())
/// });
///
/// let encoder = Encoder::new(&registry).with_options(Options::default());
/// let out = encoder.marshal(&Order { id: 7, total: 1999 }).unwrap();
/// assert_eq!(out, br#"{"id":7,"total":"19.99"}"#);
/// ```
#[derive(Debug, Clone)]
pub struct Encoder<'r> {
    registry: &'r Registry,
    options: Options,
}

impl<'r> Encoder<'r> {
    /// Creates an encoder with default options.
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            options: Options::default(),
        }
    }

    #[inline]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[inline]
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Encodes `value` to JSON bytes, without a trailing newline.
    pub fn marshal(&self, value: &dyn Loggable) -> Result<Vec<u8>, EncodeError> {
        let mut state = PooledState::acquire();
        self.encode_into(value, &self.options, &mut state.state)?;
        Ok(state.state.buf.clone())
    }

    /// Like [`marshal`](Self::marshal); the context's trace id becomes the
    /// line prefix when the options carry none.
    pub fn marshal_with_context(
        &self,
        ctx: &Context,
        value: &dyn Loggable,
    ) -> Result<Vec<u8>, EncodeError> {
        let mut options = self.options.clone();
        ctx.apply(&mut options);
        let mut state = PooledState::acquire();
        self.encode_into(value, &options, &mut state.state)?;
        Ok(state.state.buf.clone())
    }

    /// Encodes `value` and writes it to `writer`.
    ///
    /// Nothing is written if encoding fails.
    pub fn marshal_to<W: Write>(&self, mut writer: W, value: &dyn Loggable) -> Result<(), EncodeError> {
        let mut state = PooledState::acquire();
        self.encode_into(value, &self.options, &mut state.state)?;
        writer.write_all(&state.state.buf)?;
        Ok(())
    }

    /// Resolves `value` to the intermediate tree without writing it.
    pub fn to_node(&self, value: &dyn Loggable) -> Result<Node, EncodeError> {
        let mut state = PooledState::acquire();
        self.resolve(value, &self.options, &mut state.state.visited)
    }

    fn resolve(
        &self,
        value: &dyn Loggable,
        options: &Options,
        visited: &mut VisitedSet,
    ) -> Result<Node, EncodeError> {
        Resolver::new(options, self.registry, StructInfoCache::global(), visited).resolve(value)
    }

    fn encode_into(
        &self,
        value: &dyn Loggable,
        options: &Options,
        state: &mut EncoderState,
    ) -> Result<(), EncodeError> {
        let node = self.resolve(value, options, &mut state.visited)?;
        write_node(&node, options, &mut state.buf)
    }
}

impl Default for Encoder<'static> {
    fn default() -> Self {
        Self::new(Registry::global())
    }
}

/// Writes compact JSON, or indented JSON with `prefix` starting every line
/// but the first.
fn write_node(node: &Node, options: &Options, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
    if !options.is_pretty() {
        return serde_json::to_writer(&mut *buf, node).map_err(EncodeError::Json);
    }

    // Indenting the finished text also lays out raw leaves.
    let mut compact = Vec::with_capacity(128);
    serde_json::to_writer(&mut compact, node).map_err(EncodeError::Json)?;
    indent_json(&compact, options.prefix.as_bytes(), options.indent.as_bytes(), buf);
    Ok(())
}

/// Lays out JSON text one member per line. Whitespace outside strings is
/// dropped and empty containers stay on one line.
fn indent_json(src: &[u8], prefix: &[u8], indent: &[u8], out: &mut Vec<u8>) {
    let newline = |out: &mut Vec<u8>, depth: usize| {
        out.push(b'\n');
        out.extend_from_slice(prefix);
        for _ in 0..depth {
            out.extend_from_slice(indent);
        }
    };

    let mut depth = 0_usize;
    let mut in_string = false;
    let mut escaped = false;
    // An opening bracket waiting to see whether its container is empty.
    let mut opened = false;

    for &byte in src {
        if in_string {
            out.push(byte);
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        if byte.is_ascii_whitespace() {
            continue;
        }
        if opened {
            opened = false;
            if matches!(byte, b'}' | b']') {
                out.push(byte);
                continue;
            }
            depth += 1;
            newline(out, depth);
        }
        match byte {
            b'"' => {
                in_string = true;
                out.push(byte);
            }
            b'{' | b'[' => {
                out.push(byte);
                opened = true;
            }
            b'}' | b']' => {
                depth = depth.saturating_sub(1);
                newline(out, depth);
                out.push(byte);
            }
            b',' => {
                out.push(byte);
                newline(out, depth);
            }
            b':' => out.extend_from_slice(b": "),
            _ => out.push(byte),
        }
    }
}

// -----------------------------------------------------------------------------
// Free functions

/// Encodes `value` with default options and the global registry.
///
/// ```
/// use fl_reflect::derive::Loggable;
///
/// #[derive(Loggable)]
/// struct Login {
///     #[log = "user"]
///     user: String,
///     #[log = "-"]
///     password: String,
/// }
///
/// let out = fl_encode::marshal(&Login {
///     user: "alice".into(),
///     password: "hunter2".into(),
/// })
/// .unwrap();
/// assert_eq!(out, br#"{"user":"alice"}"#);
/// ```
pub fn marshal(value: &dyn Loggable) -> Result<Vec<u8>, EncodeError> {
    Encoder::default().marshal(value)
}

/// Encodes `value` with `options` and the global registry.
pub fn marshal_with(value: &dyn Loggable, options: &Options) -> Result<Vec<u8>, EncodeError> {
    Encoder::default().with_options(options.clone()).marshal(value)
}

/// See [`Encoder::marshal_with_context`].
pub fn marshal_with_context(
    ctx: &Context,
    value: &dyn Loggable,
    options: &Options,
) -> Result<Vec<u8>, EncodeError> {
    Encoder::default()
        .with_options(options.clone())
        .marshal_with_context(ctx, value)
}

/// See [`Encoder::marshal_to`].
pub fn marshal_to<W: Write>(
    writer: W,
    value: &dyn Loggable,
    options: &Options,
) -> Result<(), EncodeError> {
    Encoder::default().with_options(options.clone()).marshal_to(writer, value)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::thread;

    use fl_reflect::derive::Loggable;
    use fl_reflect::{BoxError, MarshalLog};

    use super::{POOL, PooledState, indent_json};
    use crate::{
        Context, Encoder, Options, Registry, marshal, marshal_to, marshal_with, marshal_with_context,
    };

    #[derive(Loggable)]
    struct Doc {
        #[log = "a"]
        a: i32,
        #[log = "b"]
        b: Vec<i32>,
    }

    fn doc() -> Doc {
        Doc { a: 1, b: vec![1, 2] }
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn compact_without_trailing_newline() {
        assert_eq!(text(marshal(&doc()).unwrap()), r#"{"a":1,"b":[1,2]}"#);
    }

    #[test]
    fn pretty_with_prefix() {
        let opts = Options::default().with_indent("", "  ");
        assert_eq!(
            text(marshal_with(&doc(), &opts).unwrap()),
            "{\n  \"a\": 1,\n  \"b\": [\n    1,\n    2\n  ]\n}"
        );

        let opts = Options::default().with_indent(">>", "\t");
        assert_eq!(
            text(marshal_with(&doc(), &opts).unwrap()),
            "{\n>>\t\"a\": 1,\n>>\t\"b\": [\n>>\t\t1,\n>>\t\t2\n>>\t]\n>>}"
        );

        // A prefix alone does not turn on pretty output.
        let opts = Options::default().with_indent(">>", "");
        assert_eq!(text(marshal_with(&doc(), &opts).unwrap()), r#"{"a":1,"b":[1,2]}"#);
    }

    #[test]
    fn indent_keeps_strings_and_empty_containers() {
        let mut out = Vec::new();
        indent_json(br#"{"s":"a{\"b, c:","e":[],"o":{ }}"#, b"", b" ", &mut out);
        assert_eq!(text(out), "{\n \"s\": \"a{\\\"b, c:\",\n \"e\": [],\n \"o\": {}\n}");
    }

    #[derive(Loggable)]
    #[log(marshal_log)]
    struct Spaced;

    impl MarshalLog for Spaced {
        fn marshal_log(&self) -> Result<Vec<u8>, BoxError> {
            Ok(b"{ \"x\": 1,\n  \"y\": [1, 2] }".to_vec())
        }
    }

    #[derive(Loggable)]
    struct Outer {
        #[log = "inner"]
        inner: Spaced,
    }

    #[test]
    fn raw_leaves_are_indented() {
        let opts = Options::default().with_indent(">", "  ");
        assert_eq!(
            text(marshal_with(&Outer { inner: Spaced }, &opts).unwrap()),
            "{\n>  \"inner\": {\n>    \"x\": 1,\n>    \"y\": [\n>      1,\n>      2\n>    ]\n>  }\n>}"
        );
        assert_eq!(
            text(marshal(&Outer { inner: Spaced }).unwrap()),
            r#"{"inner":{ "x": 1,
  "y": [1, 2] }}"#
        );
    }

    #[test]
    fn context_trace_id_becomes_prefix() {
        let ctx = Context::new().with_trace_id("trace-1");
        let pretty = Options::default().with_indent("", " ");
        assert_eq!(text(marshal_with_context(&ctx, &5_i32, &pretty).unwrap()), "5");
        assert_eq!(
            text(marshal_with_context(&ctx, &vec![1], &pretty).unwrap()),
            "[\ntrace-1 1\ntrace-1]"
        );

        let explicit = Options::default().with_indent("$", " ");
        assert_eq!(
            text(marshal_with_context(&ctx, &vec![1], &explicit).unwrap()),
            "[\n$ 1\n$]"
        );

        let compact = Options::default();
        assert_eq!(
            text(marshal_with_context(&ctx, &vec![1], &compact).unwrap()),
            "[1]"
        );
        assert_eq!(
            text(marshal_with_context(&Context::new(), &vec![1], &pretty).unwrap()),
            "[\n 1\n]"
        );
    }

    #[test]
    fn writes_to_writer() {
        let mut out = Vec::new();
        marshal_to(&mut out, &doc(), &Options::default()).unwrap();
        assert_eq!(text(out), r#"{"a":1,"b":[1,2]}"#);
    }

    #[derive(Loggable)]
    #[log(marshal_log)]
    struct Nested {
        inner: Doc,
    }

    impl MarshalLog for Nested {
        fn marshal_log(&self) -> Result<Vec<u8>, BoxError> {
            let inner = marshal(&self.inner)?;
            let mut out = b"{\"wrapped\":".to_vec();
            out.extend_from_slice(&inner);
            out.push(b'}');
            Ok(out)
        }
    }

    #[test]
    fn reentrant_encoding() {
        let value = Nested { inner: doc() };
        assert_eq!(
            text(marshal(&value).unwrap()),
            r#"{"wrapped":{"a":1,"b":[1,2]}}"#
        );
    }

    #[test]
    fn pooled_states_are_cleared() {
        {
            let _first = PooledState::acquire();
            let _second = PooledState::acquire();
        }
        marshal(&doc()).unwrap();
        POOL.with(|pool| {
            let pool = pool.borrow();
            assert!(!pool.is_empty());
            assert!(pool.iter().all(|s| s.visited.is_empty() && s.buf.is_empty()));
        });
    }

    #[test]
    fn concurrent_calls() {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                thread::spawn(move || {
                    let value = Doc { a: i, b: vec![i; 3] };
                    (0..50)
                        .map(|_| text(marshal(&value).unwrap()))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let expected = format!(r#"{{"a":{i},"b":[{i},{i},{i}]}}"#);
            assert!(handle.join().unwrap().iter().all(|out| *out == expected));
        }
    }

    #[test]
    fn private_registry_and_node() {
        let registry = Registry::new();
        let encoder = Encoder::new(&registry);
        let node = encoder.to_node(&doc()).unwrap();
        assert_eq!(node.to_json_string(), r#"{"a":1,"b":[1,2]}"#);
        assert!(registry.serializer("currency").is_none());
    }
}

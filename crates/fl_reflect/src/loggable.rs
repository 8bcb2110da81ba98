use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::error::Error;

use crate::kind::{LogKind, LogRef};

/// Error type returned by user capabilities and serializer functions.
pub type BoxError = Box<dyn Error + Send + Sync>;

// -----------------------------------------------------------------------------
// Loggable

/// A value the structured encoder can inspect.
///
/// The required methods classify the value; the `reflect_*` hooks expose
/// optional capabilities and return `None` unless the type opts in. Use
/// `#[derive(Loggable)]` for structs and enums, which wires the hooks to
/// [`ConditionalLog`], [`MarshalLog`], [`MarshalJson`] and [`IsZero`] through
/// `#[log(...)]` flags.
///
/// ```
/// use fl_reflect::{Loggable, LogRef};
///
/// let v: &dyn Loggable = &42_u8;
/// assert!(matches!(v.log_ref(), LogRef::Uint(42)));
/// assert_eq!(v.downcast_ref::<u8>(), Some(&42));
/// ```
///
/// [`ConditionalLog`]: crate::ConditionalLog
/// [`MarshalLog`]: crate::MarshalLog
/// [`MarshalJson`]: crate::MarshalJson
/// [`IsZero`]: crate::IsZero
pub trait Loggable: Any {
    /// Casts to a trait object. Works for unsized implementors too.
    fn as_loggable(&self) -> &dyn Loggable;

    /// Returns the classified view of the value.
    fn log_ref(&self) -> LogRef<'_>;

    /// Full type name, as given by [`core::any::type_name`].
    #[inline]
    fn type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    /// `TypeId` of the concrete type, even through `dyn Loggable`.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Conditional emission. `Some(false)` suppresses the value.
    #[inline]
    fn reflect_should_log(&self) -> Option<bool> {
        None
    }

    /// Custom encoding that replaces everything else for this value.
    ///
    /// The returned bytes must be a complete JSON text.
    #[inline]
    fn reflect_marshal_log(&self) -> Option<Result<Vec<u8>, BoxError>> {
        None
    }

    /// Generic JSON encoding, consulted only when a struct carries no
    /// `#[log]` field annotations or for opaque values.
    #[inline]
    fn reflect_marshal_json(&self) -> Option<Result<Vec<u8>, BoxError>> {
        None
    }

    /// Emptiness override used by `omitempty`.
    #[inline]
    fn reflect_is_zero(&self) -> Option<bool> {
        None
    }
}

impl dyn Loggable {
    /// Returns `true` if the underlying value is a `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts the underlying value to `T`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }

    /// The type name with module paths removed, e.g. `Vec<String>`.
    pub fn short_type_name(&self) -> String {
        short_type_name(self.type_name())
    }
}

// -----------------------------------------------------------------------------
// Typed

/// Static kind of a type.
///
/// Every type used as a field of a derived struct implements it, so field
/// descriptors can be built in a `const` context.
pub trait Typed: Loggable {
    const KIND: LogKind;
}

// -----------------------------------------------------------------------------
// Helpers

/// Strips module paths from a type name.
///
/// ```
/// assert_eq!(
///     fl_reflect::short_type_name("alloc::vec::Vec<alloc::string::String>"),
///     "Vec<String>",
/// );
/// assert_eq!(fl_reflect::short_type_name("i32"), "i32");
/// ```
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    // Start of the path currently being written to `out`.
    let mut path_start = 0;
    let mut rest = full;
    while let Some(ch) = rest.chars().next() {
        if let Some(tail) = rest.strip_prefix("::") {
            out.truncate(path_start);
            rest = tail;
            continue;
        }
        out.push(ch);
        if !(ch.is_alphanumeric() || ch == '_') {
            path_start = out.len();
        }
        rest = &rest[ch.len_utf8()..];
    }
    out
}

// -----------------------------------------------------------------------------
// Auxiliary macro

/// Implements `as_loggable` and `log_ref` for a kind whose `LogRef`
/// variant borrows `self`.
macro_rules! impl_loggable_cast_fn {
    ($kind:ident) => {
        #[inline]
        fn as_loggable(&self) -> &dyn $crate::Loggable {
            self
        }

        #[inline]
        fn log_ref(&self) -> $crate::LogRef<'_> {
            $crate::LogRef::$kind(self)
        }
    };
}

pub(crate) use impl_loggable_cast_fn;

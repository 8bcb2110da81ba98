use core::fmt;

use crate::ops::{List, Map, Pointer, Struct};

// -----------------------------------------------------------------------------
// LogKind

/// The shape of a [`Loggable`](crate::Loggable) value, without the value.
///
/// Available statically through [`Typed::KIND`](crate::Typed::KIND), which
/// lets field descriptors record whether a field's declared type is a struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    Null,
    Bool,
    Int,
    Uint,
    Float32,
    Float64,
    Str,
    Pointer,
    Struct,
    List,
    Map,
    Opaque,
}

impl LogKind {
    /// Returns `true` for the primitive leaf kinds.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Int | Self::Uint | Self::Float32 | Self::Float64 | Self::Str
        )
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Str => "string",
            Self::Pointer => "pointer",
            Self::Struct => "struct",
            Self::List => "list",
            Self::Map => "map",
            Self::Opaque => "opaque",
        };
        f.write_str(name)
    }
}

// -----------------------------------------------------------------------------
// LogRef

/// A borrowed, classified view of a value.
///
/// Integers of every width widen to `Int`/`Uint`. Everything the encoder
/// cannot look into (functions, handles, foreign types) is `Opaque`.
#[derive(Clone, Copy)]
pub enum LogRef<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float32(f32),
    Float64(f64),
    Str(&'a str),
    Pointer(&'a dyn Pointer),
    Struct(&'a dyn Struct),
    List(&'a dyn List),
    Map(&'a dyn Map),
    Opaque,
}

impl LogRef<'_> {
    /// Returns the kind of this view.
    pub const fn kind(&self) -> LogKind {
        match self {
            Self::Null => LogKind::Null,
            Self::Bool(_) => LogKind::Bool,
            Self::Int(_) => LogKind::Int,
            Self::Uint(_) => LogKind::Uint,
            Self::Float32(_) => LogKind::Float32,
            Self::Float64(_) => LogKind::Float64,
            Self::Str(_) => LogKind::Str,
            Self::Pointer(_) => LogKind::Pointer,
            Self::Struct(_) => LogKind::Struct,
            Self::List(_) => LogKind::List,
            Self::Map(_) => LogKind::Map,
            Self::Opaque => LogKind::Opaque,
        }
    }

    /// Reads any numeric view as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Int(v) => Some(v as f64),
            Self::Uint(v) => Some(v as f64),
            Self::Float32(v) => Some(v as f64),
            Self::Float64(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Debug for LogRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "Bool({v})"),
            Self::Int(v) => write!(f, "Int({v})"),
            Self::Uint(v) => write!(f, "Uint({v})"),
            Self::Float32(v) => write!(f, "Float32({v})"),
            Self::Float64(v) => write!(f, "Float64({v})"),
            Self::Str(v) => write!(f, "Str({v:?})"),
            Self::Pointer(v) => write!(f, "Pointer({})", v.type_name()),
            Self::Struct(v) => write!(f, "Struct({})", v.type_name()),
            Self::List(v) => write!(f, "List({})", v.type_name()),
            Self::Map(v) => write!(f, "Map({})", v.type_name()),
            other => fmt::Display::fmt(&other.kind(), f),
        }
    }
}

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Derived code names this crate as `fl_reflect`, also inside the crate itself.
extern crate self as fl_reflect;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod capability;
mod kind;
mod loggable;

pub mod impls;
pub mod info;
pub mod ops;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use capability::{ConditionalLog, IsZero, MarshalJson, MarshalLog};
pub use fl_reflect_derive as derive;
pub use kind::{LogKind, LogRef};
pub use loggable::{BoxError, Loggable, Typed, short_type_name};
pub use ops::{List, Map, Pointer, Struct};

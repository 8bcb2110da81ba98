//! Capabilities a type can opt into through `#[log(...)]` on its derive.
//!
//! | flag | trait | hook |
//! | --- | --- | --- |
//! | `conditional` | [`ConditionalLog`] | `reflect_should_log` |
//! | `marshal_log` | [`MarshalLog`] | `reflect_marshal_log` |
//! | `marshal_json` | [`MarshalJson`] | `reflect_marshal_json` |
//! | `serialize` | `serde::Serialize` | `reflect_marshal_json` |
//! | `is_zero` | [`IsZero`] | `reflect_is_zero` |

use alloc::vec::Vec;

use crate::loggable::BoxError;

/// Decides at encode time whether the value is emitted at all.
///
/// Returning `true` for a struct field exposes the whole value through the
/// generic JSON path instead of its `#[log]` annotations.
///
/// ```
/// use fl_reflect::{ConditionalLog, Loggable, derive::Loggable};
///
/// #[derive(Loggable)]
/// #[log(conditional)]
/// struct Secret {
///     #[json = "value"]
///     value: String,
///     #[json = "-"]
///     visible: bool,
/// }
///
/// impl ConditionalLog for Secret {
///     fn should_log(&self) -> bool {
///         self.visible
///     }
/// }
///
/// let hidden = Secret { value: "x".into(), visible: false };
/// assert_eq!(hidden.reflect_should_log(), Some(false));
/// ```
pub trait ConditionalLog {
    fn should_log(&self) -> bool;
}

/// Produces the complete JSON encoding of the value, bypassing annotations.
pub trait MarshalLog {
    fn marshal_log(&self) -> Result<Vec<u8>, BoxError>;
}

/// Generic JSON encoding used only when no `#[log]` annotation applies.
pub trait MarshalJson {
    fn marshal_json(&self) -> Result<Vec<u8>, BoxError>;
}

/// Custom emptiness test used by `omitempty`.
pub trait IsZero {
    fn is_zero(&self) -> bool;
}

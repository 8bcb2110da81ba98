//! Items referenced by `#[derive(Loggable)]` output.

pub use alloc::vec::Vec;
pub use core::option::Option::{self, None, Some};
pub use core::result::Result;

use crate::BoxError;

/// `#[log(serialize)]`: encode through the type's `serde::Serialize`.
#[inline]
pub fn serialize_json<T: serde_core::Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, BoxError> {
    serde_json::to_vec(value).map_err(Into::into)
}

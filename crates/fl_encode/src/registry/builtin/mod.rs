//! Serializers and masks every [`Registry`] built with
//! [`Registry::with_builtins`] starts with.

mod currency;
mod mask;

pub(super) mod duration;
pub(super) mod time;

use fl_reflect::BoxError;
use serde::Serialize;

use super::Registry;

pub use mask::default_mask;

pub(super) fn install(registry: &Registry) {
    registry.register_mask("phone", mask::phone);
    registry.register_mask("email", mask::email);

    currency::install(registry);
    time::install(registry);
    duration::install(registry);
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, BoxError> {
    serde_json::to_vec(value).map_err(Into::into)
}

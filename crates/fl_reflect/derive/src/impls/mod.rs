//! Code generation.

// -----------------------------------------------------------------------------
// Modules

mod opaque_kind;
mod struct_kind;
mod trait_loggable;

// -----------------------------------------------------------------------------
// Internal API

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{DeriveKind, LoggableDerive};

pub(crate) use trait_loggable::impl_trait_loggable;

/// Generates every implementation for a derive input.
pub(crate) fn impl_loggable(derive: &LoggableDerive) -> TokenStream {
    let tokens = match &derive.kind {
        DeriveKind::Struct(fields) => struct_kind::impl_struct(derive, fields),
        DeriveKind::Opaque => opaque_kind::impl_opaque(derive),
    };

    quote! {
        const _: () = {
            #tokens
        };
    }
}

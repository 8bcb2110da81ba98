//! Derive macro for [`Loggable`].
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static LOG_ATTRIBUTE_NAME: &str = "log";
static JSON_ATTRIBUTE_NAME: &str = "json";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// Implements `Loggable` and `Typed`, plus `Struct` for structs.
///
/// # Field annotations
///
/// - `#[log = "name,omitempty,mask=email"]`: primary annotation. A struct
///   with at least one of these only emits annotated fields. `#[log = "-"]`
///   excludes the field.
/// - `#[json = "name,omitempty"]`: secondary annotation, used only when the
///   struct has no primary annotation at all.
///
/// Annotation strings are stored verbatim and parsed by the encoder.
///
/// # Capabilities
///
/// `#[log(...)]` on the type wires optional hooks to traits the type
/// implements by hand:
///
/// - `conditional`: `ConditionalLog`
/// - `marshal_log`: `MarshalLog`
/// - `marshal_json`: `MarshalJson`
/// - `serialize`: the type's `serde::Serialize`, encoded with `serde_json`
/// - `is_zero`: `IsZero`
///
/// Enums are opaque: they only contribute their capabilities.
///
/// ```ignore
/// #[derive(Loggable)]
/// #[log(conditional)]
/// struct Account {
///     #[log = "id"]
///     id: u64,
///     #[log = "balance,ser=currency_usd"]
///     balance: f64,
///     #[log = "-"]
///     pin: String,
/// }
/// ```
///
/// Every field type must implement `Loggable` and `Typed`; generic type
/// parameters receive both bounds.
#[proc_macro_derive(Loggable, attributes(log, json))]
pub fn derive_loggable(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::LoggableDerive::from_input(&ast) {
        Ok(derive) => impls::impl_loggable(&derive).into(),
        Err(err) => err.into_compile_error().into(),
    }
}

//! Paths into `fl_reflect` used by generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// Path of the `fl_reflect` crate as seen from the crate being compiled.
///
/// `::fl_reflect` for direct dependents, `::fieldlog::reflect` for crates
/// that only depend on the facade. Reads `Cargo.toml`, so call it once per
/// expansion.
pub(crate) fn fl_reflect() -> syn::Path {
    fl_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("fl_reflect"))
}

#[inline(always)]
pub(crate) fn macro_exports_(fl_reflect: &syn::Path) -> TokenStream {
    quote! { #fl_reflect::__macro_exports }
}

#[inline(always)]
pub(crate) fn loggable_(fl_reflect: &syn::Path) -> TokenStream {
    quote! { #fl_reflect::Loggable }
}

#[inline(always)]
pub(crate) fn typed_(fl_reflect: &syn::Path) -> TokenStream {
    quote! { #fl_reflect::Typed }
}

#[inline(always)]
pub(crate) fn log_kind_(fl_reflect: &syn::Path) -> TokenStream {
    quote! { #fl_reflect::LogKind }
}

#[inline(always)]
pub(crate) fn log_ref_(fl_reflect: &syn::Path) -> TokenStream {
    quote! { #fl_reflect::LogRef }
}

#[inline(always)]
pub(crate) fn struct_(fl_reflect: &syn::Path) -> TokenStream {
    quote! { #fl_reflect::Struct }
}

#[inline(always)]
pub(crate) fn named_field_(fl_reflect: &syn::Path) -> TokenStream {
    quote! { #fl_reflect::info::NamedField }
}

#[inline(always)]
pub(crate) fn box_error_(fl_reflect: &syn::Path) -> TokenStream {
    quote! { #fl_reflect::BoxError }
}

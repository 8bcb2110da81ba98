use proc_macro2::TokenStream;
use quote::quote;

use super::impl_trait_loggable;
use crate::derive_data::LoggableDerive;

/// Enums: opaque values that only contribute capabilities.
pub(crate) fn impl_opaque(derive: &LoggableDerive) -> TokenStream {
    let fl_reflect = &derive.fl_reflect;
    let ident = derive.ident;
    let (impl_generics, ty_generics, where_clause) = derive.generics.split_for_impl();

    let typed_ = crate::path::typed_(fl_reflect);
    let log_kind_ = crate::path::log_kind_(fl_reflect);
    let log_ref_ = crate::path::log_ref_(fl_reflect);

    let loggable_tokens = impl_trait_loggable(derive, quote!(#log_ref_::Opaque));

    quote! {
        impl #impl_generics #typed_ for #ident #ty_generics #where_clause {
            const KIND: #log_kind_ = #log_kind_::Opaque;
        }

        #loggable_tokens
    }
}

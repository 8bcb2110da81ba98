use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};

use crate::derive_data::LoggableDerive;

/// Generates the `Loggable` impl. `log_ref` is the body of `log_ref`.
pub(crate) fn impl_trait_loggable(derive: &LoggableDerive, log_ref: TokenStream) -> TokenStream {
    let fl_reflect = &derive.fl_reflect;
    let ident = derive.ident;
    let (impl_generics, ty_generics, where_clause) = derive.generics.split_for_impl();

    let loggable_ = crate::path::loggable_(fl_reflect);
    let log_ref_ = crate::path::log_ref_(fl_reflect);
    let box_error_ = crate::path::box_error_(fl_reflect);
    let exports_ = crate::path::macro_exports_(fl_reflect);

    let flags = &derive.flags;

    let should_log = flags.conditional.map(|span| {
        quote_spanned! {span=>
            #[inline]
            fn reflect_should_log(&self) -> #exports_::Option<bool> {
                #exports_::Some(<Self as #fl_reflect::ConditionalLog>::should_log(self))
            }
        }
    });

    let marshal_log = flags.marshal_log.map(|span| {
        quote_spanned! {span=>
            #[inline]
            fn reflect_marshal_log(
                &self,
            ) -> #exports_::Option<#exports_::Result<#exports_::Vec<u8>, #box_error_>> {
                #exports_::Some(<Self as #fl_reflect::MarshalLog>::marshal_log(self))
            }
        }
    });

    let marshal_json = match (flags.marshal_json, flags.serialize) {
        (Some(span), _) => Some(quote_spanned! {span=>
            #[inline]
            fn reflect_marshal_json(
                &self,
            ) -> #exports_::Option<#exports_::Result<#exports_::Vec<u8>, #box_error_>> {
                #exports_::Some(<Self as #fl_reflect::MarshalJson>::marshal_json(self))
            }
        }),
        (None, Some(span)) => Some(quote_spanned! {span=>
            #[inline]
            fn reflect_marshal_json(
                &self,
            ) -> #exports_::Option<#exports_::Result<#exports_::Vec<u8>, #box_error_>> {
                #exports_::Some(#exports_::serialize_json(self))
            }
        }),
        (None, None) => None,
    };

    let is_zero = flags.is_zero.map(|span| {
        quote_spanned! {span=>
            #[inline]
            fn reflect_is_zero(&self) -> #exports_::Option<bool> {
                #exports_::Some(<Self as #fl_reflect::IsZero>::is_zero(self))
            }
        }
    });

    quote! {
        impl #impl_generics #loggable_ for #ident #ty_generics #where_clause {
            #[inline]
            fn as_loggable(&self) -> &dyn #loggable_ {
                self
            }

            #[inline]
            fn log_ref(&self) -> #log_ref_<'_> {
                #log_ref
            }

            #should_log

            #marshal_log

            #marshal_json

            #is_zero
        }
    }
}

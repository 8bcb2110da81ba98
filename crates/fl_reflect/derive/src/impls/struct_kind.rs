use proc_macro2::TokenStream;
use quote::quote;

use super::impl_trait_loggable;
use crate::derive_data::{LoggableDerive, StructField};

/// Implements `Typed`, `Loggable` and `Struct` for a struct.
pub(crate) fn impl_struct(derive: &LoggableDerive, fields: &[StructField]) -> TokenStream {
    let fl_reflect = &derive.fl_reflect;
    let ident = derive.ident;
    let (impl_generics, ty_generics, where_clause) = derive.generics.split_for_impl();

    let typed_ = crate::path::typed_(fl_reflect);
    let log_kind_ = crate::path::log_kind_(fl_reflect);
    let log_ref_ = crate::path::log_ref_(fl_reflect);
    let loggable_ = crate::path::loggable_(fl_reflect);
    let struct_ = crate::path::struct_(fl_reflect);
    let named_field_ = crate::path::named_field_(fl_reflect);
    let exports_ = crate::path::macro_exports_(fl_reflect);

    let loggable_tokens = impl_trait_loggable(derive, quote!(#log_ref_::Struct(self)));

    let descriptors = fields.iter().map(|field| {
        let ty = field.ty;
        let name = &field.name;
        let log_tag = field.tags.log.as_ref().map(|tag| quote!(.with_log_tag(#tag)));
        let json_tag = field.tags.json.as_ref().map(|tag| quote!(.with_json_tag(#tag)));
        quote! {
            #named_field_::new::<#ty>(#name) #log_tag #json_tag
        }
    });

    // Field types may mention generic parameters, so the table is built in
    // an inline const rather than a `static`.
    let fields_table = if fields.is_empty() {
        quote!(&[])
    } else {
        quote!(const { &[#(#descriptors),*] })
    };

    let indices = 0..fields.len();
    let members = fields.iter().map(|field| &field.member);
    let field_len = fields.len();

    quote! {
        impl #impl_generics #typed_ for #ident #ty_generics #where_clause {
            const KIND: #log_kind_ = #log_kind_::Struct;
        }

        #loggable_tokens

        impl #impl_generics #struct_ for #ident #ty_generics #where_clause {
            fn fields(&self) -> &'static [#named_field_] {
                #fields_table
            }

            fn field_at(&self, index: usize) -> #exports_::Option<&dyn #loggable_> {
                match index {
                    #(#indices => #exports_::Some(#loggable_::as_loggable(&self.#members)),)*
                    _ => #exports_::None,
                }
            }

            #[inline]
            fn field_len(&self) -> usize {
                #field_len
            }
        }
    }
}

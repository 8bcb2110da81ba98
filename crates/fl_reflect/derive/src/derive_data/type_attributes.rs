use proc_macro2::Span;
use syn::Attribute;
use syn::spanned::Spanned;

use crate::LOG_ATTRIBUTE_NAME;

/// Capabilities enabled with `#[log(...)]` on the type.
///
/// Each flag keeps the span of its keyword so a missing trait
/// implementation is reported at the flag.
#[derive(Default, Debug)]
pub(crate) struct CapabilityFlags {
    pub conditional: Option<Span>,
    pub marshal_log: Option<Span>,
    pub marshal_json: Option<Span>,
    pub serialize: Option<Span>,
    pub is_zero: Option<Span>,
}

impl CapabilityFlags {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut flags = Self::default();

        for attr in attrs {
            if !attr.path().is_ident(LOG_ATTRIBUTE_NAME) {
                continue;
            }
            if !matches!(attr.meta, syn::Meta::List(_)) {
                return Err(syn::Error::new_spanned(
                    attr,
                    "expected `#[log(...)]` on a type, field annotations use `#[log = \"...\"]`",
                ));
            }

            attr.parse_nested_meta(|meta| {
                let slot = if meta.path.is_ident("conditional") {
                    &mut flags.conditional
                } else if meta.path.is_ident("marshal_log") {
                    &mut flags.marshal_log
                } else if meta.path.is_ident("marshal_json") {
                    &mut flags.marshal_json
                } else if meta.path.is_ident("serialize") {
                    &mut flags.serialize
                } else if meta.path.is_ident("is_zero") {
                    &mut flags.is_zero
                } else {
                    return Err(meta.error(
                        "unknown capability, expected `conditional`, `marshal_log`, \
                         `marshal_json`, `serialize` or `is_zero`",
                    ));
                };

                if slot.is_some() {
                    return Err(meta.error("duplicate capability"));
                }
                *slot = Some(meta.path.span());
                Ok(())
            })?;
        }

        if let (Some(_), Some(span)) = (flags.marshal_json, flags.serialize) {
            return Err(syn::Error::new(
                span,
                "`serialize` and `marshal_json` both provide the generic JSON encoding",
            ));
        }

        Ok(flags)
    }
}

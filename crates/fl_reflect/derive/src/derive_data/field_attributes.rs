use syn::{Attribute, Expr, ExprLit, Lit, LitStr, Meta};

use crate::{JSON_ATTRIBUTE_NAME, LOG_ATTRIBUTE_NAME};

/// Raw annotation strings of one field.
#[derive(Default, Debug)]
pub(crate) struct FieldTags {
    /// `#[log = "..."]`
    pub log: Option<LitStr>,
    /// `#[json = "..."]`
    pub json: Option<LitStr>,
}

impl FieldTags {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut tags = Self::default();

        for attr in attrs {
            let (slot, name) = if attr.path().is_ident(LOG_ATTRIBUTE_NAME) {
                (&mut tags.log, LOG_ATTRIBUTE_NAME)
            } else if attr.path().is_ident(JSON_ATTRIBUTE_NAME) {
                (&mut tags.json, JSON_ATTRIBUTE_NAME)
            } else {
                continue;
            };

            let Meta::NameValue(pair) = &attr.meta else {
                return Err(syn::Error::new_spanned(
                    attr,
                    format!("expected `#[{name} = \"...\"]` on a field"),
                ));
            };
            let Expr::Lit(ExprLit {
                lit: Lit::Str(lit), ..
            }) = &pair.value
            else {
                return Err(syn::Error::new_spanned(
                    &pair.value,
                    "field annotation must be a string literal",
                ));
            };
            if slot.is_some() {
                return Err(syn::Error::new_spanned(
                    attr,
                    format!("duplicate `#[{name}]` annotation"),
                ));
            }
            *slot = Some(lit.clone());
        }

        Ok(tags)
    }
}

use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Generics, Ident, Index, Member, Type, parse_quote};

use super::{CapabilityFlags, FieldTags};

/// A parsed `#[derive(Loggable)]` input.
pub(crate) struct LoggableDerive<'a> {
    pub ident: &'a Ident,
    /// Input generics with `Loggable + Typed` added to every type parameter.
    pub generics: Generics,
    pub flags: CapabilityFlags,
    pub fl_reflect: syn::Path,
    pub kind: DeriveKind<'a>,
}

pub(crate) enum DeriveKind<'a> {
    Struct(Vec<StructField<'a>>),
    Opaque,
}

/// One field of a derived struct.
pub(crate) struct StructField<'a> {
    /// `self.#member`
    pub member: Member,
    /// Declared name, or the index for tuple fields.
    pub name: String,
    pub ty: &'a Type,
    pub tags: FieldTags,
}

impl<'a> LoggableDerive<'a> {
    pub fn from_input(ast: &'a DeriveInput) -> syn::Result<Self> {
        let flags = CapabilityFlags::parse_attrs(&ast.attrs)?;

        let kind = match &ast.data {
            Data::Struct(data) => DeriveKind::Struct(Self::collect_fields(&data.fields)?),
            Data::Enum(_) => DeriveKind::Opaque,
            Data::Union(data) => {
                return Err(syn::Error::new_spanned(
                    data.union_token,
                    "`Loggable` cannot be derived for unions",
                ));
            }
        };

        let fl_reflect = crate::path::fl_reflect();
        let generics = Self::bounded_generics(&ast.generics, &fl_reflect);

        Ok(Self {
            ident: &ast.ident,
            generics,
            flags,
            fl_reflect,
            kind,
        })
    }

    fn collect_fields(fields: &'a Fields) -> syn::Result<Vec<StructField<'a>>> {
        fields
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let (member, name) = match &field.ident {
                    Some(ident) => (Member::Named(ident.clone()), ident.unraw().to_string()),
                    None => (Member::Unnamed(Index::from(index)), index.to_string()),
                };
                Ok(StructField {
                    member,
                    name,
                    ty: &field.ty,
                    tags: FieldTags::parse_attrs(&field.attrs)?,
                })
            })
            .collect()
    }

    fn bounded_generics(generics: &Generics, fl_reflect: &syn::Path) -> Generics {
        let mut generics = generics.clone();
        let params: Vec<Ident> = generics.type_params().map(|p| p.ident.clone()).collect();
        if !params.is_empty() {
            let where_clause = generics.make_where_clause();
            for param in params {
                where_clause.predicates.push(parse_quote! {
                    #param: #fl_reflect::Loggable + #fl_reflect::Typed
                });
            }
        }
        generics
    }
}

use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, quote};
use syn::{Data, DeriveInput, Fields, Index, Member, Type};

use crate::common::{last_segment_is, parse_mode_attrs, single_type_argument};

/// #[derive(Mode)] wires a handler struct to the `ModeBase` it was built from.
///
/// Generated:
///
/// ```ignore
/// impl ::mode_stack::ModeHandler<Kind> for Handler {
///     fn base(&self) -> &::mode_stack::ModeBase<Kind> { &self.base }
/// }
/// ```
pub fn expand_derive_mode(input: DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                ident,
                "#[derive(Mode)] is only supported on structs",
            ));
        }
    };

    let (member, base_ty) = find_base_field(ident, fields)?;

    let attrs = parse_mode_attrs(&input.attrs, true, false)?;
    let kind = match attrs.kind {
        Some(path) => path.into_token_stream(),
        None => single_type_argument(base_ty)
            .ok_or_else(|| {
                syn::Error::new_spanned(
                    base_ty,
                    "cannot infer the mode kind from this field; add #[mode(kind = YourKind)] to the struct",
                )
            })?
            .into_token_stream(),
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::mode_stack::ModeHandler<#kind> for #ident #ty_generics #where_clause {
            #[inline]
            fn base(&self) -> &::mode_stack::ModeBase<#kind> {
                &self.#member
            }
        }
    })
}

/// Locate the base field: an explicit `#[mode(base)]`, or the single field
/// typed `ModeBase<..>`.
fn find_base_field<'a>(ident: &syn::Ident, fields: &'a Fields) -> syn::Result<(Member, &'a Type)> {
    let mut marked = Vec::new();
    let mut by_type = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let member = match &field.ident {
            Some(name) => Member::Named(name.clone()),
            None => Member::Unnamed(Index::from(index)),
        };
        if parse_mode_attrs(&field.attrs, false, true)?.base {
            marked.push((member, &field.ty));
        } else if last_segment_is(&field.ty, "ModeBase") {
            by_type.push((member, &field.ty));
        }
    }

    let candidates = if marked.is_empty() { by_type } else { marked };
    let mut candidates = candidates.into_iter();
    match (candidates.next(), candidates.next()) {
        (Some(found), None) => Ok(found),
        (None, _) => Err(syn::Error::new_spanned(
            ident,
            "a mode handler needs a `ModeBase<Kind>` field; mark it with #[mode(base)] if it is aliased",
        )),
        (Some(_), Some((_, second))) => Err(syn::Error::new_spanned(
            second,
            "more than one base field; mark the real one with #[mode(base)]",
        )),
    }
}

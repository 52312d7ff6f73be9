//! Common parsing utilities
//!
//! Shared helpers for reading `#[mode(...)]` attributes and base field types.

use syn::{Attribute, GenericArgument, Path, PathArguments, Type};

// =============================================================================
// Attribute Parsing: `#[mode(...)]`
// =============================================================================

/// Options read from `#[mode(...)]` attributes.
#[derive(Default)]
pub struct ModeAttrs {
    /// `kind = Path`
    pub kind: Option<Path>,
    /// bare `base` flag
    pub base: bool,
}

/// Parse every `#[mode(...)]` attribute in `attrs`.
///
/// `allow_kind` / `allow_base` decide which keys are accepted at this
/// position (struct vs field).
pub fn parse_mode_attrs(attrs: &[Attribute], allow_kind: bool, allow_base: bool) -> syn::Result<ModeAttrs> {
    let mut parsed = ModeAttrs::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("mode")) {
        attr.parse_nested_meta(|meta| {
            if allow_kind && meta.path.is_ident("kind") {
                if parsed.kind.is_some() {
                    return Err(meta.error("duplicate `kind`"));
                }
                parsed.kind = Some(meta.value()?.parse()?);
                Ok(())
            } else if allow_base && meta.path.is_ident("base") {
                parsed.base = true;
                Ok(())
            } else {
                Err(meta.error("unsupported mode attribute"))
            }
        })?;
    }
    Ok(parsed)
}

// =============================================================================
// Type Inspection
// =============================================================================

/// Check if the last segment of a type path is `name`
pub fn last_segment_is(ty: &Type, name: &str) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == name),
        _ => false,
    }
}

/// Extract `T` from a type like `Wrapper<T>` (single type argument only)
pub fn single_type_argument(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    let mut types = args.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    });
    match (types.next(), types.next()) {
        (Some(ty), None) => Some(ty),
        _ => None,
    }
}

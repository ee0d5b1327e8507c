use syn::{DeriveInput, Field, GenericArgument, LitStr, PathArguments, Type};

use crate::RECORD_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// FieldAttrs

/// The parsed `#[record(...)]` attributes of one field.
#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub(crate) name: Option<String>,
    pub(crate) any: bool,
    pub(crate) skip: bool,
    pub(crate) flatten: bool,
}

pub(crate) fn parse_field_attrs(field: &Field) -> syn::Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();
    for attr in &field.attrs {
        if !attr.path().is_ident(RECORD_ATTRIBUTE_NAME) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                attrs.name = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("any") {
                attrs.any = true;
                Ok(())
            } else if meta.path.is_ident("skip") {
                attrs.skip = true;
                Ok(())
            } else if meta.path.is_ident("flatten") {
                attrs.flatten = true;
                Ok(())
            } else {
                Err(meta.error("unrecognized `record` field attribute"))
            }
        })?;
    }

    // A name of `-` is the annotation form of `skip`.
    if attrs.name.as_deref() == Some("-") {
        attrs.skip = true;
        attrs.name = None;
    }

    if attrs.flatten && (attrs.name.is_some() || attrs.any) {
        return Err(syn::Error::new_spanned(
            field,
            "`flatten` cannot be combined with `name` or `any`",
        ));
    }

    Ok(attrs)
}

// -----------------------------------------------------------------------------
// ContainerAttrs

/// The parsed type-level `#[record(...)]` attributes.
#[derive(Default)]
pub(crate) struct ContainerAttrs {
    pub(crate) auto_register: bool,
}

pub(crate) fn parse_container_attrs(input: &DeriveInput) -> syn::Result<ContainerAttrs> {
    let mut attrs = ContainerAttrs::default();
    for attr in &input.attrs {
        if !attr.path().is_ident(RECORD_ATTRIBUTE_NAME) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("auto_register") {
                attrs.auto_register = true;
                Ok(())
            } else {
                Err(meta.error("unrecognized `record` type attribute"))
            }
        })?;
    }
    Ok(attrs)
}

// -----------------------------------------------------------------------------
// Type helpers

/// Returns `T` for a syntactic `Option<T>`, `core::option::Option<T>` or
/// `std::option::Option<T>`.
pub(crate) fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr};

use crate::field::{option_inner, parse_container_attrs, parse_field_attrs};

// -----------------------------------------------------------------------------
// Expansion

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "`#[derive(Record)]` only supports structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            input,
            "`#[derive(Record)]` requires named fields",
        ));
    };
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "`#[derive(Record)]` does not support generic types",
        ));
    }

    let container = parse_container_attrs(input)?;
    let ident = &input.ident;

    let mut builder_calls = Vec::new();
    let mut cell_arms = Vec::new();
    let mut cell_mut_arms = Vec::new();

    for (index, field) in fields.named.iter().enumerate() {
        let attrs = parse_field_attrs(field)?;
        if attrs.skip {
            continue;
        }

        // Named fields always have an identifier.
        let field_ident = field.ident.as_ref().expect("named field");

        if attrs.flatten {
            if let Some(inner) = option_inner(&field.ty) {
                builder_calls.push(quote! {
                    builder.flatten::<#inner>(#index)?;
                });
                cell_arms.push(quote! {
                    #index => self.#field_ident
                        .as_ref()
                        .and_then(|inner| dsv_schema::Record::cell(inner, &path[1..])),
                });
                cell_mut_arms.push(quote! {
                    #index => dsv_schema::Record::cell_mut(
                        self.#field_ident
                            .get_or_insert_with(<#inner as ::core::default::Default>::default),
                        &path[1..],
                    ),
                });
            } else {
                let ty = &field.ty;
                builder_calls.push(quote! {
                    builder.flatten::<#ty>(#index)?;
                });
                cell_arms.push(quote! {
                    #index => dsv_schema::Record::cell(&self.#field_ident, &path[1..]),
                });
                cell_mut_arms.push(quote! {
                    #index => dsv_schema::Record::cell_mut(&mut self.#field_ident, &path[1..]),
                });
            }
        } else {
            let column = attrs
                .name
                .unwrap_or_else(|| field_ident.to_string());
            let column = LitStr::new(&column, field_ident.span());
            let flags = if attrs.any {
                quote! {
                    dsv_schema::info::FieldFlags::ELEMENT
                        .union(dsv_schema::info::FieldFlags::ANY)
                }
            } else {
                quote!(dsv_schema::info::FieldFlags::ELEMENT)
            };
            builder_calls.push(quote! {
                builder.column(#index, #column, #flags)?;
            });
            cell_arms.push(quote! {
                #index => ::core::option::Option::Some(
                    &self.#field_ident as &dyn dsv_schema::Cell,
                ),
            });
            cell_mut_arms.push(quote! {
                #index => ::core::option::Option::Some(
                    &mut self.#field_ident as &mut dyn dsv_schema::Cell,
                ),
            });
        }
    }

    let auto_register_tokens = auto_register(ident, &container);

    Ok(quote! {
        impl dsv_schema::Record for #ident {
            fn build_record_info() -> ::core::result::Result<
                dsv_schema::info::RecordInfo,
                dsv_schema::info::SchemaError,
            > {
                let mut builder = dsv_schema::info::RecordInfoBuilder::new::<Self>();
                #(#builder_calls)*
                ::core::result::Result::Ok(builder.finish())
            }

            fn cell(&self, path: &[usize]) -> ::core::option::Option<&dyn dsv_schema::Cell> {
                match *path.first()? {
                    #(#cell_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn cell_mut(
                &mut self,
                path: &[usize],
            ) -> ::core::option::Option<&mut dyn dsv_schema::Cell> {
                match *path.first()? {
                    #(#cell_mut_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        #auto_register_tokens
    })
}

// -----------------------------------------------------------------------------
// auto_register

#[cfg(feature = "auto_register")]
fn auto_register(ident: &syn::Ident, container: &crate::field::ContainerAttrs) -> TokenStream {
    if !container.auto_register {
        return TokenStream::new();
    }
    quote! {
        dsv_schema::__macro_exports::inventory::submit! {
            dsv_schema::registry::AutoRecord(dsv_schema::registry::record_info::<#ident>)
        }
    }
}

#[cfg(not(feature = "auto_register"))]
fn auto_register(_: &syn::Ident, container: &crate::field::ContainerAttrs) -> TokenStream {
    // The attribute is accepted but inert without the feature.
    let _ = container.auto_register;
    TokenStream::new()
}

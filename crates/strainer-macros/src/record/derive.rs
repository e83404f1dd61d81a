//! Implementation of the `#[derive(Record)]` macro.
//!
//! This macro generates an implementation of the `Record` trait, one plain
//! accessor function per filterable field, and query-name constants.

use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{ext::IdentExt, spanned::Spanned, Data, DeriveInput, Error, Fields, Ident, Result};

use super::attrs::{parse_filter_attrs, Kind, Read};

/// Main implementation of the Record derive macro.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Record cannot be derived for generic structs",
        ));
    }

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut readers: Vec<TokenStream> = Vec::new();
    let mut field_defs: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut seen = HashSet::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        // Fields without #[filter] carry no metadata and stay out of the schema
        let attrs = match parse_filter_attrs(&field.attrs)? {
            Some(attrs) if !attrs.skip => attrs,
            _ => continue,
        };

        let ops = attrs.ops.ok_or_else(|| {
            Error::new(
                attrs.span,
                "filter fields must declare operators: #[filter(ops = \"...\")]",
            )
        })?;

        let query_name = attrs
            .rename
            .unwrap_or_else(|| field_name.unraw().to_string());
        if !seen.insert(query_name.clone()) {
            return Err(Error::new(
                field.span(),
                format!("duplicate filter field name '{}'", query_name),
            ));
        }

        let kind = attrs.kind.unwrap_or_else(|| Kind::infer(&field.ty));
        let kind_variant = format_ident!("{}", kind.variant());

        let const_name = syn::parse_str::<Ident>(&to_screaming_snake_case(&query_name))
            .map_err(|_| {
                Error::new(
                    field.span(),
                    format!(
                        "filter field name '{}' does not form a valid constant name",
                        query_name
                    ),
                )
            })?;
        field_constants.push(quote! {
            /// Query name of a filterable field.
            pub const #const_name: &'static str = #query_name;
        });

        let accessor = match kind.read() {
            Some(read) => {
                let reader = format_ident!("__strainer_read_{}", field_name);
                // Binding to the declared primitive makes a kind that disagrees
                // with the field type a compile error.
                let declared = kind.primitive().map(|name| format_ident!("{}", name));
                let value_expr = match (read, declared) {
                    (Read::Signed, Some(ty)) => quote! {
                        let value: #ty = record.#field_name;
                        ::strainer::Value::Signed(value as i64)
                    },
                    (Read::Unsigned, Some(ty)) => quote! {
                        let value: #ty = record.#field_name;
                        ::strainer::Value::Unsigned(value as u64)
                    },
                    (Read::Float, Some(ty)) => quote! {
                        let value: #ty = record.#field_name;
                        ::strainer::Value::Float(value as f64)
                    },
                    _ => {
                        quote! {
                            ::strainer::Value::Text(
                                ::core::convert::AsRef::<str>::as_ref(&record.#field_name)
                            )
                        }
                    }
                };
                readers.push(quote! {
                    #[allow(non_snake_case)]
                    fn #reader(record: &#struct_name) -> ::strainer::Value<'_> {
                        #value_expr
                    }
                });
                quote! {
                    ::core::option::Option::Some(#reader as ::strainer::Accessor<#struct_name>)
                }
            }
            None => quote! { ::core::option::Option::None },
        };

        field_defs.push(quote! {
            ::strainer::FieldDef::new(
                #query_name,
                ::strainer::FieldKind::#kind_variant,
                #ops,
                #accessor,
            )
        });
    }

    let expanded = quote! {
        impl #struct_name {
            #(#field_constants)*
        }

        impl ::strainer::Record for #struct_name {
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn describe(&self) -> ::strainer::RecordShape<Self> {
                #(#readers)*

                ::strainer::RecordShape::Struct(::std::vec![
                    #(#field_defs),*
                ])
            }
        }
    };

    Ok(expanded)
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}

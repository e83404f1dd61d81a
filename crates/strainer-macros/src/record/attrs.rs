//! Attribute parsing for the Record derive macro.
//!
//! This module provides parsers for the `#[filter(...)]` field attributes
//! and the type-to-kind mapping used by the `Record` derive macro.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, Lit, LitStr, Meta, Result, Token, Type,
};

/// Kind of a filterable field, mirroring `strainer::FieldKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Text,
    Unsupported,
}

/// How the accessor widens the field into a `strainer::Value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Read {
    Signed,
    Unsigned,
    Float,
    Text,
}

impl Kind {
    /// Maps a kind name (`i32`, `string`, ...) to a kind.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "i8" => Kind::I8,
            "i16" => Kind::I16,
            "i32" => Kind::I32,
            "i64" => Kind::I64,
            "isize" => Kind::Isize,
            "u8" => Kind::U8,
            "u16" => Kind::U16,
            "u32" => Kind::U32,
            "u64" => Kind::U64,
            "usize" => Kind::Usize,
            "f32" => Kind::F32,
            "f64" => Kind::F64,
            "String" | "string" | "text" => Kind::Text,
            "unsupported" => Kind::Unsupported,
            _ => return None,
        };
        Some(kind)
    }

    /// Infers the kind from a field type. Anything that is not a plain
    /// primitive or `String` path is unsupported.
    pub fn infer(ty: &Type) -> Self {
        let Type::Path(path) = ty else {
            return Kind::Unsupported;
        };
        if path.qself.is_some() {
            return Kind::Unsupported;
        }
        path.path
            .segments
            .last()
            .filter(|segment| segment.arguments.is_empty())
            .and_then(|segment| Kind::from_name(&segment.ident.to_string()))
            .filter(|kind| *kind != Kind::Unsupported)
            .unwrap_or(Kind::Unsupported)
    }

    /// Variant name of `strainer::FieldKind`.
    pub fn variant(self) -> &'static str {
        match self {
            Kind::I8 => "I8",
            Kind::I16 => "I16",
            Kind::I32 => "I32",
            Kind::I64 => "I64",
            Kind::Isize => "Isize",
            Kind::U8 => "U8",
            Kind::U16 => "U16",
            Kind::U32 => "U32",
            Kind::U64 => "U64",
            Kind::Usize => "Usize",
            Kind::F32 => "F32",
            Kind::F64 => "F64",
            Kind::Text => "Text",
            Kind::Unsupported => "Unsupported",
        }
    }

    /// Primitive type a field of this kind must have. `None` for text and
    /// unsupported kinds.
    pub fn primitive(self) -> Option<&'static str> {
        let name = match self {
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::Isize => "isize",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::Usize => "usize",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::Text | Kind::Unsupported => return None,
        };
        Some(name)
    }

    pub fn read(self) -> Option<Read> {
        match self {
            Kind::I8 | Kind::I16 | Kind::I32 | Kind::I64 | Kind::Isize => Some(Read::Signed),
            Kind::U8 | Kind::U16 | Kind::U32 | Kind::U64 | Kind::Usize => Some(Read::Unsigned),
            Kind::F32 | Kind::F64 => Some(Read::Float),
            Kind::Text => Some(Read::Text),
            Kind::Unsupported => None,
        }
    }
}

/// Field-level attributes from `#[filter(...)]`.
#[derive(Debug, Clone)]
pub struct FilterAttr {
    /// Declared operator tokens, comma separated.
    pub ops: Option<String>,
    /// Exclude this field from the schema.
    pub skip: bool,
    /// Custom query name (default: field name).
    pub rename: Option<String>,
    /// Explicit kind, overriding inference from the type.
    pub kind: Option<Kind>,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for FilterAttr {
    fn default() -> Self {
        FilterAttr {
            ops: None,
            skip: false,
            rename: None,
            kind: None,
            span: Span::call_site(),
        }
    }
}

fn string_value(expr: &Expr, key: &str) -> Result<LitStr> {
    if let Expr::Lit(ExprLit {
        lit: Lit::Str(s), ..
    }) = expr
    {
        Ok(s.clone())
    } else {
        Err(Error::new(
            expr.span(),
            format!("{key} must be a string literal"),
        ))
    }
}

impl Parse for FilterAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FilterAttr {
            span: input.span(),
            ..FilterAttr::default()
        };

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,

                Meta::NameValue(nv) => {
                    if nv.path.is_ident("ops") {
                        attr.ops = Some(string_value(&nv.value, "ops")?.value());
                    } else if nv.path.is_ident("rename") {
                        attr.rename = Some(string_value(&nv.value, "rename")?.value());
                    } else if nv.path.is_ident("kind") {
                        let lit = string_value(&nv.value, "kind")?;
                        let kind = Kind::from_name(&lit.value()).ok_or_else(|| {
                            Error::new(
                                lit.span(),
                                format!(
                                    "unknown kind: '{}'. Expected one of: i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, string, unsupported",
                                    lit.value()
                                ),
                            )
                        })?;
                        attr.kind = Some(kind);
                    } else {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown attribute. Expected: ops, rename or kind",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown filter attribute. Expected: skip, ops = \"...\", rename = \"...\", or kind = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract `#[filter(...)]` attributes from a field's attributes.
///
/// Returns `None` when the field carries no filter metadata.
pub fn parse_filter_attrs(attrs: &[Attribute]) -> Result<Option<FilterAttr>> {
    for attr in attrs {
        if attr.path().is_ident("filter") {
            return attr.parse_args::<FilterAttr>().map(Some);
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_filter(tokens: &str) -> Result<FilterAttr> {
        syn::parse_str::<FilterAttr>(tokens)
    }

    fn kind_of(ty: &str) -> Kind {
        Kind::infer(&syn::parse_str::<Type>(ty).unwrap())
    }

    #[test]
    fn test_ops() {
        let attr = parse_filter(r#"ops = "lt,lte,eq""#).unwrap();
        assert_eq!(attr.ops.as_deref(), Some("lt,lte,eq"));
        assert!(!attr.skip);
        assert_eq!(attr.rename, None);
    }

    #[test]
    fn test_skip() {
        let attr = parse_filter("skip").unwrap();
        assert!(attr.skip);
        assert_eq!(attr.ops, None);
    }

    #[test]
    fn test_rename_and_kind() {
        let attr = parse_filter(r#"ops = "eq", rename = "a", kind = "i32""#).unwrap();
        assert_eq!(attr.rename.as_deref(), Some("a"));
        assert_eq!(attr.kind, Some(Kind::I32));
    }

    #[test]
    fn test_unknown_kind() {
        let err = parse_filter(r#"kind = "decimal""#).unwrap_err();
        assert!(err.to_string().contains("unknown kind"));
    }

    #[test]
    fn test_non_literal_ops() {
        let err = parse_filter("ops = lt").unwrap_err();
        assert!(err.to_string().contains("ops must be a string literal"));
    }

    #[test]
    fn test_unknown_key() {
        assert!(parse_filter(r#"json = "a""#).is_err());
        assert!(parse_filter("String").is_err());
    }

    #[test]
    fn test_infer_primitives() {
        assert_eq!(kind_of("i8"), Kind::I8);
        assert_eq!(kind_of("u64"), Kind::U64);
        assert_eq!(kind_of("usize"), Kind::Usize);
        assert_eq!(kind_of("f32"), Kind::F32);
        assert_eq!(kind_of("String"), Kind::Text);
        assert_eq!(kind_of("std::string::String"), Kind::Text);
    }

    #[test]
    fn test_infer_unsupported() {
        assert_eq!(kind_of("bool"), Kind::Unsupported);
        assert_eq!(kind_of("Vec<u8>"), Kind::Unsupported);
        assert_eq!(kind_of("Option<i32>"), Kind::Unsupported);
        assert_eq!(kind_of("&'static str"), Kind::Unsupported);
        assert_eq!(kind_of("Box<i32>"), Kind::Unsupported);
    }

    #[test]
    fn test_read_modes() {
        assert_eq!(Kind::I16.read(), Some(Read::Signed));
        assert_eq!(Kind::U32.read(), Some(Read::Unsigned));
        assert_eq!(Kind::F64.read(), Some(Read::Float));
        assert_eq!(Kind::Text.read(), Some(Read::Text));
        assert_eq!(Kind::Unsupported.read(), None);
    }

    #[test]
    fn test_primitive_names() {
        assert_eq!(Kind::I8.primitive(), Some("i8"));
        assert_eq!(Kind::Usize.primitive(), Some("usize"));
        assert_eq!(Kind::F64.primitive(), Some("f64"));
        assert_eq!(Kind::Text.primitive(), None);
        assert_eq!(Kind::Unsupported.primitive(), None);
    }
}

//! Parses `#[jsonfusion(...)]` attributes off a derive input, using
//! `syn::Attribute::parse_nested_meta` the way `syn`'s own documentation
//! recommends for a small closed vocabulary of keys.

use syn::spanned::Spanned;

/// One compile-time validator, as parsed off a field attribute. Turned into
/// a `jsonfusion_core::validators::Validator` token stream by `codegen.rs`.
pub enum ValidatorSpec {
    Range(f64, f64),
    MinLength(usize),
    MaxLength(usize),
    MinItems(usize),
    MaxItems(usize),
    MaxProperties(usize),
    MaxKeyLength(usize),
    EnumValues(Vec<String>),
}

/// Parsed `#[jsonfusion(...)]` content for one field.
#[derive(Default)]
pub struct FieldAttrs {
    /// `key = "..."`: the wire key, if different from the field's name.
    pub key: Option<String>,
    /// `not_json`: the field is skipped entirely on parse and serialize.
    pub not_json: bool,
    /// `as_array`: an `Option<Record>` field is read/written positionally.
    pub as_array: bool,
    /// Validators attached directly to this field.
    pub validators: Vec<ValidatorSpec>,
}

/// Parsed `#[jsonfusion(...)]` content for the struct itself.
#[derive(Default)]
pub struct RecordAttrs {
    /// `not_required(field_a, field_b)`: these child fields are optional on
    /// the wire even though their Rust type isn't `Option<_>`.
    pub not_required: Vec<String>,
}

fn float_value(input: syn::parse::ParseStream) -> syn::Result<f64> {
    let lit: syn::Lit = input.parse()?;
    match lit {
        syn::Lit::Float(f) => f.base10_parse(),
        syn::Lit::Int(i) => i.base10_parse::<i64>().map(|v| v as f64),
        other => Err(syn::Error::new(other.span(), "expected a number")),
    }
}

fn parenthesized_fields(
    meta: &syn::meta::ParseNestedMeta,
) -> syn::Result<proc_macro2::TokenStream> {
    let content;
    syn::parenthesized!(content in meta.input);
    Ok(content.parse()?)
}

pub fn parse_field_attrs(attrs: &[syn::Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("jsonfusion") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("key") {
                let value = meta.value()?;
                let lit: syn::LitStr = value.parse()?;
                out.key = Some(lit.value());
            } else if meta.path.is_ident("not_json") {
                out.not_json = true;
            } else if meta.path.is_ident("as_array") {
                out.as_array = true;
            } else if meta.path.is_ident("range") {
                let content;
                syn::parenthesized!(content in meta.input);
                let mut min = None;
                let mut max = None;
                while !content.is_empty() {
                    let ident: syn::Ident = content.parse()?;
                    content.parse::<syn::Token![=]>()?;
                    let value = float_value(&content)?;
                    if ident == "min" {
                        min = Some(value);
                    } else if ident == "max" {
                        max = Some(value);
                    } else {
                        return Err(syn::Error::new(ident.span(), "expected `min` or `max`"));
                    }
                    if content.peek(syn::Token![,]) {
                        content.parse::<syn::Token![,]>()?;
                    }
                }
                let min = min.ok_or_else(|| meta.error("range requires `min`"))?;
                let max = max.ok_or_else(|| meta.error("range requires `max`"))?;
                out.validators.push(ValidatorSpec::Range(min, max));
            } else if meta.path.is_ident("min_length") {
                let value = meta.value()?;
                let n: syn::LitInt = value.parse()?;
                out.validators
                    .push(ValidatorSpec::MinLength(n.base10_parse()?));
            } else if meta.path.is_ident("max_length") {
                let value = meta.value()?;
                let n: syn::LitInt = value.parse()?;
                out.validators
                    .push(ValidatorSpec::MaxLength(n.base10_parse()?));
            } else if meta.path.is_ident("min_items") {
                let value = meta.value()?;
                let n: syn::LitInt = value.parse()?;
                out.validators
                    .push(ValidatorSpec::MinItems(n.base10_parse()?));
            } else if meta.path.is_ident("max_items") {
                let value = meta.value()?;
                let n: syn::LitInt = value.parse()?;
                out.validators
                    .push(ValidatorSpec::MaxItems(n.base10_parse()?));
            } else if meta.path.is_ident("max_properties") {
                let value = meta.value()?;
                let n: syn::LitInt = value.parse()?;
                out.validators
                    .push(ValidatorSpec::MaxProperties(n.base10_parse()?));
            } else if meta.path.is_ident("max_key_length") {
                let value = meta.value()?;
                let n: syn::LitInt = value.parse()?;
                out.validators
                    .push(ValidatorSpec::MaxKeyLength(n.base10_parse()?));
            } else if meta.path.is_ident("enum_values") {
                let tokens = parenthesized_fields(&meta)?;
                let values: syn::punctuated::Punctuated<syn::LitStr, syn::Token![,]> =
                    syn::parse2(tokens).map_err(|e| meta.error(e.to_string()))?;
                out.validators.push(ValidatorSpec::EnumValues(
                    values.iter().map(syn::LitStr::value).collect(),
                ));
            } else {
                return Err(meta.error("unknown jsonfusion field attribute"));
            }
            Ok(())
        })?;
    }

    Ok(out)
}

pub fn parse_record_attrs(attrs: &[syn::Attribute]) -> syn::Result<RecordAttrs> {
    let mut out = RecordAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("jsonfusion") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("not_required") {
                let content;
                syn::parenthesized!(content in meta.input);
                while !content.is_empty() {
                    let ident: syn::Ident = content.parse()?;
                    out.not_required.push(ident.to_string());
                    if content.peek(syn::Token![,]) {
                        content.parse::<syn::Token![,]>()?;
                    }
                }
            } else {
                return Err(meta.error("unknown jsonfusion record attribute"));
            }
            Ok(())
        })?;
    }

    Ok(out)
}

/// True if `ty` is syntactically `Option<...>` (the last path segment is
/// `Option`). Good enough for field-requiredness inference; a field typed
/// `std::option::Option<T>` or aliased to some other name entirely is out
/// of scope, same tradeoff `serde_derive` documents for its own `is_option`.
pub fn is_option_type(ty: &syn::Type) -> bool {
    inner_type_of(ty, "Option").is_some()
}

/// The `T` in `Option<T>`, if `ty` is syntactically that shape.
pub fn option_inner_type(ty: &syn::Type) -> Option<&syn::Type> {
    inner_type_of(ty, "Option")
}

fn inner_type_of<'a>(ty: &'a syn::Type, wrapper: &str) -> Option<&'a syn::Type> {
    let syn::Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        syn::GenericArgument::Type(t) => Some(t),
        _ => None,
    })
}

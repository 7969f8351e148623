//! Turns one parsed struct (fields + attributes) into the token streams
//! `lib.rs` assembles into the final `impl` block: a field table entry per
//! wire-visible field, a `Default` impl, and the `RecordSchema` impl itself.
//!
//! Each field's `read`/`write` closure captures nothing, so it coerces to
//! the plain `fn(...)` pointer [`jsonfusion_core::field::FieldDescriptor`]
//! stores — a zero-capture-closure-as-fn-pointer trick that needs no
//! unsafe code.

use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;

use crate::parse::{parse_field_attrs, parse_record_attrs, FieldAttrs, ValidatorSpec};

struct PreparedField {
    ident: syn::Ident,
    ty: syn::Type,
    key: String,
    required: bool,
    attrs: FieldAttrs,
}

fn validators_tokens(validators: &[ValidatorSpec]) -> TokenStream {
    let entries = validators.iter().map(|v| match v {
        ValidatorSpec::Range(min, max) => {
            quote! { ::jsonfusion_core::validators::Validator::Range { min: #min, max: #max } }
        }
        ValidatorSpec::MinLength(n) => {
            quote! { ::jsonfusion_core::validators::Validator::MinLength(#n) }
        }
        ValidatorSpec::MaxLength(n) => {
            quote! { ::jsonfusion_core::validators::Validator::MaxLength(#n) }
        }
        ValidatorSpec::MinItems(n) => {
            quote! { ::jsonfusion_core::validators::Validator::MinItems(#n) }
        }
        ValidatorSpec::MaxItems(n) => {
            quote! { ::jsonfusion_core::validators::Validator::MaxItems(#n) }
        }
        ValidatorSpec::MaxProperties(n) => {
            quote! { ::jsonfusion_core::validators::Validator::MaxProperties(#n) }
        }
        ValidatorSpec::MaxKeyLength(n) => {
            quote! { ::jsonfusion_core::validators::Validator::MaxKeyLength(#n) }
        }
        ValidatorSpec::EnumValues(values) => {
            quote! { ::jsonfusion_core::validators::Validator::EnumValues(&[#(#values),*]) }
        }
    });
    quote! { &[#(#entries),*] }
}

/// Build the `impl RecordSchema for #name` block (plus its `Default` impl)
/// for a `Data::Struct(Fields::Named(..))` input. Returns an error token
/// stream (a `compile_error!`) for anything the derive doesn't support,
/// the same way `syn`'s own examples recommend surfacing macro errors.
pub fn expand_record(input: &syn::DeriveInput) -> syn::Result<TokenStream> {
    let syn::Data::Struct(data) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "#[derive(Schema)] only supports structs with named fields",
        ));
    };
    let syn::Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new(
            input.span(),
            "#[derive(Schema)] only supports structs with named fields",
        ));
    };

    let record_attrs = parse_record_attrs(&input.attrs)?;
    let mut prepared = Vec::with_capacity(named.named.len());

    for field in &named.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new(field.span(), "tuple fields are not supported"))?;
        let attrs = parse_field_attrs(&field.attrs)?;
        let is_option = crate::parse::is_option_type(&field.ty);
        let not_required_by_name = record_attrs.not_required.iter().any(|n| *n == ident.to_string());
        let required = !is_option && !not_required_by_name;

        if attrs.as_array && !is_option {
            return Err(syn::Error::new(
                field.span(),
                "`as_array` only applies to an `Option<Record>` field",
            ));
        }

        let key = attrs.key.clone().unwrap_or_else(|| ident.to_string());
        prepared.push(PreparedField {
            ident,
            ty: field.ty.clone(),
            key,
            required,
            attrs,
        });
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let default_fields = prepared.iter().map(|f| {
        let ident = &f.ident;
        quote! { #ident: ::core::default::Default::default() }
    });

    let descriptors = prepared
        .iter()
        .filter(|f| !f.attrs.not_json)
        .map(|f| field_descriptor_tokens(name, f));

    Ok(quote! {
        impl #impl_generics ::core::default::Default for #name #ty_generics #where_clause {
            fn default() -> Self {
                #name {
                    #(#default_fields),*
                }
            }
        }

        impl #impl_generics ::jsonfusion_core::record::RecordSchema for #name #ty_generics #where_clause {
            fn fields() -> &'static [::jsonfusion_core::field::FieldDescriptor<Self>] {
                static FIELDS: &[::jsonfusion_core::field::FieldDescriptor<#name>] = &[
                    #(#descriptors),*
                ];
                FIELDS
            }
        }
    })
}

fn field_descriptor_tokens(record_name: &syn::Ident, field: &PreparedField) -> TokenStream {
    let ident = &field.ident;
    let name_str = ident.to_string();
    let key_str = &field.key;
    let required = field.required;
    let validators = validators_tokens(&field.attrs.validators);
    let span = field.ty.span();

    let (read_body, write_body) = if field.attrs.as_array {
        let inner_ty = crate::parse::option_inner_type(&field.ty)
            .expect("as_array already validated against Option<T>");
        (
            quote_spanned! {span=>
                match ::jsonfusion_core::reader::Reader::try_read_null(__reader)? {
                    ::jsonfusion_core::reader::Matched::Yes(()) => {
                        __rec.#ident = ::core::option::Option::None;
                    }
                    ::jsonfusion_core::reader::Matched::No => {
                        __rec.#ident = ::core::option::Option::Some(
                            ::jsonfusion_core::record::read_record_as_array::<#inner_ty>(__reader, __path, __opts)?,
                        );
                    }
                }
            },
            quote_spanned! {span=>
                match &__rec.#ident {
                    ::core::option::Option::Some(v) => {
                        ::jsonfusion_core::record::write_record_as_array(v, __writer, __path, __opts)?;
                    }
                    ::core::option::Option::None => {
                        ::jsonfusion_core::writer::Writer::write_null(__writer)?;
                    }
                }
            },
        )
    } else {
        let ty = &field.ty;
        let validate_on_read = if field.attrs.validators.is_empty() {
            quote! {}
        } else {
            quote_spanned! {span=>
                if __opts.validate_on_parse {
                    ::jsonfusion_core::annotate::check_validators(
                        &__rec.#ident,
                        #validators,
                        __path,
                        ::jsonfusion_core::reader::Reader::offset(__reader),
                    )?;
                }
            }
        };
        let validate_on_write = if field.attrs.validators.is_empty() {
            quote! {}
        } else {
            quote_spanned! {span=>
                if __opts.validate_on_serialize {
                    ::jsonfusion_core::annotate::check_validators(
                        &__rec.#ident,
                        #validators,
                        __path,
                        ::jsonfusion_core::writer::Writer::offset(__writer),
                    )?;
                }
            }
        };
        (
            quote_spanned! {span=>
                __rec.#ident = <#ty as ::jsonfusion_core::schema::Schema>::read_from(__reader, __path)?;
                #validate_on_read
            },
            quote_spanned! {span=>
                #validate_on_write
                ::jsonfusion_core::schema::Schema::write_to(&__rec.#ident, __writer, __path)?;
            },
        )
    };

    quote! {
        ::jsonfusion_core::field::FieldDescriptor::<#record_name> {
            name: #name_str,
            key: #key_str,
            required: #required,
            validators: #validators,
            read: |__rec, __reader, __path, __opts| {
                let _guard = ::jsonfusion_core::path::PathGuard::field(__path, #name_str);
                #read_body
                ::core::result::Result::Ok(())
            },
            write: |__rec, __writer, __path, __opts| {
                let _guard = ::jsonfusion_core::path::PathGuard::field(__path, #name_str);
                #write_body
                ::core::result::Result::Ok(())
            },
        }
    }
}

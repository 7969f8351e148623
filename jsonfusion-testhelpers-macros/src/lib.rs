//! Proc macro for `jsonfusion-testhelpers`.
//!
//! A `#[test]` attribute that parses a function item, splices in a setup
//! call, and forwards to `#[test]` or a caller-supplied test attribute —
//! squarely inside what `syn::parse_macro_input!` + `ItemFn` give for free.

use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, parse_macro_input};

/// Test attribute that installs tracing/panic-hook setup before running the
/// test body.
///
/// ```ignore
/// #[jsonfusion_testhelpers::test]
/// fn my_test() {
///     // setup() has already run
/// }
/// ```
///
/// An explicit test attribute can be supplied for non-default harnesses:
///
/// ```ignore
/// #[jsonfusion_testhelpers::test(tokio::test)]
/// async fn my_async_test() { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let func = parse_macro_input!(item as ItemFn);
    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = func;

    let test_attr: proc_macro2::TokenStream = if attr.is_empty() {
        quote! { #[::core::prelude::rust_2024::test] }
    } else {
        let attr = proc_macro2::TokenStream::from(attr);
        quote! { #[#attr] }
    };

    quote! {
        #test_attr
        #(#attrs)*
        #vis #sig {
            ::jsonfusion_testhelpers::setup();
            #block
        }
    }
    .into()
}

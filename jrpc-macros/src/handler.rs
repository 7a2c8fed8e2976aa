//! `#[handler]` expansion
//!
//! Input:
//! ```ignore
//! #[handler]
//! async fn something(word: String) -> Result<String> {
//!     Ok(format!("{}, please", word))
//! }
//! ```
//!
//! Generated output:
//! ```ignore
//! fn something() -> Box<dyn ::jrpc::processor::Handler> {
//!     async fn inner_handler(word: String) -> Result<String> {
//!         Ok(format!("{}, please", word))
//!     }
//!
//!     ::jrpc::processor::from_typed_fn(inner_handler)
//! }
//! ```

use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{FnArg, ItemFn, ReturnType};

/// Expand an attributed async function into a handler factory
///
/// Rejects non-async functions, methods, generic functions and functions
/// with more than one parameter with a spanned compile error.
pub fn expand(attr: TokenStream, input: ItemFn) -> syn::Result<TokenStream> {
    if !attr.is_empty() {
        return Err(syn::Error::new(attr.span(), "#[handler] takes no arguments"));
    }

    let sig = &input.sig;

    if sig.asyncness.is_none() {
        return Err(syn::Error::new(
            sig.fn_token.span(),
            "#[handler] requires an async fn",
        ));
    }

    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new(
            sig.generics.span(),
            "#[handler] functions cannot be generic",
        ));
    }

    if sig.inputs.len() > 1 {
        return Err(syn::Error::new(
            sig.inputs.span(),
            "#[handler] functions take at most one parameter; use a struct or tuple for several",
        ));
    }

    let (param_pat, param_type) = match sig.inputs.first() {
        Some(FnArg::Typed(pat_type)) => {
            let pat = &pat_type.pat;
            let ty = &pat_type.ty;
            (quote! { #pat }, quote! { #ty })
        }
        Some(FnArg::Receiver(receiver)) => {
            return Err(syn::Error::new(
                receiver.span(),
                "#[handler] cannot be used on methods",
            ));
        }
        None => (quote! { _ }, quote! { () }),
    };

    let return_type = match &sig.output {
        ReturnType::Type(_, ty) => quote! { #ty },
        ReturnType::Default => {
            return Err(syn::Error::new(
                sig.span(),
                "#[handler] functions must return jrpc_core::Result<T>",
            ));
        }
    };

    let fn_name = &sig.ident;
    let fn_vis = &input.vis;
    let fn_block = &input.block;
    let fn_attrs = &input.attrs;

    Ok(quote! {
        #(#fn_attrs)*
        #fn_vis fn #fn_name() -> ::std::boxed::Box<dyn ::jrpc::processor::Handler> {
            async fn inner_handler(#param_pat: #param_type) -> #return_type
                #fn_block

            ::jrpc::processor::from_typed_fn(inner_handler)
        }
    })
}

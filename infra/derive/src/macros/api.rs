use proc_macro2::TokenStream;
use quote::quote;
use syn::ItemFn;

/// Expands the `#[api_handler]` attribute macro.
///
/// The `utoipa::path` attribute is gated on the consumer's `server` feature so
/// handler crates still compile without the `OpenAPI` stack.
pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = input;

    if sig.asyncness.is_none() {
        return syn::Error::new_spanned(&sig.ident, "api_handler expects an async fn")
            .to_compile_error();
    }

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[cfg_attr(feature = "server", ::utoipa::path(#args))]
        #vis #sig #block
    }
}

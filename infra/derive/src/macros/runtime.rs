use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, ItemFn, ReturnType, Type};

/// Expands the `#[rollcall_runtime::main]` attribute macro.
#[must_use]
pub fn expand_main(args: TokenStream, input: ItemFn) -> TokenStream {
    if input.sig.asyncness.is_none() {
        return Error::new_spanned(
            &input.sig.ident,
            "#[rollcall_runtime::main] can only be used on async functions",
        )
        .to_compile_error();
    }

    if !returns_result(&input.sig.output) {
        return Error::new_spanned(
            &input.sig.output,
            "#[rollcall_runtime::main] requires a Result return type",
        )
        .to_compile_error();
    }

    let preset = match parse_profile(args) {
        Ok(preset) => preset,
        Err(err) => return err,
    };

    let ItemFn { attrs, vis, sig, block } = input;
    let name = &sig.ident;
    let output = &sig.output;

    quote! {
        #(#attrs)*
        #vis fn #name() #output {
            let config = #preset;
            let rt = ::rollcall_runtime::build_runtime_with_config(&config)?;
            rt.block_on(async #block)
        }
    }
}

fn parse_profile(args: TokenStream) -> Result<TokenStream, TokenStream> {
    if args.is_empty() {
        return Ok(quote! { ::rollcall_runtime::RuntimeConfig::default() });
    }

    let ident: syn::Ident = syn::parse2(args).map_err(|err| err.to_compile_error())?;
    let preset = match ident.to_string().as_str() {
        "high_performance" => quote! { ::rollcall_runtime::RuntimeConfig::high_performance() },
        "memory_efficient" => quote! { ::rollcall_runtime::RuntimeConfig::memory_efficient() },
        "default" => quote! { ::rollcall_runtime::RuntimeConfig::default() },
        _ => {
            return Err(Error::new_spanned(
                ident,
                "Unknown runtime profile. Use: high_performance, memory_efficient, or default",
            )
            .to_compile_error());
        },
    };
    Ok(preset)
}

fn returns_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(path) = &**ty else {
        return false;
    };
    path.path.segments.last().is_some_and(|seg| seg.ident == "Result")
}

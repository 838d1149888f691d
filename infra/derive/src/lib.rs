#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the Rollcall workspace:
//!
//! * [`macro@rollcall_error`] turns an enum into a context-aware error type.
//! * [`macro@main`] bootstraps a tuned Tokio runtime (re-exported by `rollcall-runtime`).
//! * [`macro@api_handler`] wires an Axum handler into the `OpenAPI` document.
//! * [`macro@rollcall_slice`] wraps feature state into a shareable slice handle.
//!
//! Examples are `ignore`d here because a proc-macro crate cannot use its own macros;
//! see the consuming crates for compiled usage.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to bootstrap the tuned Tokio runtime.
///
/// Turns an `async fn main` returning a `Result` into a plain `fn main` that builds
/// the runtime from one of the `rollcall_runtime::RuntimeConfig` presets.
///
/// # Arguments
///
/// * `high_performance` - Server-side preset.
/// * `memory_efficient` - Low-footprint preset.
/// * `default` (or no argument) - Worker count detected from available parallelism.
///
/// # Examples
///
/// ```rust,ignore
/// #[rollcall_runtime::main(high_performance)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro to bridge Axum handlers with `OpenAPI` documentation.
///
/// Accepts standard `utoipa::path` arguments (`get`, `post`, `path = "..."`,
/// `responses(...)`, `tag = "..."`) and only emits them when the consuming crate
/// enables its `server` feature.
///
/// ```rust,ignore
/// #[api_handler(get, path = "/health", responses((status = OK)), tag = "System")]
/// pub async fn health_handler() -> impl IntoResponse { StatusCode::OK }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Attribute macro for domain-specific error enums.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<ErrorName>Ext` trait with `.context(...)` for `Result<T, ErrorName>` and for
///   `Result<T, SourceError>` of every variant carrying a source.
/// * `From<SourceError>` for variants with a `source` (or `#[source]`/`#[from]`) field.
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * A private `format_context` helper for `#[error(...)]` strings.
///
/// # Requirements
///
/// Variants must use named fields; variants with a source must also carry
/// `context: Option<Cow<'static, str>>`.
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[rollcall_derive::rollcall_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn rollcall_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro to define a feature slice handle.
///
/// The annotated struct becomes `<Name>Inner`; `<Name>` is an `Arc` wrapper that
/// derefs to it and implements `rollcall_kernel::domain::registry::FeatureSlice`.
///
/// ```rust,ignore
/// #[rollcall_derive::rollcall_slice]
/// pub struct Registrations {
///     pub service: RegistrationService,
/// }
///
/// let slice = Registrations::new(RegistrationsInner { service });
/// ```
#[proc_macro_attribute]
pub fn rollcall_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}

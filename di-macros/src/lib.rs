//! Derive macros for `FromRef`-based dependency injection.
//!
//! - `#[derive(Context)]`: every field of the DI root becomes extractable
//! - `#[derive(FromContext)]`: a service is built by extracting each field
//!
//! Generated code refers to `crate::FromRef`, so the consuming crate must
//! re-export the trait at its root.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields};

/// Implement `FromRef<Self>` for the type of each named field.
///
/// ```ignore
/// #[derive(Clone, Context)]
/// pub struct Context {
///     pub config: Arc<Config>,
///     pub accounts: AccountRepository,
/// }
/// // impl FromRef<Context> for Arc<Config> { .. }
/// // impl FromRef<Context> for AccountRepository { .. }
/// ```
#[proc_macro_derive(Context)]
pub fn derive_context(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_context(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Implement `FromRef<Context>` by resolving every field from the context.
///
/// The context defaults to `crate::context::Context`; override it with
/// `#[from_context(context = path::To::Ctx)]`.
///
/// ```ignore
/// #[derive(Clone, FromContext)]
/// pub struct AccountService {
///     accounts: AccountRepository,
///     tracker: Tracker,
/// }
/// ```
#[proc_macro_derive(FromContext, attributes(from_context))]
pub fn derive_from_context(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_from_context(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_context(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let impls = named_fields(input, "Context")?.iter().map(|field| {
        let field_name = &field.ident;
        let field_type = &field.ty;
        quote! {
            impl #impl_generics crate::FromRef<#name #ty_generics> for #field_type #where_clause {
                fn from_ref(ctx: &#name #ty_generics) -> Self {
                    ctx.#field_name.clone()
                }
            }
        }
    });

    Ok(quote! { #(#impls)* })
}

fn expand_from_context(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let context = context_path(input)?;

    let inits = named_fields(input, "FromContext")?.iter().map(|field| {
        let field_name = &field.ident;
        let field_type = &field.ty;
        quote! {
            #field_name: <#field_type as crate::FromRef<#context>>::from_ref(ctx)
        }
    });

    Ok(quote! {
        impl #impl_generics crate::FromRef<#context> for #name #ty_generics #where_clause {
            fn from_ref(ctx: &#context) -> Self {
                Self { #(#inits),* }
            }
        }
    })
}

fn named_fields<'a>(
    input: &'a DeriveInput,
    derive: &str,
) -> syn::Result<&'a Punctuated<Field, Comma>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(&fields.named),
            _ => Err(syn::Error::new_spanned(
                input,
                format!("{} requires a struct with named fields", derive),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            format!("{} can only be derived for structs", derive),
        )),
    }
}

fn context_path(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let mut context: Option<syn::Path> = None;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("from_context")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("context") {
                context = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `context = path`"))
            }
        })?;
    }

    Ok(match context {
        Some(path) => quote! { #path },
        None => quote! { crate::context::Context },
    })
}

use proc_macro::TokenStream;

mod registry;

/// Derives `tagmatch::Registry` for an enum whose variants are unit or carry
/// exactly one payload.
///
/// Next to the enum it generates a module, named after the enum in
/// snake_case unless `#[tagmatch(module = name)]` says otherwise, holding the
/// `Tag` enum and one marker struct per variant.
#[proc_macro_derive(Registry, attributes(tagmatch))]
pub fn derive_registry(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    match registry::Registry::parse(input) {
        Ok(registry) => registry.expand().into(),
        Err(err) => err.to_compile_error().into(),
    }
}

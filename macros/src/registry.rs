use convert_case::{Case, Casing};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, Type, Visibility};

enum Payload {
    Unit,
    Field(Type),
}

struct Variant {
    ident: Ident,
    payload: Payload,
}

pub struct Registry {
    vis: Visibility,
    ident: Ident,
    module: Ident,
    variants: Vec<Variant>,
}

impl Registry {
    pub fn parse(input: DeriveInput) -> syn::Result<Self> {
        let DeriveInput {
            attrs,
            vis,
            ident,
            generics,
            data,
        } = input;

        let data = match data {
            Data::Enum(data) => data,
            _ => {
                return Err(syn::Error::new_spanned(
                    &ident,
                    "`Registry` can only be derived for enums",
                ))
            }
        };

        if !generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &generics,
                "generic registries are not supported",
            ));
        }

        if data.variants.is_empty() {
            return Err(syn::Error::new_spanned(
                &ident,
                "a registry needs at least one variant",
            ));
        }

        let mut module = None;
        for attr in attrs.iter().filter(|a| a.path().is_ident("tagmatch")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("module") {
                    module = Some(meta.value()?.parse::<Ident>()?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported tagmatch attribute"))
                }
            })?;
        }

        let module = match module {
            Some(module) => module,
            None => {
                let name = ident.to_string().to_case(Case::Snake);
                syn::parse_str::<Ident>(&name).map_err(|_| {
                    syn::Error::new_spanned(
                        &ident,
                        format_args!(
                            "`{name}` cannot name a module; \
                             pick one with #[tagmatch(module = ...)]"
                        ),
                    )
                })?
            }
        };

        let variants = data
            .variants
            .into_iter()
            .map(|variant| {
                if variant.ident == "Tag" {
                    return Err(syn::Error::new_spanned(
                        &variant.ident,
                        "a variant named `Tag` would collide with the generated tag enum",
                    ));
                }

                let payload = match variant.fields {
                    Fields::Unit => Payload::Unit,
                    Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                        Payload::Field(fields.unnamed[0].ty.clone())
                    }
                    Fields::Unnamed(fields) => {
                        return Err(syn::Error::new_spanned(
                            fields,
                            "a variant carries exactly one payload; \
                             use a tuple such as `Variant((A, B))`",
                        ))
                    }
                    Fields::Named(fields) => {
                        return Err(syn::Error::new_spanned(
                            fields,
                            "named fields are not supported; \
                             carry a struct payload such as `Variant(Record)`",
                        ))
                    }
                };

                Ok(Variant {
                    ident: variant.ident,
                    payload,
                })
            })
            .collect::<syn::Result<Vec<_>>>()?;

        Ok(Registry {
            vis,
            ident,
            module,
            variants,
        })
    }

    pub fn expand(&self) -> TokenStream {
        let Registry {
            vis,
            ident,
            module,
            variants,
        } = self;

        let name = ident.to_string();
        let tags = variants.iter().map(|v| &v.ident).collect::<Vec<_>>();
        let tag_names = tags.iter().map(|t| t.to_string()).collect::<Vec<_>>();

        let module_doc = format!("Tags and variant markers of `{name}`.");
        let tag_docs = tag_names.iter().map(|t| format!("The `{t}` tag."));
        let marker_docs = tag_names.iter().map(|t| format!("Names the `{t}` variant."));

        let patterns = variants.iter().map(|variant| self.expand_variant(variant));

        quote! {
            #[doc = #module_doc]
            #vis mod #module {
                /// The tags of the registry.
                #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
                pub enum Tag {
                    #(
                        #[doc = #tag_docs]
                        #tags,
                    )*
                }

                #(
                    #[doc = #marker_docs]
                    #[derive(Debug, Clone, Copy, Default)]
                    pub struct #tags;
                )*
            }

            #[automatically_derived]
            impl ::tagmatch::Tag for #module::Tag {
                fn name(self) -> &'static str {
                    match self {
                        #(#module::Tag::#tags => #tag_names,)*
                    }
                }
            }

            #[automatically_derived]
            impl ::tagmatch::Matchable for #ident {
                type Tag = #module::Tag;

                fn tag(&self) -> #module::Tag {
                    match self {
                        #(#ident::#tags { .. } => #module::Tag::#tags,)*
                    }
                }
            }

            #[automatically_derived]
            impl ::tagmatch::Registry for #ident {
                const NAME: &'static str = #name;
                const TAGS: &'static [#module::Tag] = &[#(#module::Tag::#tags),*];
            }

            #(#patterns)*
        }
    }

    fn expand_variant(&self, variant: &Variant) -> TokenStream {
        let Registry { ident, module, .. } = self;
        let tag = &variant.ident;

        let (payload, peek, take, inject) = match &variant.payload {
            Payload::Unit => (
                quote!(()),
                quote!(#ident::#tag => ::core::option::Option::Some(&())),
                quote!(#ident::#tag => ::core::result::Result::Ok(())),
                quote!(fn inject((): ()) -> #ident { #ident::#tag }),
            ),
            Payload::Field(ty) => (
                quote!(#ty),
                quote!(#ident::#tag(payload) => ::core::option::Option::Some(payload)),
                quote!(#ident::#tag(payload) => ::core::result::Result::Ok(payload)),
                quote!(fn inject(payload: #ty) -> #ident { #ident::#tag(payload) }),
            ),
        };

        quote! {
            #[automatically_derived]
            impl ::tagmatch::Pattern<#ident> for #module::#tag {
                type Payload = #payload;

                fn tag(&self) -> #module::Tag {
                    #module::Tag::#tag
                }

                #[allow(unreachable_patterns)]
                fn peek<'v>(&self, value: &'v #ident) -> ::core::option::Option<&'v #payload> {
                    match value {
                        #peek,
                        _ => ::core::option::Option::None,
                    }
                }

                #[allow(unreachable_patterns)]
                fn take(&self, value: #ident) -> ::core::result::Result<#payload, #ident> {
                    match value {
                        #take,
                        other => ::core::result::Result::Err(other),
                    }
                }
            }

            #[automatically_derived]
            impl ::tagmatch::Variant<#ident> for #module::#tag {
                const TAG: #module::Tag = #module::Tag::#tag;

                #inject
            }
        }
    }
}

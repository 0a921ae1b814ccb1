//! `#[derive(EnumParameter)]` expansion.
//!
//! A unit enum becomes a host parameter whose integer code is the variant's
//! position. The expansion has two parts:
//!
//! - an `EnumParameterValue` impl (index conversion, default variant, display
//!   names), addressed through the `rope` facade as `::rope::core::...`;
//! - inherent `from_code`, `code` and `name` methods. `from_code` maps any
//!   code that names no variant, negative ones included, to the default.
//!
//! Explicit discriminants are accepted only when they equal the position, so
//! `variant as u8` and the parameter code cannot drift apart.

use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Ident, Lit};

/// Largest variant count whose codes fit the `u8` returned by `code()`.
const MAX_VARIANTS: usize = u8::MAX as usize + 1;

struct ParameterVariant {
    ident: Ident,
    label: String,
    is_default: bool,
}

/// A validated enum, ready for expansion.
struct ParameterEnum<'a> {
    input: &'a DeriveInput,
    variants: Vec<ParameterVariant>,
    default_index: usize,
}

pub fn derive_enum_parameter_impl(input: DeriveInput) -> syn::Result<TokenStream> {
    let parsed = ParameterEnum::parse(&input)?;
    let trait_impl = parsed.trait_impl();
    let code_impl = parsed.code_impl();
    Ok(quote! {
        #trait_impl
        #code_impl
    })
}

impl<'a> ParameterEnum<'a> {
    fn parse(input: &'a DeriveInput) -> syn::Result<Self> {
        let Data::Enum(data) = &input.data else {
            return Err(syn::Error::new_spanned(
                input,
                "#[derive(EnumParameter)] can only be applied to enums",
            ));
        };

        let mut variants = Vec::with_capacity(data.variants.len());
        for (position, variant) in data.variants.iter().enumerate() {
            if !matches!(variant.fields, Fields::Unit) {
                return Err(syn::Error::new_spanned(
                    variant,
                    "#[derive(EnumParameter)] variants cannot carry data",
                ));
            }
            if let Some((_, discriminant)) = &variant.discriminant {
                check_discriminant(discriminant, position)?;
            }
            variants.push(ParameterVariant {
                ident: variant.ident.clone(),
                label: label_attribute(&variant.attrs)?
                    .unwrap_or_else(|| variant.ident.to_string()),
                is_default: variant.attrs.iter().any(|a| a.path().is_ident("default")),
            });
        }

        if variants.is_empty() || variants.len() > MAX_VARIANTS {
            return Err(syn::Error::new_spanned(
                input,
                format!(
                    "#[derive(EnumParameter)] needs between 1 and {} variants",
                    MAX_VARIANTS
                ),
            ));
        }

        let mut defaults = variants
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_default)
            .map(|(i, _)| i);
        let default_index = defaults.next().unwrap_or(0);
        if defaults.next().is_some() {
            return Err(syn::Error::new_spanned(
                input,
                "#[derive(EnumParameter)] allows a single #[default] variant",
            ));
        }

        Ok(Self {
            input,
            variants,
            default_index,
        })
    }

    fn idents(&self) -> impl Iterator<Item = &Ident> {
        self.variants.iter().map(|v| &v.ident)
    }

    fn labels(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|v| v.label.as_str())
    }

    fn default_ident(&self) -> &Ident {
        &self.variants[self.default_index].ident
    }

    /// `impl EnumParameterValue`.
    fn trait_impl(&self) -> TokenStream {
        let name = &self.input.ident;
        let (impl_generics, ty_generics, where_clause) = self.input.generics.split_for_impl();
        let count = self.variants.len();
        let default_index = self.default_index;
        let positions: Vec<usize> = (0..count).collect();
        let idents: Vec<&Ident> = self.idents().collect();
        let labels: Vec<&str> = self.labels().collect();
        let default_ident = self.default_ident();

        quote! {
            impl #impl_generics ::rope::core::parameters::EnumParameterValue
                for #name #ty_generics #where_clause
            {
                const COUNT: usize = #count;
                const DEFAULT_INDEX: usize = #default_index;

                fn from_index(index: usize) -> ::core::option::Option<Self> {
                    match index {
                        #(#positions => ::core::option::Option::Some(Self::#idents),)*
                        _ => ::core::option::Option::None,
                    }
                }

                fn to_index(self) -> usize {
                    match self {
                        #(Self::#idents => #positions,)*
                    }
                }

                fn default_value() -> Self {
                    Self::#default_ident
                }

                fn names() -> &'static [&'static str] {
                    &[#(#labels),*]
                }
            }
        }
    }

    /// Inherent `from_code` / `code` / `name`.
    fn code_impl(&self) -> TokenStream {
        let name = &self.input.ident;
        let (impl_generics, ty_generics, where_clause) = self.input.generics.split_for_impl();
        let wide_codes = (0..self.variants.len()).map(|i| Literal::i64_unsuffixed(i as i64));
        let narrow_codes = (0..self.variants.len()).map(|i| Literal::u8_suffixed(i as u8));
        let idents: Vec<&Ident> = self.idents().collect();
        let labels: Vec<&str> = self.labels().collect();
        let default_ident = self.default_ident();

        quote! {
            impl #impl_generics #name #ty_generics #where_clause {
                /// Decode a host parameter code. Codes that name no variant
                /// give the default variant.
                pub fn from_code(code: i64) -> Self {
                    match code {
                        #(#wide_codes => Self::#idents,)*
                        _ => Self::#default_ident,
                    }
                }

                /// Host parameter code (the variant's position).
                pub const fn code(self) -> u8 {
                    match self {
                        #(Self::#idents => #narrow_codes,)*
                    }
                }

                /// Display name, from `#[name = "..."]` or the identifier.
                pub fn name(self) -> &'static str {
                    match self {
                        #(Self::#idents => #labels,)*
                    }
                }
            }
        }
    }
}

/// Reject a discriminant that is not the integer literal `position`.
fn check_discriminant(expr: &Expr, position: usize) -> syn::Result<()> {
    let Expr::Lit(ExprLit {
        lit: Lit::Int(value),
        ..
    }) = expr
    else {
        return Err(syn::Error::new_spanned(
            expr,
            "#[derive(EnumParameter)] discriminants must be integer literals",
        ));
    };

    let value: usize = value.base10_parse()?;
    if value != position {
        return Err(syn::Error::new_spanned(
            expr,
            format!(
                "#[derive(EnumParameter)] discriminant {} must equal variant position {}",
                value, position
            ),
        ));
    }
    Ok(())
}

/// Read `#[name = "..."]`.
fn label_attribute(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let Some(attr) = attrs.iter().find(|a| a.path().is_ident("name")) else {
        return Ok(None);
    };
    match &attr.meta.require_name_value()?.value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(label),
            ..
        }) => Ok(Some(label.value())),
        other => Err(syn::Error::new_spanned(
            other,
            "expected a string literal: #[name = \"...\"]",
        )),
    }
}

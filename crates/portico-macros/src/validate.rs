//! `Validate` derive expansion.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, Expr, LitStr};

use crate::parse::{FieldRules, Rule, ValidateInput};

/// Expands `#[derive(Validate)]`.
pub fn expand_validate(input: DeriveInput) -> syn::Result<TokenStream> {
    let parsed = ValidateInput::parse(input)?;

    let ident = &parsed.ident;
    let (impl_generics, ty_generics, where_clause) = parsed.generics.split_for_impl();
    let checks = parsed.fields.iter().map(field_checks);

    Ok(quote! {
        impl #impl_generics ::portico::validation::Validate for #ident #ty_generics #where_clause {
            fn validate(
                &self,
            ) -> ::core::result::Result<(), ::portico::validation::ValidationErrors> {
                #[allow(unused_mut)]
                let mut errors = ::portico::validation::ValidationErrors::new();
                #(#checks)*
                errors.into_result()
            }
        }
    })
}

fn field_checks(field: &FieldRules) -> TokenStream {
    let checks = field
        .rules
        .iter()
        .enumerate()
        .map(|(index, rule)| rule_check(field, index, rule));
    quote! { #(#checks)* }
}

fn rule_check(field: &FieldRules, index: usize, rule: &Rule) -> TokenStream {
    let ident = &field.ident;
    let name = &field.name;
    let rule_name = rule.name();
    let rules = quote! { ::portico::validation::rules };

    let call = match rule {
        Rule::Required => quote! { #rules::required(&self.#ident) },
        Rule::Email => quote! { #rules::email(&self.#ident) },
        Rule::Length { min, max } => {
            let min = bound(min.as_ref(), &quote!(usize));
            let max = bound(max.as_ref(), &quote!(usize));
            quote! { #rules::length(&self.#ident, #min, #max) }
        }
        Rule::Range { min, max } => {
            let min = bound(min.as_ref(), &quote!(f64));
            let max = bound(max.as_ref(), &quote!(f64));
            quote! { #rules::range(&self.#ident, #min, #max) }
        }
        Rule::OneOf(values) => quote! { #rules::one_of(&self.#ident, &[#(#values),*]) },
        Rule::Custom(path) => quote! { #path(&self.#ident) },
        Rule::Pattern(lit) => return pattern_check(field, index, lit),
        Rule::Nested => {
            return quote! {
                if let ::core::result::Result::Err(nested) =
                    ::portico::validation::Validate::validate(&self.#ident)
                {
                    errors.merge_nested(#name, nested);
                }
            };
        }
    };

    let (binding, message) = message_tokens(field.message.as_ref());
    quote! {
        if let ::core::result::Result::Err(#binding) = #call {
            errors.add(#name, #rule_name, #message);
        }
    }
}

fn pattern_check(field: &FieldRules, index: usize, lit: &LitStr) -> TokenStream {
    let ident = &field.ident;
    let name = &field.name;
    let cache = format_ident!("PATTERN_{}", index);
    let (binding, message) = message_tokens(field.message.as_ref());

    quote! {
        {
            static #cache: ::std::sync::OnceLock<::portico::validation::rules::Regex> =
                ::std::sync::OnceLock::new();
            let pattern = #cache.get_or_init(|| {
                ::portico::validation::rules::Regex::new(#lit)
                    .expect("pattern checked at compile time")
            });
            if let ::core::result::Result::Err(#binding) =
                ::portico::validation::rules::pattern(&self.#ident, pattern)
            {
                errors.add(#name, "pattern", #message);
            }
        }
    }
}

fn bound(expr: Option<&Expr>, ty: &TokenStream) -> TokenStream {
    match expr {
        Some(expr) => quote! { ::core::option::Option::Some((#expr) as #ty) },
        None => quote! { ::core::option::Option::None },
    }
}

// Pattern binding for the rule's error and the message expression to report.
fn message_tokens(custom: Option<&LitStr>) -> (TokenStream, TokenStream) {
    match custom {
        Some(lit) => (quote! { _ }, quote! { #lit }),
        None => (quote! { message }, quote! { message }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand(input: DeriveInput) -> String {
        expand_validate(input).unwrap().to_string()
    }

    #[test]
    fn test_expands_trait_impl() {
        let out = expand(parse_quote! {
            struct CreateUser {
                #[validate(required)]
                name: String,
            }
        });

        assert!(out.contains("impl :: portico :: validation :: Validate for CreateUser"));
        assert!(out.contains("rules :: required (& self . name)"));
        assert!(out.contains("errors . add (\"name\" , \"required\" , message)"));
    }

    #[test]
    fn test_expands_bounds() {
        let out = expand(parse_quote! {
            struct Page {
                #[validate(range(min = 1))]
                page: u32,
                #[validate(length(max = 3))]
                tags: Vec<String>,
            }
        });

        assert!(out.contains("Some ((1) as f64)"));
        assert!(out.contains("rules :: length (& self . tags , :: core :: option :: Option :: None"));
    }

    #[test]
    fn test_expands_pattern_cache() {
        let out = expand(parse_quote! {
            struct Sku {
                #[validate(pattern = "^[A-Z]+$")]
                code: String,
            }
        });

        assert!(out.contains("static PATTERN_0"));
        assert!(out.contains("OnceLock"));
    }

    #[test]
    fn test_expands_nested_and_message() {
        let out = expand(parse_quote! {
            struct Order {
                #[validate(nested)]
                address: Address,
                #[validate(required, message = "pick one")]
                plan: Option<String>,
            }
        });

        assert!(out.contains("merge_nested (\"address\" , nested)"));
        assert!(out.contains("\"pick one\""));
    }

    #[test]
    fn test_keeps_generics() {
        let out = expand(parse_quote! {
            struct Wrapper<T: Clone> where T: Default {
                #[validate(nested)]
                inner: T,
            }
        });

        assert!(out.contains("impl < T : Clone >"));
        assert!(out.contains("for Wrapper < T >"));
    }

    #[test]
    fn test_struct_without_rules_still_validates() {
        let out = expand(parse_quote! {
            struct Empty {
                name: String,
            }
        });

        assert!(out.contains("errors . into_result ()"));
    }
}

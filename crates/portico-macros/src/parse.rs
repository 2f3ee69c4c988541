//! Parsing utilities for the `Validate` derive.
//!
//! This module turns a struct definition and its `#[validate(...)]` field
//! attributes into a list of [`FieldRules`].

use proc_macro2::TokenStream;
use syn::{
    parenthesized, punctuated::Punctuated, spanned::Spanned, Attribute, Data, DeriveInput, Expr,
    Fields, Generics, Ident, LitStr, Path, Token,
};

/// A single validation rule attached to a field.
#[derive(Debug)]
pub enum Rule {
    /// `required`
    Required,
    /// `email`
    Email,
    /// `nested`
    Nested,
    /// `length(min = .., max = ..)`
    Length {
        /// Lower bound.
        min: Option<Expr>,
        /// Upper bound.
        max: Option<Expr>,
    },
    /// `range(min = .., max = ..)`
    Range {
        /// Lower bound.
        min: Option<Expr>,
        /// Upper bound.
        max: Option<Expr>,
    },
    /// `pattern = "..."`
    Pattern(LitStr),
    /// `one_of("a", "b")`
    OneOf(Vec<LitStr>),
    /// `custom = "path::to::fn"`
    Custom(Path),
}

impl Rule {
    /// Rule name reported in violations.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Email => "email",
            Self::Nested => "nested",
            Self::Length { .. } => "length",
            Self::Range { .. } => "range",
            Self::Pattern(_) => "pattern",
            Self::OneOf(_) => "one_of",
            Self::Custom(_) => "custom",
        }
    }
}

/// All rules declared on one field.
#[derive(Debug)]
pub struct FieldRules {
    /// The field identifier.
    pub ident: Ident,
    /// Name used in violation paths (serde rename or the identifier).
    pub name: String,
    /// Declared rules, in attribute order.
    pub rules: Vec<Rule>,
    /// Message overriding every rule's default message.
    pub message: Option<LitStr>,
}

/// A parsed `#[derive(Validate)]` input.
#[derive(Debug)]
pub struct ValidateInput {
    /// The struct name.
    pub ident: Ident,
    /// The struct generics.
    pub generics: Generics,
    /// Fields carrying at least one rule.
    pub fields: Vec<FieldRules>,
}

impl ValidateInput {
    /// Parses a derive input into validation metadata.
    pub fn parse(input: DeriveInput) -> syn::Result<Self> {
        let Data::Struct(data) = &input.data else {
            return Err(syn::Error::new(
                input.ident.span(),
                "Validate can only be derived for structs",
            ));
        };

        let Fields::Named(named) = &data.fields else {
            return Err(syn::Error::new(
                data.fields.span(),
                "Validate can only be derived for structs with named fields",
            ));
        };

        let mut fields = Vec::new();
        for field in &named.named {
            let Some(ident) = field.ident.clone() else {
                continue;
            };

            let mut rules = Vec::new();
            let mut message = None;
            for attr in field.attrs.iter().filter(|a| a.path().is_ident("validate")) {
                parse_validate_attr(attr, &mut rules, &mut message)?;
            }

            if rules.is_empty() {
                if let Some(message) = message {
                    return Err(syn::Error::new(
                        message.span(),
                        "`message` needs at least one rule on the same field",
                    ));
                }
                continue;
            }

            let name = serde_rename(&field.attrs)?
                .unwrap_or_else(|| ident.to_string().trim_start_matches("r#").to_string());

            fields.push(FieldRules {
                ident,
                name,
                rules,
                message,
            });
        }

        Ok(Self {
            ident: input.ident,
            generics: input.generics,
            fields,
        })
    }
}

fn parse_validate_attr(
    attr: &Attribute,
    rules: &mut Vec<Rule>,
    message: &mut Option<LitStr>,
) -> syn::Result<()> {
    attr.parse_nested_meta(|meta| {
        let key = meta
            .path
            .get_ident()
            .ok_or_else(|| meta.error("expected identifier"))?
            .to_string();

        match key.as_str() {
            "required" => rules.push(Rule::Required),
            "email" => rules.push(Rule::Email),
            "nested" => rules.push(Rule::Nested),
            "length" | "range" => {
                let mut min = None;
                let mut max = None;
                meta.parse_nested_meta(|bound| {
                    if bound.path.is_ident("min") {
                        min = Some(bound.value()?.parse::<Expr>()?);
                    } else if bound.path.is_ident("max") {
                        max = Some(bound.value()?.parse::<Expr>()?);
                    } else {
                        return Err(bound.error("expected `min` or `max`"));
                    }
                    Ok(())
                })?;

                if min.is_none() && max.is_none() {
                    return Err(meta.error(format!("`{key}` needs `min`, `max` or both")));
                }

                rules.push(if key == "length" {
                    Rule::Length { min, max }
                } else {
                    Rule::Range { min, max }
                });
            }
            "pattern" => {
                let lit: LitStr = meta.value()?.parse()?;
                if let Err(e) = regex::Regex::new(&lit.value()) {
                    return Err(syn::Error::new(lit.span(), format!("invalid pattern: {e}")));
                }
                rules.push(Rule::Pattern(lit));
            }
            "one_of" => {
                let content;
                parenthesized!(content in meta.input);
                let values = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
                if values.is_empty() {
                    return Err(meta.error("`one_of` needs at least one value"));
                }
                rules.push(Rule::OneOf(values.into_iter().collect()));
            }
            "custom" => {
                let lit: LitStr = meta.value()?.parse()?;
                rules.push(Rule::Custom(lit.parse()?));
            }
            "message" => {
                *message = Some(meta.value()?.parse()?);
            }
            _ => return Err(meta.error(format!("unknown validation rule: {key}"))),
        }
        Ok(())
    })
}

// Finds `#[serde(rename = "...")]` on a field, skipping every other serde key.
fn serde_rename(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut rename = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") && meta.input.peek(Token![=]) {
                let lit: LitStr = meta.value()?.parse()?;
                rename = Some(lit.value());
            } else if meta.input.peek(Token![=]) {
                meta.value()?.parse::<Expr>()?;
            } else if meta.input.peek(syn::token::Paren) {
                let content;
                parenthesized!(content in meta.input);
                content.parse::<TokenStream>()?;
            }
            Ok(())
        })?;
    }
    Ok(rename)
}

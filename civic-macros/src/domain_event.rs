use crate::utils::{apply_derives, set_once};
use proc_macro::TokenStream;
use quote::quote;
use std::collections::HashMap;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    Expr, Ident, Item, LitInt, LitStr, Result, Token, parse::Parse, parse::ParseStream,
    parse_macro_input,
};

/// #[domain_event] 宏实现
/// - 支持枚举（任意变体形式）与结构体
/// - 生成 `::civic_domain::domain_event::EventPayload` 实现（event_name/event_version）
/// - 默认名称：枚举为 `Enum.Variant`，结构体为类型名；默认版本 1
/// - 支持：`#[domain_event(version = N)]`，结构体另支持 `name = "..."`
/// - 枚举变体可覆写：`#[event(event_name = "...", event_version = N)]`
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EventAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let version_lit = cfg.version.unwrap_or_else(|| syn::parse_quote! { 1 });

    // 合并/追加默认派生：Debug, Clone, PartialEq, Serialize, Deserialize
    let required: Vec<syn::Path> = vec![
        syn::parse_quote!(Debug),
        syn::parse_quote!(Clone),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];

    match &mut input {
        Item::Struct(st) => {
            apply_derives(&mut st.attrs, required);

            let ident = &st.ident;
            let name_lit = cfg
                .name
                .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
            let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

            TokenStream::from(quote! {
                #st

                impl #impl_generics ::civic_domain::domain_event::EventPayload for #ident #ty_generics #where_clause {
                    fn event_name(&self) -> &str { #name_lit }
                    fn event_version(&self) -> u32 { #version_lit }
                }
            })
        }
        Item::Enum(enum_item) => {
            if let Some(name) = cfg.name {
                return syn::Error::new(
                    name.span(),
                    "'name' is only supported on structs; use #[event(event_name = ...)] on variants",
                )
                .to_compile_error()
                .into();
            }
            apply_derives(&mut enum_item.attrs, required);

            let mut variant_names: HashMap<String, LitStr> = HashMap::new();
            let mut variant_versions: HashMap<String, LitInt> = HashMap::new();

            for v in &mut enum_item.variants {
                let mut retained_attrs = Vec::new();
                let mut name_lit: Option<LitStr> = None;
                let mut version_lit_local: Option<LitInt> = None;

                for attr in v.attrs.iter() {
                    if attr.path().is_ident("event") {
                        match parse_variant_event_attr(attr) {
                            Ok(vc) => {
                                if let Some(lit) = vc.name {
                                    if name_lit.is_some() {
                                        return syn::Error::new(
                                            attr.span(),
                                            "duplicate 'event_name' specified for this variant",
                                        )
                                        .to_compile_error()
                                        .into();
                                    }
                                    name_lit = Some(lit);
                                }
                                if let Some(lit) = vc.version {
                                    if version_lit_local.is_some() {
                                        return syn::Error::new(
                                            attr.span(),
                                            "duplicate 'event_version' specified for this variant",
                                        )
                                        .to_compile_error()
                                        .into();
                                    }
                                    version_lit_local = Some(lit);
                                }
                            }
                            Err(err) => {
                                return err.to_compile_error().into();
                            }
                        }
                    } else {
                        retained_attrs.push(attr.clone());
                    }
                }

                v.attrs = retained_attrs;
                if let Some(lit) = name_lit {
                    variant_names.insert(v.ident.to_string(), lit);
                }
                if let Some(lit) = version_lit_local {
                    variant_versions.insert(v.ident.to_string(), lit);
                }
            }

            let enum_ident = &enum_item.ident;
            let enum_name_string = enum_ident.to_string();

            // `Variant { .. }` 模式同时匹配具名、元组与单元变体
            let name_match_arms = enum_item.variants.iter().map(|v| {
                let v_ident = &v.ident;
                let key = v_ident.to_string();
                if let Some(lit) = variant_names.get(&key) {
                    quote! { Self::#v_ident { .. } => #lit }
                } else {
                    let combined = format!("{}.{}", enum_name_string, key);
                    let lit = LitStr::new(&combined, v_ident.span());
                    quote! { Self::#v_ident { .. } => #lit }
                }
            });

            let ver_match_arms = enum_item.variants.iter().map(|v| {
                let v_ident = &v.ident;
                let key = v_ident.to_string();
                if let Some(lit) = variant_versions.get(&key) {
                    quote! { Self::#v_ident { .. } => #lit }
                } else {
                    quote! { Self::#v_ident { .. } => #version_lit }
                }
            });

            let (impl_generics, ty_generics, where_clause) = enum_item.generics.split_for_impl();

            TokenStream::from(quote! {
                #enum_item

                impl #impl_generics ::civic_domain::domain_event::EventPayload for #enum_ident #ty_generics #where_clause {
                    fn event_name(&self) -> &str { match self { #( #name_match_arms, )* } }
                    fn event_version(&self) -> u32 { match self { #( #ver_match_arms, )* } }
                }
            })
        }
        other => syn::Error::new(
            other.span(),
            "#[domain_event] can only be used on enum or struct types",
        )
        .to_compile_error()
        .into(),
    }
}

// -------- utils & parsing --------

struct VariantEventAttrConfig {
    name: Option<LitStr>,
    version: Option<LitInt>,
}

fn parse_variant_event_attr(attr: &syn::Attribute) -> Result<VariantEventAttrConfig> {
    match &attr.meta {
        syn::Meta::List(_) => {
            let mut name: Option<LitStr> = None;
            let mut version: Option<LitInt> = None;
            let pairs: Punctuated<VariantEventAttrKv, Token![,]> = attr
                .parse_args_with(Punctuated::<VariantEventAttrKv, Token![,]>::parse_terminated)?;

            for kv in pairs {
                match kv.key.to_string().as_str() {
                    "event_name" => {
                        let lit = match kv.value {
                            Expr::Lit(syn::ExprLit {
                                lit: syn::Lit::Str(lit),
                                ..
                            }) => lit,
                            other => {
                                return Err(syn::Error::new(
                                    other.span(),
                                    "expected string literal for 'event_name'",
                                ));
                            }
                        };
                        set_once(&mut name, lit, &kv.key)?;
                    }
                    "event_version" => {
                        let lit = match kv.value {
                            Expr::Lit(syn::ExprLit {
                                lit: syn::Lit::Int(lit),
                                ..
                            }) => lit,
                            other => {
                                return Err(syn::Error::new(
                                    other.span(),
                                    "expected integer literal for 'event_version'",
                                ));
                            }
                        };
                        set_once(&mut version, lit, &kv.key)?;
                    }
                    _ => {
                        return Err(syn::Error::new(
                            kv.key.span(),
                            "unknown key; expected 'event_name' | 'event_version'",
                        ));
                    }
                }
            }

            Ok(VariantEventAttrConfig { name, version })
        }
        other => Err(syn::Error::new(other.span(), "expected #[event(...)]")),
    }
}

struct VariantEventAttrKv {
    key: Ident,
    #[allow(dead_code)]
    eq: Token![=],
    value: Expr,
}

impl Parse for VariantEventAttrKv {
    fn parse(input: ParseStream) -> Result<Self> {
        Ok(Self {
            key: input.parse()?,
            eq: input.parse()?,
            value: input.parse()?,
        })
    }
}

// 类型级配置：默认版本号、结构体事件名称
struct EventAttrConfig {
    name: Option<LitStr>,
    version: Option<LitInt>,
}

impl Parse for EventAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut name: Option<LitStr> = None;
        let mut version: Option<LitInt> = None;

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            let _eq: Token![=] = input.parse()?;
            match key.to_string().as_str() {
                "name" => set_once(&mut name, input.parse::<LitStr>()?, &key)?,
                "version" => set_once(&mut version, input.parse::<LitInt>()?, &key)?,
                _ => {
                    return Err(syn::Error::new(
                        key.span(),
                        "unknown key; expected 'name' | 'version'",
                    ));
                }
            }
            if input.is_empty() {
                break;
            }
            let _comma: Token![,] = input.parse()?;
        }

        Ok(Self { name, version })
    }
}

use crate::utils::{apply_derives, ensure_leading_fields, set_once};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::spanned::Spanned;
use syn::{
    Ident, Item, ItemStruct, LitBool, Result, Token, Type, parse::Parse, parse::ParseStream,
    parse_macro_input,
};

/// #[entity] 宏实现
/// - 注入字段 `meta: EntityMeta<IdType>`（若缺失），并置于字段最前
/// - 自动实现 `::civic_domain::entity::Entity`（meta/meta_mut）
/// - 生成基于标识的 `PartialEq` 与 `Hash`（瞬态实体恒不相等，因此不派生 `Eq`）
/// - 支持参数：`#[entity(id = IdType, debug = true|false)]`；
///   - `id` 默认 `::civic_domain::identifier::Uuid`
///   - `debug` 默认 `true`（派生 Debug）。当为 `false` 时不派生 Debug，便于用户自定义实现。
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EntityAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[entity] only on struct")
                .to_compile_error()
                .into();
        }
    };

    let id_type = cfg.id_ty.unwrap_or_else(default_id_type);

    if let Err(err) = inject_meta(&mut st, &id_type, Vec::new(), "#[entity]") {
        return err.to_compile_error().into();
    }
    apply_entity_derives(&mut st, cfg.derive_debug.unwrap_or(true));

    let impls = entity_impls(&st, &id_type);

    TokenStream::from(quote! {
        #st

        #impls
    })
}

pub(crate) fn default_id_type() -> Type {
    syn::parse_quote! { ::civic_domain::identifier::Uuid }
}

/// 注入 `meta` 字段（以及调用方给出的其他前置字段）
pub(crate) fn inject_meta(
    st: &mut ItemStruct,
    id_type: &Type,
    extra: Vec<syn::Field>,
    macro_name: &str,
) -> Result<()> {
    let span = st.span();
    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return Err(syn::Error::new(
                span,
                format!("{macro_name} only supports named-field struct"),
            ));
        }
    };

    let meta_field: syn::Field =
        syn::parse_quote! { meta: ::civic_domain::entity::EntityMeta<#id_type> };

    let mut required = vec![meta_field];
    required.extend(extra);
    ensure_leading_fields(fields_named, required);
    Ok(())
}

// 合并/规范 derive：Debug（可通过 debug=false 关闭）、Clone、Serialize、Deserialize
pub(crate) fn apply_entity_derives(st: &mut ItemStruct, derive_debug: bool) {
    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Clone),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    if derive_debug {
        required.insert(0, syn::parse_quote!(Debug));
    }
    apply_derives(&mut st.attrs, required);
}

/// 生成 Entity / PartialEq / Hash 实现
pub(crate) fn entity_impls(st: &ItemStruct, id_type: &Type) -> TokenStream2 {
    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    quote! {
        impl #impl_generics ::civic_domain::entity::Entity for #ident #ty_generics #where_clause {
            type Id = #id_type;

            fn meta(&self) -> &::civic_domain::entity::EntityMeta<#id_type> { &self.meta }

            fn meta_mut(&mut self) -> &mut ::civic_domain::entity::EntityMeta<#id_type> { &mut self.meta }
        }

        impl #impl_generics ::core::cmp::PartialEq for #ident #ty_generics #where_clause {
            fn eq(&self, other: &Self) -> bool {
                ::civic_domain::entity::Entity::same_identity_as(self, other)
            }
        }

        impl #impl_generics ::core::hash::Hash for #ident #ty_generics #where_clause {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                ::core::hash::Hash::hash(self.meta.id(), state)
            }
        }
    }
}

// -------- parsing --------

struct EntityAttrConfig {
    id_ty: Option<Type>,
    derive_debug: Option<bool>,
}

impl Parse for EntityAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut id_ty: Option<Type> = None;
        let mut derive_debug: Option<bool> = None;

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            let _eq: Token![=] = input.parse()?;
            match key.to_string().as_str() {
                "id" => set_once(&mut id_ty, input.parse::<Type>()?, &key)?,
                "debug" => set_once(&mut derive_debug, input.parse::<LitBool>()?.value(), &key)?,
                _ => {
                    return Err(syn::Error::new(
                        key.span(),
                        "unknown key in attribute; expected 'id' or 'debug'",
                    ));
                }
            }
            if input.is_empty() {
                break;
            }
            let _comma: Token![,] = input.parse()?;
        }

        Ok(Self {
            id_ty,
            derive_debug,
        })
    }
}

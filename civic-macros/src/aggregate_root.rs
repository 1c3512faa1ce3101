use crate::entity::{apply_entity_derives, default_id_type, entity_impls, inject_meta};
use crate::utils::set_once;
use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{
    Ident, Item, LitBool, LitStr, Result, Token, Type, parse::Parse, parse::ParseStream,
    parse_macro_input,
};

/// #[aggregate_root] 宏实现
/// - 注入字段：`meta: EntityMeta<IdType>` 与 `events: DomainEvents<EventType, IdType>`
///   （事件缓冲区不参与序列化）
/// - 实现 `Entity`、`AggregateRoot`，以及基于标识的 `PartialEq` / `Hash`
/// - 生成私有方法 `raise_event(event)` 与 `record(payload)`：只有聚合所在模块
///   可以暂存事件，外部只能通过 `domain_events()` 读取
/// - 参数：`#[aggregate_root(event = EventType, aggregate_type = "name", id = IdType, debug = bool)]`
///   - `event`、`aggregate_type` 必填；`id` 默认 `::civic_domain::identifier::Uuid`
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as AggregateAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[aggregate_root] only on struct")
                .to_compile_error()
                .into();
        }
    };

    let (event_type, aggregate_type) = match (cfg.event_ty, cfg.aggregate_type) {
        (Some(event), Some(name)) => (event, name),
        _ => {
            return syn::Error::new(
                st.ident.span(),
                "#[aggregate_root] requires `event = Type` and `aggregate_type = \"name\"`",
            )
            .to_compile_error()
            .into();
        }
    };
    if name_is_blank(&aggregate_type) {
        return syn::Error::new(aggregate_type.span(), "aggregate_type cannot be empty")
            .to_compile_error()
            .into();
    }

    let id_type = cfg.id_ty.unwrap_or_else(default_id_type);

    let events_field: syn::Field = syn::parse_quote! {
        #[serde(skip)]
        events: ::civic_domain::domain_event::DomainEvents<#event_type, #id_type>
    };
    if let Err(err) = inject_meta(&mut st, &id_type, vec![events_field], "#[aggregate_root]") {
        return err.to_compile_error().into();
    }
    apply_entity_derives(&mut st, cfg.derive_debug.unwrap_or(true));

    let entity = entity_impls(&st, &id_type);
    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    let expanded = quote! {
        #st

        #entity

        impl #impl_generics ::civic_domain::aggregate_root::AggregateRoot for #ident #ty_generics #where_clause {
            const AGGREGATE_TYPE: &'static str = #aggregate_type;
            type Event = #event_type;

            fn domain_events(&self) -> &::civic_domain::domain_event::DomainEvents<#event_type, #id_type> {
                &self.events
            }

            fn clear_domain_events(&mut self) {
                self.events.clear();
            }

            fn take_domain_events(&mut self) -> ::std::vec::Vec<::civic_domain::domain_event::DomainEvent<#event_type, #id_type>> {
                self.events.take()
            }
        }

        #[allow(dead_code)]
        impl #impl_generics #ident #ty_generics #where_clause {
            /// 暂存一个领域事件（在业务校验与状态变更之后调用）
            fn raise_event(&mut self, event: ::civic_domain::domain_event::DomainEvent<#event_type, #id_type>) {
                self.events.raise(event);
            }

            /// 为本聚合构造并暂存事件
            fn record(&mut self, payload: #event_type) -> ::civic_domain::error::DomainResult<()> {
                let event = ::civic_domain::aggregate_root::AggregateRoot::new_event(self, payload)?;
                self.events.raise(event);
                ::core::result::Result::Ok(())
            }
        }
    };

    TokenStream::from(expanded)
}

fn name_is_blank(lit: &LitStr) -> bool {
    lit.value().trim().is_empty()
}

// -------- parsing --------

struct AggregateAttrConfig {
    id_ty: Option<Type>,
    event_ty: Option<Type>,
    aggregate_type: Option<LitStr>,
    derive_debug: Option<bool>,
}

impl Parse for AggregateAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut id_ty: Option<Type> = None;
        let mut event_ty: Option<Type> = None;
        let mut aggregate_type: Option<LitStr> = None;
        let mut derive_debug: Option<bool> = None;

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            let _eq: Token![=] = input.parse()?;
            match key.to_string().as_str() {
                "id" => set_once(&mut id_ty, input.parse::<Type>()?, &key)?,
                "event" => set_once(&mut event_ty, input.parse::<Type>()?, &key)?,
                "aggregate_type" => {
                    set_once(&mut aggregate_type, input.parse::<LitStr>()?, &key)?
                }
                "debug" => set_once(&mut derive_debug, input.parse::<LitBool>()?.value(), &key)?,
                _ => {
                    return Err(syn::Error::new(
                        key.span(),
                        "unknown key; expected 'id' | 'event' | 'aggregate_type' | 'debug'",
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
            event_ty,
            aggregate_type,
            derive_debug,
        })
    }
}

//! 领域建模过程宏
//!
//! 为 `civic-domain` 的实体、聚合根、值对象、强类型 ID 与领域事件生成样板代码。
//! 生成的代码通过 `::civic_domain` 绝对路径引用框架类型。

use proc_macro::TokenStream;

mod aggregate_root;
mod domain_event;
mod entity;
mod entity_id;
mod utils;
mod value_object;

/// 实体宏
/// - 注入 `meta: EntityMeta<Id>` 字段并置于字段最前
/// - 实现 `::civic_domain::entity::Entity`，并按标识实现 `PartialEq`/`Hash`
/// - 参数：`#[entity(id = IdType, debug = bool)]`，`id` 默认 `Uuid`
#[proc_macro_attribute]
pub fn entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity::expand(attr, item)
}

/// 聚合根宏
/// - 在实体宏基础上注入 `events: DomainEvents<Event, Id>` 缓冲区（不参与序列化）
/// - 实现 `::civic_domain::aggregate_root::AggregateRoot`
/// - 参数：`#[aggregate_root(event = E, aggregate_type = "name", id = IdType, debug = bool)]`
#[proc_macro_attribute]
pub fn aggregate_root(attr: TokenStream, item: TokenStream) -> TokenStream {
    aggregate_root::expand(attr, item)
}

/// 强类型 ID 宏，作用于单字段元组结构体
#[proc_macro_attribute]
pub fn entity_id(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity_id::expand(attr, item)
}

/// 值对象宏：补齐结构相等所需的派生
#[proc_macro_attribute]
pub fn value_object(attr: TokenStream, item: TokenStream) -> TokenStream {
    value_object::expand(attr, item)
}

/// 领域事件负载宏
/// - 实现 `::civic_domain::domain_event::EventPayload`
/// - 参数：`#[domain_event(version = N, name = "...")]`
/// - 枚举变体：`#[event(event_name = "...", event_version = N)]`
#[proc_macro_attribute]
pub fn domain_event(attr: TokenStream, item: TokenStream) -> TokenStream {
    domain_event::expand(attr, item)
}

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// 领域事件载荷需要满足的通用能力边界
///
/// 通常由 `#[domain_event]` 宏实现：枚举默认名称为 `Enum.Variant`，结构体默认为类型名。
pub trait EventPayload:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// 事件逻辑名称（多态判别标签）
    fn event_name(&self) -> &str;

    /// 事件载荷结构版本（用于消费方的版本演进）
    fn event_version(&self) -> u32 {
        1
    }
}

//! 标识（Identifier）能力
//!
//! 每个实体/聚合的标识类型都需要具备：生成新标识、识别“未持久化”的默认值，
//! 以及无损投影为通用标识 `Uuid`（供需要统一处理所有聚合的基础设施使用）。
//!
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use std::hash::Hash;
pub use uuid::Uuid;

/// 实体标识类型需要满足的能力边界
pub trait Identifier:
    Clone
    + Default
    + Eq
    + Hash
    + fmt::Debug
    + fmt::Display
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// 生成一个新的（非默认的）标识
    fn generate() -> Self;

    /// 投影为通用标识
    fn to_uuid(&self) -> Uuid;

    /// 是否为默认值（尚未持久化的瞬态标识）
    fn is_transient(&self) -> bool {
        *self == Self::default()
    }
}

impl Identifier for Uuid {
    fn generate() -> Self {
        Uuid::new_v4()
    }

    fn to_uuid(&self) -> Uuid {
        *self
    }

    fn is_transient(&self) -> bool {
        self.is_nil()
    }
}

#[cfg(feature = "ulid")]
impl Identifier for ulid::Ulid {
    fn generate() -> Self {
        ulid::Ulid::new()
    }

    // 两者均为 128 位，按位转换无损
    fn to_uuid(&self) -> Uuid {
        Uuid::from_u128(u128::from(*self))
    }

    fn is_transient(&self) -> bool {
        self.is_nil()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_nil_is_transient() {
        assert!(Uuid::nil().is_transient());
        assert!(Uuid::default().is_transient());
        assert!(!Uuid::generate().is_transient());
    }

    #[test]
    fn uuid_generate_is_unique() {
        assert_ne!(Uuid::generate(), Uuid::generate());
    }

    #[cfg(feature = "ulid")]
    #[test]
    fn ulid_projects_losslessly() {
        let id = ulid::Ulid::generate();
        let uuid = id.to_uuid();
        assert_eq!(ulid::Ulid::from(uuid.as_u128()), id);
        assert!(ulid::Ulid::default().is_transient());
        assert!(ulid::Ulid::default().to_uuid().is_nil());
    }
}

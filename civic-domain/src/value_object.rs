//! 值对象（Value Object）
//!
//! 无标识、以值相等为准的对象，用于封装不可变的概念性值与校验逻辑。
//! 相等与哈希按字段声明顺序逐一比较（即“相等性分量”），由 `#[value_object]` 派生。
//!

use std::fmt;

use civic_macros::value_object;

use crate::error::{DomainError, DomainResult};

/// 值对象抽象
pub trait ValueObject {
    /// 业务校验失败时的错误类型
    type Error;

    /// 创建值对象时进行验证
    fn validate(&self) -> Result<(), Self::Error>;
}

/// 版本号（用于乐观锁和并发控制）
///
/// 实体创建时版本为 1，此后每次标记更新（包括软删除与恢复）递增 1。
///
/// # 示例
///
/// ```
/// use civic_domain::value_object::Version;
///
/// let v1 = Version::initial();
/// assert_eq!(v1.value(), 1);
///
/// let v2 = v1.next();
/// assert_eq!(v2.value(), 2);
/// assert!(v2 > v1);
/// ```
// value_object 宏提供 Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash；
// Version 另外需要 Copy 与排序。
#[value_object]
#[derive(Copy, PartialOrd, Ord)]
pub struct Version(u64);

impl Version {
    /// 初始版本（版本号为 1）
    pub const fn initial() -> Self {
        Self(1)
    }

    /// 从值创建版本号
    ///
    /// # 示例
    ///
    /// ```
    /// use civic_domain::value_object::Version;
    ///
    /// let v = Version::from_value(5);
    /// assert_eq!(v.value(), 5);
    /// ```
    pub const fn from_value(value: u64) -> Self {
        Self(value)
    }

    /// 获取下一个版本号（到达 `u64::MAX` 后保持不变）
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// 获取版本号的值
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// 是否为初始版本（自创建后从未更新）
    pub fn is_initial(&self) -> bool {
        self.0 == 1
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::initial()
    }
}

impl ValueObject for Version {
    type Error = DomainError;

    fn validate(&self) -> DomainResult<()> {
        if self.0 == 0 {
            return Err(DomainError::invalid_argument(
                "version",
                "must start at 1",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<u64> for Version {
    fn from(value: u64) -> Self {
        Self::from_value(value)
    }
}

impl From<Version> for u64 {
    fn from(version: Version) -> Self {
        version.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_initial() {
        let v = Version::initial();
        assert_eq!(v.value(), 1);
        assert!(v.is_initial());
        assert_eq!(Version::default(), v);
    }

    #[test]
    fn test_version_next() {
        let v1 = Version::from_value(10);
        let v2 = v1.next();

        assert_eq!(v1.value(), 10);
        assert_eq!(v2.value(), 11);
        assert!(!v2.is_initial());
    }

    #[test]
    fn test_version_next_saturates() {
        let max = Version::from_value(u64::MAX);
        assert_eq!(max.next(), max);
    }

    #[test]
    fn test_version_ordering() {
        let v1 = Version::from_value(1);
        let v2 = Version::from_value(2);

        assert!(v2 > v1);
        assert!(v1 < v2);
        assert_eq!(v1, Version::from_value(1));
    }

    #[test]
    fn test_version_display() {
        assert_eq!(format!("{}", Version::initial()), "v1");
        assert_eq!(format!("{}", Version::from_value(5)), "v5");
    }

    #[test]
    fn test_version_validate() {
        assert!(Version::initial().validate().is_ok());
        assert!(Version::from_value(0).validate().is_err());
    }

    #[test]
    fn test_version_conversions() {
        let v: Version = 42.into();
        let n: u64 = v.into();
        assert_eq!(n, 42);
    }

    #[test]
    fn test_version_serde() {
        let v = Version::from_value(42);

        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "42");

        let deserialized: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, v);
    }
}

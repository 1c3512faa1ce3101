//! 实体（Entity）基础抽象
//!
//! 为聚合与实体提供统一的标识（Id）、审计信息、软删除与版本（optimistic locking）能力。
//!
//! - 标识在首次赋值后不可变；默认值表示“尚未持久化”（瞬态实体）。
//! - 每次标记更新（含软删除/恢复）版本号恰好递增 1。
//! - 相等性只看类型与标识；瞬态实体与任何实体（包括自身）都不相等，
//!   因此实体类型只实现 `PartialEq`，作为映射键请使用 [`EntityKey`]。
//!
use std::any::{TypeId, type_name};

use bon::bon;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::identifier::Identifier;
use crate::value_object::{ValueObject, Version};

/// 实体的标识与审计元数据
///
/// 字段只读，只能通过生命周期操作（`mark_updated` / `mark_deleted` / `restore` /
/// `assign_id`）修改。持久化层可通过 [`EntityMeta::rehydrate`] 还原完整状态；
/// 反序列化同样经过 `rehydrate` 校验。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    try_from = "StoredEntityMeta<I>",
    bound(deserialize = "I: Identifier")
)]
pub struct EntityMeta<I = Uuid> {
    id: I,
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<Uuid>,
    version: Version,
    is_deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
    deleted_by: Option<Uuid>,
}

impl<I: Identifier> EntityMeta<I> {
    /// 使用新生成的标识创建
    pub fn new(created_by: Option<Uuid>) -> Self {
        Self::from_parts(I::generate(), created_by)
    }

    /// 使用调用方提供的标识创建（从存储还原聚合时使用）
    ///
    /// 标识为默认值时返回 `InvalidArgument`，避免静默地“还原”出一个瞬态实体。
    pub fn with_id(id: I, created_by: Option<Uuid>) -> DomainResult<Self> {
        if id.is_transient() {
            return Err(DomainError::invalid_argument(
                "id",
                "identifier cannot be empty or default",
            ));
        }
        Ok(Self::from_parts(id, created_by))
    }

    /// 创建尚未分配标识的瞬态实体
    pub fn transient(created_by: Option<Uuid>) -> Self {
        Self::from_parts(I::default(), created_by)
    }

    fn from_parts(id: I, created_by: Option<Uuid>) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            created_by,
            updated_at: None,
            updated_by: None,
            version: Version::initial(),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }

    pub fn id(&self) -> &I {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn created_by(&self) -> Option<Uuid> {
        self.created_by
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn updated_by(&self) -> Option<Uuid> {
        self.updated_by
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    pub fn deleted_by(&self) -> Option<Uuid> {
        self.deleted_by
    }

    pub fn is_transient(&self) -> bool {
        self.id.is_transient()
    }

    /// 为瞬态实体分配标识（仅允许一次）
    pub fn assign_id(&mut self, id: I) -> DomainResult<()> {
        if id.is_transient() {
            return Err(DomainError::invalid_argument(
                "id",
                "identifier cannot be empty or default",
            ));
        }
        if !self.is_transient() {
            return Err(DomainError::invalid_state(format!(
                "identifier already assigned: {}",
                self.id
            )));
        }
        debug!(id = %id, "entity identifier assigned");
        self.id = id;
        Ok(())
    }

    /// 标记更新：刷新更新时间与操作者，版本号加 1
    pub fn mark_updated(&mut self, actor: Option<Uuid>) {
        self.touch(Utc::now(), actor);
    }

    /// 软删除；已删除时不做任何事并返回 `false`
    pub fn mark_deleted(&mut self, actor: Option<Uuid>) -> bool {
        if self.is_deleted {
            return false;
        }
        let now = Utc::now();
        self.is_deleted = true;
        self.deleted_at = Some(now);
        self.deleted_by = actor;
        self.touch(now, actor);
        debug!(id = %self.id, version = %self.version, "entity soft-deleted");
        true
    }

    /// 恢复软删除；未删除时不做任何事并返回 `false`
    pub fn restore(&mut self, actor: Option<Uuid>) -> bool {
        if !self.is_deleted {
            return false;
        }
        self.is_deleted = false;
        self.deleted_at = None;
        self.deleted_by = None;
        self.touch(Utc::now(), actor);
        debug!(id = %self.id, version = %self.version, "entity restored");
        true
    }

    /// 乐观锁检查：内存中的版本必须等于期望版本
    pub fn ensure_version(&self, expected: Version) -> DomainResult<()> {
        if self.version != expected {
            return Err(DomainError::VersionConflict {
                expected: expected.value(),
                actual: self.version.value(),
            });
        }
        Ok(())
    }

    fn touch(&mut self, at: DateTime<Utc>, actor: Option<Uuid>) {
        self.updated_at = Some(at);
        self.updated_by = actor;
        self.version = self.version.next();
        trace!(id = %self.id, version = %self.version, "entity marked updated");
    }
}

#[bon]
impl<I: Identifier> EntityMeta<I> {
    /// 由持久化层还原完整的元数据
    ///
    /// ```
    /// use civic_domain::entity::EntityMeta;
    /// use civic_domain::value_object::Version;
    /// use chrono::Utc;
    /// use uuid::Uuid;
    ///
    /// let meta: EntityMeta = EntityMeta::rehydrate()
    ///     .id(Uuid::new_v4())
    ///     .created_at(Utc::now())
    ///     .version(Version::from_value(7))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(meta.version().value(), 7);
    /// ```
    #[builder(finish_fn = build)]
    pub fn rehydrate(
        id: I,
        created_at: DateTime<Utc>,
        created_by: Option<Uuid>,
        updated_at: Option<DateTime<Utc>>,
        updated_by: Option<Uuid>,
        version: Version,
        #[builder(default)] is_deleted: bool,
        deleted_at: Option<DateTime<Utc>>,
        deleted_by: Option<Uuid>,
    ) -> DomainResult<Self> {
        if id.is_transient() {
            return Err(DomainError::invalid_argument(
                "id",
                "identifier cannot be empty or default",
            ));
        }
        version.validate()?;
        if is_deleted && deleted_at.is_none() {
            return Err(DomainError::invalid_argument(
                "deleted_at",
                "a deleted entity must carry its deletion time",
            ));
        }
        if !is_deleted && (deleted_at.is_some() || deleted_by.is_some()) {
            return Err(DomainError::invalid_argument(
                "is_deleted",
                "deletion audit fields are set on an entity that is not deleted",
            ));
        }

        Ok(Self {
            id,
            created_at,
            created_by,
            updated_at,
            updated_by,
            version,
            is_deleted,
            deleted_at,
            deleted_by,
        })
    }
}

/// 存储形式：字段与 `EntityMeta` 一一对应，仅用于反序列化
#[derive(Deserialize)]
struct StoredEntityMeta<I> {
    id: I,
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<Uuid>,
    version: Version,
    is_deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
    deleted_by: Option<Uuid>,
}

impl<I: Identifier> TryFrom<StoredEntityMeta<I>> for EntityMeta<I> {
    type Error = DomainError;

    fn try_from(stored: StoredEntityMeta<I>) -> DomainResult<Self> {
        Self::rehydrate()
            .id(stored.id)
            .created_at(stored.created_at)
            .maybe_created_by(stored.created_by)
            .maybe_updated_at(stored.updated_at)
            .maybe_updated_by(stored.updated_by)
            .version(stored.version)
            .is_deleted(stored.is_deleted)
            .maybe_deleted_at(stored.deleted_at)
            .maybe_deleted_by(stored.deleted_by)
            .build()
    }
}

impl<I: Identifier> Default for EntityMeta<I> {
    fn default() -> Self {
        Self::transient(None)
    }
}

/// 具备唯一标识、审计信息与版本的实体抽象
///
/// 通常由 `#[entity]` / `#[aggregate_root]` 宏实现，宏同时生成基于标识的
/// `PartialEq` 与 `Hash`。
pub trait Entity: Send + Sync {
    /// 实体标识类型
    type Id: Identifier;

    fn meta(&self) -> &EntityMeta<Self::Id>;

    fn meta_mut(&mut self) -> &mut EntityMeta<Self::Id>;

    /// 获取实体标识
    fn id(&self) -> &Self::Id {
        self.meta().id()
    }

    /// 标识的通用（Uuid）投影
    fn universal_id(&self) -> Uuid {
        self.id().to_uuid()
    }

    /// 获取当前版本（用于乐观锁与并发控制）
    fn version(&self) -> Version {
        self.meta().version()
    }

    fn is_transient(&self) -> bool {
        self.meta().is_transient()
    }

    fn is_deleted(&self) -> bool {
        self.meta().is_deleted()
    }

    fn mark_updated(&mut self, actor: Option<Uuid>) {
        self.meta_mut().mark_updated(actor);
    }

    fn mark_deleted(&mut self, actor: Option<Uuid>) -> bool {
        self.meta_mut().mark_deleted(actor)
    }

    fn restore(&mut self, actor: Option<Uuid>) -> bool {
        self.meta_mut().restore(actor)
    }

    fn ensure_version(&self, expected: Version) -> DomainResult<()> {
        self.meta().ensure_version(expected)
    }

    /// 同类型实体的标识相等（瞬态实体恒不相等）
    fn same_identity_as(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        !self.is_transient() && !other.is_transient() && self.id() == other.id()
    }

    /// 用于映射/集合的标识键；瞬态实体没有键
    fn entity_key(&self) -> Option<EntityKey>
    where
        Self: Sized + 'static,
    {
        if self.is_transient() {
            return None;
        }
        Some(EntityKey {
            type_id: TypeId::of::<Self>(),
            type_name: type_name::<Self>(),
            id: self.universal_id(),
        })
    }
}

/// 实体的类型 + 标识键，可作为仓储/缓存中的映射键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityKey {
    type_id: TypeId,
    type_name: &'static str,
    id: Uuid,
}

impl EntityKey {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

/// 判断两个（可能不同类型的）实体是否为同一实体
pub fn same_entity<A, B>(a: &A, b: &B) -> bool
where
    A: Entity + 'static,
    B: Entity + 'static,
{
    match (a.entity_key(), b.entity_key()) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

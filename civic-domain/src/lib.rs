//! 公民投票应用的领域层基础库（civic-domain）
//!
//! 提供以 DDD 为中心的通用抽象与构件：
//! - 标识（`identifier`）：生成、瞬态判定与通用 `Uuid` 投影
//! - 实体（`entity`）：标识、审计信息、软删除/恢复与乐观锁版本
//! - 值对象（`value_object`）与版本号
//! - 领域事件（`domain_event`）：事件元数据、暂存缓冲区与类型擦除视图
//! - 聚合根（`aggregate_root`）：唯一允许暂存领域事件的一致性边界
//!
//! 本 crate 不包含持久化、传输或事件发布实现；工作单元结束后由外部分发器
//! 读取并清空聚合暂存的事件。
//!
//! 典型用法：
//! 1. 使用 `#[entity_id]` 定义强类型标识，`#[domain_event]` 定义事件载荷；
//! 2. 使用 `#[aggregate_root]` 定义聚合，在业务方法中校验、变更状态后 `raise_event`；
//! 3. 提交事务后调用 `take_domain_events`（或 `AnyAggregateRoot::drain_events`）分发事件。
//!
pub mod aggregate_root;
pub mod domain_event;
pub mod entity;
pub mod error;
pub mod identifier;
pub mod value_object;

// 允许在本 crate 内部通过 ::civic_domain 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::civic_domain 路径。
extern crate self as civic_domain;

use bon::Builder;
use uuid::Uuid;

/// 事件创建时的业务上下文
///
/// ```
/// use civic_domain::domain_event::EventContext;
/// use uuid::Uuid;
///
/// let ctx = EventContext::builder()
///     .user_id(Uuid::new_v4())
///     .maybe_correlation_id(Some("req-42".to_string()))
///     .build();
/// assert_eq!(ctx.correlation_id(), Some("req-42"));
/// ```
#[derive(Builder, Default, Debug, Clone)]
pub struct EventContext {
    /// 触发事件的用户
    user_id: Option<Uuid>,
    /// 关联ID；缺省时为每个事件自动生成
    #[builder(into)]
    correlation_id: Option<String>,
}

impl EventContext {
    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }
}

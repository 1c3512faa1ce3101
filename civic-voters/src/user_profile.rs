//! 用户资料实体
//!
//! 属于用户聚合内部的实体：保存姓名、所在省份、联系方式与通知偏好，
//! 并回答“是否具备投票资格”之类的查询。每个成功的修改操作都会推进版本号。

use chrono::{Months, NaiveDate, Utc};
use civic_domain::entity::{Entity, EntityMeta};
use civic_domain::error::{DomainError, DomainResult, ensure_not_blank};
use civic_domain::identifier::Identifier;
use civic_macros::{entity, entity_id, value_object};
use tracing::debug;
use uuid::Uuid;

use crate::province::Province;

/// 投票年龄下限
pub const VOTING_AGE: u32 = 18;

const DEFAULT_LANGUAGE: &str = "en";
const MAX_AGE_YEARS: u32 = 120;

/// 用户资料标识
#[entity_id]
pub struct UserProfileId(Uuid);

/// 所属用户（用户聚合根）的标识
#[entity_id]
pub struct UserId(Uuid);

/// 投票提醒频率
#[value_object]
#[derive(Copy, Default)]
pub enum VotingReminderFrequency {
    Never,
    Daily,
    #[default]
    Weekly,
    Monthly,
    OnNewBillsOnly,
}

#[entity(id = UserProfileId)]
pub struct UserProfile {
    user_id: UserId,
    first_name: String,
    last_name: String,
    date_of_birth: Option<NaiveDate>,
    province: Province,
    phone_number: Option<String>,
    avatar_url: Option<String>,
    preferred_language: String,
    email_notifications_enabled: bool,
    sms_notifications_enabled: bool,
    political_interests: Vec<String>,
    voting_reminder_frequency: VotingReminderFrequency,
    public_voting_history: bool,
    time_zone: String,
}

impl UserProfile {
    /// 创建用户资料
    ///
    /// 邮件通知默认开启、短信通知默认关闭、投票记录默认不公开，
    /// 时区取所在省份的默认时区，语言缺省为 `en`。
    pub fn create(
        user_id: UserId,
        first_name: &str,
        last_name: &str,
        province: Province,
        preferred_language: Option<&str>,
    ) -> DomainResult<Self> {
        if user_id.is_transient() {
            return Err(DomainError::invalid_argument(
                "user_id",
                "user identifier cannot be empty",
            ));
        }
        ensure_not_blank("first_name", first_name)?;
        ensure_not_blank("last_name", last_name)?;
        let preferred_language = preferred_language.unwrap_or(DEFAULT_LANGUAGE);
        ensure_not_blank("preferred_language", preferred_language)?;

        let profile = Self {
            meta: EntityMeta::new(None),
            time_zone: province.default_time_zone().to_string(),
            user_id,
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            date_of_birth: None,
            province,
            phone_number: None,
            avatar_url: None,
            preferred_language: preferred_language.trim().to_string(),
            email_notifications_enabled: true,
            sms_notifications_enabled: false,
            political_interests: Vec::new(),
            voting_reminder_frequency: VotingReminderFrequency::default(),
            public_voting_history: false,
        };
        debug!(profile_id = %profile.id(), user_id = %profile.user_id, "user profile created");
        Ok(profile)
    }

    pub fn update_basic_info(
        &mut self,
        first_name: &str,
        last_name: &str,
        province: Province,
    ) -> DomainResult<()> {
        ensure_not_blank("first_name", first_name)?;
        ensure_not_blank("last_name", last_name)?;

        self.first_name = first_name.trim().to_string();
        self.last_name = last_name.trim().to_string();
        self.province = province;
        self.touch();
        Ok(())
    }

    /// 更新联系方式；空白电话号码视为清除
    pub fn update_contact_info(
        &mut self,
        phone_number: Option<&str>,
        preferred_language: &str,
        time_zone: &str,
    ) -> DomainResult<()> {
        ensure_not_blank("preferred_language", preferred_language)?;
        ensure_not_blank("time_zone", time_zone)?;

        self.phone_number = non_blank(phone_number);
        self.preferred_language = preferred_language.trim().to_string();
        self.time_zone = time_zone.trim().to_string();
        self.touch();
        Ok(())
    }

    pub fn update_notification_preferences(
        &mut self,
        email_notifications: bool,
        sms_notifications: bool,
        frequency: VotingReminderFrequency,
    ) {
        self.email_notifications_enabled = email_notifications;
        self.sms_notifications_enabled = sms_notifications;
        self.voting_reminder_frequency = frequency;
        self.touch();
    }

    /// 更新出生日期与头像；出生日期不能晚于今天，也不能早于 120 年前
    pub fn update_profile_details(
        &mut self,
        date_of_birth: Option<NaiveDate>,
        avatar_url: Option<&str>,
    ) -> DomainResult<()> {
        self.update_profile_details_on(date_of_birth, avatar_url, today())
    }

    fn update_profile_details_on(
        &mut self,
        date_of_birth: Option<NaiveDate>,
        avatar_url: Option<&str>,
        today: NaiveDate,
    ) -> DomainResult<()> {
        if let Some(dob) = date_of_birth {
            if dob > today {
                return Err(DomainError::invalid_argument(
                    "date_of_birth",
                    "date of birth cannot be in the future",
                ));
            }
            let earliest = today
                .checked_sub_months(Months::new(MAX_AGE_YEARS * 12))
                .unwrap_or(NaiveDate::MIN);
            if dob < earliest {
                return Err(DomainError::invalid_argument(
                    "date_of_birth",
                    "date of birth is too far in the past",
                ));
            }
        }

        self.date_of_birth = date_of_birth;
        self.avatar_url = non_blank(avatar_url);
        self.touch();
        Ok(())
    }

    /// 替换关注议题：丢弃空白项，其余去除首尾空白
    pub fn update_political_interests<I, S>(&mut self, interests: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.political_interests = interests
            .into_iter()
            .filter_map(|interest| non_blank(Some(interest.as_ref())))
            .collect();
        self.touch();
    }

    pub fn set_voting_history_visibility(&mut self, is_public: bool) {
        self.public_voting_history = is_public;
        self.touch();
    }

    // 资料修改不记录操作者，只推进更新时间与版本
    fn touch(&mut self) {
        self.mark_updated(None);
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        self.date_of_birth
    }

    /// 当前年龄（周岁）；未填写出生日期时为 `None`
    pub fn age(&self) -> Option<u32> {
        self.age_on(today())
    }

    /// 指定日期时的年龄（周岁）
    pub fn age_on(&self, date: NaiveDate) -> Option<u32> {
        self.date_of_birth.and_then(|dob| date.years_since(dob))
    }

    pub fn province(&self) -> &Province {
        &self.province
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    pub fn preferred_language(&self) -> &str {
        &self.preferred_language
    }

    pub fn email_notifications_enabled(&self) -> bool {
        self.email_notifications_enabled
    }

    pub fn sms_notifications_enabled(&self) -> bool {
        self.sms_notifications_enabled
    }

    pub fn political_interests(&self) -> &[String] {
        &self.political_interests
    }

    pub fn voting_reminder_frequency(&self) -> VotingReminderFrequency {
        self.voting_reminder_frequency
    }

    pub fn public_voting_history(&self) -> bool {
        self.public_voting_history
    }

    pub fn time_zone(&self) -> &str {
        &self.time_zone
    }

    /// 年满 18 周岁才具备投票资格；年龄未知视为不具备
    pub fn is_eligible_to_vote(&self) -> bool {
        self.age().is_some_and(|age| age >= VOTING_AGE)
    }

    /// 资料是否足以参与投票：姓名齐全，且年龄未知或已成年
    ///
    /// 年龄未知时放行，由投票环节再行核验。
    pub fn is_complete_for_voting(&self) -> bool {
        !self.first_name.trim().is_empty()
            && !self.last_name.trim().is_empty()
            && self.age().is_none_or(|age| age >= VOTING_AGE)
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

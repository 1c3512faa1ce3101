//! 公民投票应用的选民领域模型
//!
//! - [`province`]：加拿大省份/地区值对象
//! - [`user_profile`]：用户资料实体、投票提醒频率与相关标识
//!
pub mod province;
pub mod user_profile;

pub use province::{Province, ProvinceKind};
pub use user_profile::{UserId, UserProfile, UserProfileId, VotingReminderFrequency};

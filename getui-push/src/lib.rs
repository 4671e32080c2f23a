//! # getui-push
//!
//! Async client for the GeTui (个推) push notification REST API.
//!
//! ## Features
//!
//! - **Auth**: signed `auth_sign` token acquisition with automatic refresh
//! - **Delivery**: single, batch, list and app-wide pushes, scheduled tasks
//! - **Targeting**: aliases, tags, blacklist and device status
//! - **Analytics**: task statistics, daily app figures, iOS badges
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use getui_push::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GetuiConfig::from_env()?;
//!     let client = GetuiClient::new(config).await?;
//!
//!     let template = NotificationTemplate::new(SystemStyle::new("Hello!", "This is a push notification"));
//!     let mut push = PushRequest::new(template)
//!         .message(Message::new().offline(3_600_000))
//!         .cid("client-id");
//!
//!     let result = client.push_single(&mut push).await?.ok_or_rejected()?;
//!     println!("task {} ({})", result.taskid, result.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Provider result codes
//!
//! Transport and decode failures are returned as [`PushError`]. Answers the
//! provider decoded but refused carry their [`ResultCode`] in the response;
//! use [`ApiResponse::ok_or_rejected`] to turn those into errors.

mod analytics;
mod auth;
mod client;
mod config;
mod error;
mod message;
mod push;
mod response;
mod result_code;
mod style;
mod targeting;
mod template;

pub use analytics::BadgeRequest;
pub use auth::{AuthToken, sign};
pub use client::GetuiClient;
pub use config::{Credentials, DEFAULT_BASE_URL, GetuiConfig};
pub use error::{PushError, Result};
pub use message::{ApnsPayload, Aps, Condition, ConditionOp, Message, Multimedia, NetworkType};
pub use push::{PushList, PushRequest, Target};
pub use response::{
    ApiResponse, ApnStats, AppPushStat, AppPushStatResult, AppUserStat, AppUserStatResult,
    BatchPushResult, BiTagsResult, ChannelStats, GroupPushResult, PushListResult, PushResult,
    PushResultDetail, PushStatsResult, QueryAliasResult, QueryCidResult, ScheduleTaskDetail,
    ScheduleTaskResult, SimpleResult, StopTaskResult, TagsResult, TaskResult, UserCountResult,
    UserStatusResult,
};
pub use result_code::ResultCode;
pub use style::{ChannelLevel, ExtendedStyle, GeTuiStyle, ImageStyle, Style, SystemStyle};
pub use targeting::{AliasBinding, MAX_ALIAS_BINDINGS};
pub use template::{
    DisplayWindow, LinkTemplate, MAX_INTENT_LEN, NotificationTemplate, NotifyPopLoadTemplate,
    StartActivityTemplate, Template, TemplateKind, TransmissionTemplate,
};

/// Prelude for common imports.
///
/// ```
/// use getui_push::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::GetuiClient;
    pub use crate::config::{Credentials, GetuiConfig};
    pub use crate::error::{PushError, Result};
    pub use crate::message::{ApnsPayload, Condition, ConditionOp, Message, NetworkType};
    pub use crate::push::{PushList, PushRequest};
    pub use crate::response::ApiResponse;
    pub use crate::result_code::ResultCode;
    pub use crate::style::{Style, SystemStyle};
    pub use crate::targeting::AliasBinding;
    pub use crate::template::{
        LinkTemplate, NotificationTemplate, NotifyPopLoadTemplate, StartActivityTemplate,
        Template, TransmissionTemplate,
    };
}

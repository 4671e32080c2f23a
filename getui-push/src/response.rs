//! Provider response records.
//!
//! Field presence depends on the endpoint and on the outcome, so every
//! field falls back to its default when missing. The provider reports
//! application failures through `result`; inspect it, or call
//! [`ApiResponse::ok_or_rejected`].

use serde::Deserialize;
use std::collections::HashMap;

use crate::{PushError, Result, ResultCode};

/// Common behaviour of provider responses.
pub trait ApiResponse: Sized {
    /// Result code of the response.
    fn result(&self) -> &ResultCode;

    /// Error description, when the endpoint returns one.
    fn desc(&self) -> Option<&str> {
        None
    }

    /// Turn a non-`ok` result into [`PushError::Rejected`].
    fn ok_or_rejected(self) -> Result<Self> {
        if self.result().is_ok() {
            Ok(self)
        } else {
            Err(PushError::Rejected {
                code: self.result().clone(),
                desc: self.desc().filter(|d| !d.is_empty()).map(str::to_string),
            })
        }
    }
}

macro_rules! api_response {
    (with_desc: $($ty:ty),+ $(,)?) => {
        $(impl ApiResponse for $ty {
            fn result(&self) -> &ResultCode {
                &self.result
            }

            fn desc(&self) -> Option<&str> {
                Some(&self.desc)
            }
        })+
    };
    ($($ty:ty),+ $(,)?) => {
        $(impl ApiResponse for $ty {
            fn result(&self) -> &ResultCode {
                &self.result
            }
        })+
    };
}

/// Accepts strings, numbers and null for fields the provider is loose about.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Float(f64),
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Str(s)) => s,
            Some(Raw::Int(n)) => n.to_string(),
            Some(Raw::Float(n)) => n.to_string(),
            None => String::new(),
        })
    }
}

/// Result of `push_single`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PushResult {
    /// Result code.
    pub result: ResultCode,
    /// Task id.
    pub taskid: String,
    /// Error description.
    pub desc: String,
    /// Delivery status: `successed_online`, `successed_offline` or
    /// `successed_ignore`.
    pub status: ResultCode,
}

/// Result of `push_single_batch`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BatchPushResult {
    /// Result code.
    pub result: ResultCode,
    /// Task id.
    pub taskid: String,
    /// Error description.
    pub desc: String,
}

/// Result of endpoints that create a task (`save_list_body`, `push_app`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TaskResult {
    /// Result code.
    pub result: ResultCode,
    /// Task id.
    pub taskid: String,
    /// Error description.
    pub desc: String,
}

/// Result of `push_list`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PushListResult {
    /// Result code.
    pub result: ResultCode,
    /// Task id.
    pub taskid: String,
    /// Error description.
    pub desc: String,
    /// Per-cid status, when details were requested.
    pub cid_details: HashMap<String, ResultCode>,
    /// Per-alias status, when details were requested.
    pub alias_details: HashMap<String, ResultCode>,
}

/// Result of `stop_task`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StopTaskResult {
    /// Result code.
    pub result: ResultCode,
    /// Stopped task id.
    pub taskid: String,
}

/// Result of `get_schedule_task`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScheduleTaskResult {
    /// Result code.
    pub result: ResultCode,
    /// Task id.
    pub taskid: String,
    /// Task details.
    #[serde(rename = "taskDetail")]
    pub task_detail: Option<ScheduleTaskDetail>,
}

/// Details of a scheduled task.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleTaskDetail {
    /// Transmission content.
    pub push_content: String,
    /// Scheduled send time.
    #[serde(deserialize_with = "lenient::string")]
    pub push_time: String,
    /// Creation time.
    #[serde(rename = "creatTime", alias = "createTime", deserialize_with = "lenient::string")]
    pub create_time: String,
    /// Task state.
    pub send_result: String,
}

/// Result carrying only a code and description.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimpleResult {
    /// Result code.
    pub result: ResultCode,
    /// Error description.
    pub desc: String,
}

/// Result of `query_cid`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryCidResult {
    /// Result code.
    pub result: ResultCode,
    /// Client ids bound to the alias.
    pub cid: Vec<String>,
}

/// Result of `query_alias`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryAliasResult {
    /// Result code.
    pub result: ResultCode,
    /// Alias bound to the cid.
    pub alias: String,
}

/// Result of `get_tags`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TagsResult {
    /// Result code.
    pub result: ResultCode,
    /// Tags, as sent by the provider.
    pub tags: String,
}

/// Result of `user_status`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UserStatusResult {
    /// Result code.
    pub result: ResultCode,
    /// Client id.
    pub cid: String,
    /// `online` or `offline`.
    pub status: String,
    /// Last login time.
    #[serde(deserialize_with = "lenient::string")]
    pub lastlogin: String,
}

impl UserStatusResult {
    /// `true` when the device is online.
    pub fn is_online(&self) -> bool {
        self.status.eq_ignore_ascii_case("online")
    }
}

/// Result of `push_result`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PushStatsResult {
    /// Result code.
    pub result: ResultCode,
    /// One entry per task.
    pub data: Vec<PushResultDetail>,
}

/// Delivery statistics of a task.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PushResultDetail {
    /// Task id.
    pub taskid: String,
    /// Deliverable messages.
    pub msg_total: u64,
    /// Receipts.
    pub msg_process: u64,
    /// Clicks.
    pub click_num: u64,
    /// Messages sent over the GeTui channel.
    pub push_num: u64,
    /// iOS (APNs) statistics.
    #[serde(rename = "APN", alias = "apn")]
    pub apn: ApnStats,
    /// GeTui channel statistics.
    #[serde(rename = "GT", alias = "gt")]
    pub gt: ChannelStats,
}

/// APNs delivery statistics.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApnStats {
    /// Shown.
    pub displayed: u64,
    /// Result code of the APNs leg.
    pub result: String,
    /// Receipts.
    pub feedback: u64,
    /// Clicks.
    pub clicked: u64,
    /// Sent.
    pub sent: u64,
}

/// GeTui channel delivery statistics.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChannelStats {
    /// Sent.
    pub sent: u64,
    /// Receipts.
    pub feedback: u64,
    /// Clicks.
    pub clicked: u64,
    /// Shown.
    pub displayed: u64,
}

/// Result of `get_push_result_by_group_name`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GroupPushResult {
    /// Result code.
    pub result: ResultCode,
    /// Users active in the last hundred days.
    pub msg_total: u64,
    /// Messages actually sent.
    pub online_num: u64,
    /// Messages received.
    pub msg_process: u64,
    /// Messages shown.
    pub show_num: u64,
    /// Messages clicked.
    pub click_num: u64,
    /// Error description.
    pub desc: String,
}

/// Result of `query_app_push`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppPushStatResult {
    /// Result code.
    pub result: ResultCode,
    /// Push figures for the day.
    pub data: AppPushStat,
}

/// Daily push figures of an app.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppPushStat {
    /// App id.
    #[serde(alias = "appId")]
    pub app_id: String,
    /// Day, `yyyyMMdd` or `yyyy-MM-dd`.
    pub date: String,
    /// Messages sent.
    #[serde(alias = "sendCount")]
    pub send_count: u64,
    /// Messages sent to online devices.
    #[serde(alias = "sendOnlineCount")]
    pub send_online_count: u64,
    /// Messages received.
    #[serde(alias = "receiveCount")]
    pub receive_count: u64,
    /// Messages shown.
    #[serde(alias = "showCount")]
    pub show_count: u64,
    /// Messages clicked.
    #[serde(alias = "clickCount")]
    pub click_count: u64,
}

/// Result of `query_app_user`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppUserStatResult {
    /// Result code.
    pub result: ResultCode,
    /// User figures for the day.
    pub data: AppUserStat,
}

/// Daily user figures of an app.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppUserStat {
    /// App id.
    #[serde(alias = "appId")]
    pub app_id: String,
    /// Day.
    pub date: String,
    /// Newly registered users.
    #[serde(rename = "new_regist_count", alias = "newRegistCount")]
    pub new_register_count: u64,
    /// Registered users in total.
    #[serde(rename = "regist_total_count", alias = "registTotalCount")]
    pub register_total_count: u64,
    /// Active users.
    #[serde(alias = "activeCount")]
    pub active_count: u64,
    /// Online users.
    #[serde(alias = "onlineCount")]
    pub online_count: u64,
}

/// Result of `query_user_count`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UserCountResult {
    /// Result code.
    pub result: ResultCode,
    /// Users matching the conditions.
    pub user_count: u64,
    /// Error description.
    pub desc: String,
}

/// Result of `query_bi_tags`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BiTagsResult {
    /// Result code.
    pub result: ResultCode,
    /// Behavioural tags available to the app.
    pub tags: Vec<String>,
}

api_response!(
    StopTaskResult,
    ScheduleTaskResult,
    QueryCidResult,
    QueryAliasResult,
    TagsResult,
    UserStatusResult,
    PushStatsResult,
    AppPushStatResult,
    AppUserStatResult,
    BiTagsResult,
);

api_response!(
    with_desc: PushResult,
    BatchPushResult,
    TaskResult,
    PushListResult,
    SimpleResult,
    GroupPushResult,
    UserCountResult,
);

//! Statistics and iOS badge operations.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::message::datetime_format;
use crate::{
    AppPushStatResult, AppUserStatResult, BiTagsResult, Condition, GetuiClient, GroupPushResult,
    PushError, PushStatsResult, Result, SimpleResult, UserCountResult,
};

/// iOS badge update for a set of devices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BadgeRequest {
    /// Message the badge belongs to.
    #[serde(rename = "msgid", skip_serializing_if = "Option::is_none")]
    pub msg_id: Option<String>,
    /// Absolute (`"5"`) or relative (`"+1"`, `"-1"`) badge value.
    pub badge: String,
    /// Client ids.
    pub cid_list: Vec<String>,
    /// APNs device tokens.
    #[serde(rename = "devicetoken_list")]
    pub device_token_list: Vec<String>,
}

impl BadgeRequest {
    /// Create a badge update.
    pub fn new(badge: impl Into<String>) -> Self {
        Self {
            badge: badge.into(),
            ..Default::default()
        }
    }

    /// Target client ids.
    pub fn cids<I, V>(mut self, cids: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.cid_list.extend(cids.into_iter().map(Into::into));
        self
    }

    /// Target APNs device tokens.
    pub fn device_tokens<I, V>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.device_token_list.extend(tokens.into_iter().map(Into::into));
        self
    }

    /// Associate the update with a message.
    pub fn msg_id(mut self, id: impl Into<String>) -> Self {
        self.msg_id = Some(id.into());
        self
    }
}

impl GetuiClient {
    /// Delivery statistics for one or more tasks.
    pub async fn push_result<I, T>(&self, task_ids: I) -> Result<PushStatsResult>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let task_ids: Vec<String> = task_ids.into_iter().map(Into::into).collect();
        if task_ids.is_empty() {
            return Err(PushError::InvalidRequest(
                "push_result needs at least one task id".to_string(),
            ));
        }
        self.post(&["push_result"], &json!({ "taskIdList": task_ids }))
            .await
    }

    /// Delivery statistics for a task group.
    pub async fn push_result_by_group_name(&self, group_name: &str) -> Result<GroupPushResult> {
        self.post_empty(&["get_push_result_by_group_name", group_name])
            .await
    }

    /// Push figures of the app for one day.
    pub async fn query_app_push(&self, date: NaiveDate) -> Result<AppPushStatResult> {
        let day = date.format(datetime_format::DATE).to_string();
        self.post_empty(&["query_app_push", day.as_str()]).await
    }

    /// User figures of the app for one day.
    pub async fn query_app_user(&self, date: NaiveDate) -> Result<AppUserStatResult> {
        let day = date.format(datetime_format::DATE).to_string();
        self.post_empty(&["query_app_user", day.as_str()]).await
    }

    /// Number of users matching every condition.
    pub async fn query_user_count(&self, conditions: &[Condition]) -> Result<UserCountResult> {
        self.post(&["query_user_count"], &json!({ "condition": conditions }))
            .await
    }

    /// Behavioural tags available to the app.
    pub async fn query_bi_tags(&self) -> Result<BiTagsResult> {
        self.post_empty(&["query_bi_tags"]).await
    }

    /// Set the iOS badge of some devices.
    pub async fn set_badge(&self, request: &BadgeRequest) -> Result<SimpleResult> {
        if request.cid_list.is_empty() && request.device_token_list.is_empty() {
            return Err(PushError::InvalidRequest(
                "set_badge needs a cid or a device token".to_string(),
            ));
        }
        debug!(
            cids = request.cid_list.len(),
            tokens = request.device_token_list.len(),
            "Setting iOS badge"
        );
        self.post(&["set_badge"], request).await
    }
}

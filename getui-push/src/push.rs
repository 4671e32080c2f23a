//! Push requests and request body construction.

use chrono::{NaiveDateTime, Utc};
use serde::Serialize;

use crate::message::datetime_format;
use crate::{ApnsPayload, Condition, Message, NetworkType, Result, Template, TemplateKind};

/// Recipient of a single push.
///
/// The provider prefers the cid when both are sent; the request body only
/// ever carries one of them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Target {
    /// No explicit recipient (list bodies, condition pushes).
    #[default]
    None,
    /// Client id assigned by the provider.
    Cid(String),
    /// Alias assigned by the application.
    Alias(String),
}

/// A push: message options, one template and optional targeting.
#[derive(Debug, Clone, PartialEq)]
pub struct PushRequest {
    /// Delivery options.
    pub message: Message,
    /// Template carried by the push.
    pub template: Template,
    /// APNs payload for offline iOS devices.
    pub push_info: Option<ApnsPayload>,
    cid: String,
    alias: String,
    request_id: String,
    conditions: Vec<Condition>,
    speed: u32,
    push_time: Option<NaiveDateTime>,
    duration_begin: Option<NaiveDateTime>,
    duration_end: Option<NaiveDateTime>,
    task_name: Option<String>,
}

impl PushRequest {
    /// Create a push carrying `template`.
    pub fn new(template: impl Into<Template>) -> Self {
        Self {
            message: Message::default(),
            template: template.into(),
            push_info: None,
            cid: String::new(),
            alias: String::new(),
            request_id: String::new(),
            conditions: Vec::new(),
            speed: 0,
            push_time: None,
            duration_begin: None,
            duration_end: None,
            task_name: None,
        }
    }

    /// Set delivery options.
    pub fn message(mut self, message: Message) -> Self {
        self.message = message;
        self
    }

    /// Send to a client id.
    pub fn cid(mut self, cid: impl Into<String>) -> Self {
        self.cid = cid.into();
        self
    }

    /// Send to an alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// Attach an APNs payload.
    pub fn apns(mut self, payload: ApnsPayload) -> Self {
        self.push_info = Some(payload);
        self
    }

    /// Use a caller-chosen request id.
    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = id.into();
        self
    }

    /// Add a segment condition.
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Limit delivery speed (messages per second).
    pub fn speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    /// Schedule delivery.
    pub fn push_time(mut self, at: NaiveDateTime) -> Self {
        self.push_time = Some(at);
        self
    }

    /// Only show the notification between `begin` and `end`.
    pub fn duration(mut self, begin: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.duration_begin = Some(begin);
        self.duration_end = Some(end);
        self
    }

    /// Name the task so results can be queried by group.
    pub fn task_name(mut self, name: impl Into<String>) -> Self {
        self.task_name = Some(name.into());
        self
    }

    /// Recipient the body will carry.
    pub fn target(&self) -> Target {
        if !self.cid.is_empty() {
            Target::Cid(self.cid.clone())
        } else if !self.alias.is_empty() {
            Target::Alias(self.alias.clone())
        } else {
            Target::None
        }
    }

    /// Request id, empty until one is supplied or generated.
    pub fn requestid(&self) -> &str {
        &self.request_id
    }

    /// Template discriminant.
    pub fn kind(&self) -> TemplateKind {
        self.template.kind()
    }

    /// Build the JSON body for this push.
    ///
    /// Generates a request id from the current time when none was set and
    /// stores it on `self`, so callers can correlate the request afterwards.
    pub fn build_body(&mut self, app_key: &str) -> Result<serde_json::Value> {
        if self.request_id.is_empty() {
            self.request_id = generate_request_id();
        }

        let (cid, alias) = if !self.cid.is_empty() {
            (Some(self.cid.as_str()), None)
        } else if !self.alias.is_empty() {
            (None, Some(self.alias.as_str()))
        } else {
            (None, None)
        };

        let body = PushBody {
            message: MessageBody {
                appkey: app_key,
                is_offline: self.message.is_offline,
                offline_expire_time: self.message.offline_expire_time,
                push_network_type: self.message.push_network_type,
                msgtype: self.template.kind(),
            },
            template: &self.template,
            push_info: self.push_info.as_ref(),
            cid,
            alias,
            requestid: &self.request_id,
            condition: &self.conditions,
            speed: self.speed,
            duration_begin: self.duration_begin,
            duration_end: self.duration_end,
            push_time: self.push_time,
            task_name: self.task_name.as_deref(),
        };

        Ok(serde_json::to_value(body)?)
    }
}

fn generate_request_id() -> String {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1000))
        .to_string()
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

fn no_conditions(conditions: &&[Condition]) -> bool {
    conditions.is_empty()
}

#[derive(Serialize)]
struct MessageBody<'a> {
    appkey: &'a str,
    is_offline: bool,
    offline_expire_time: u64,
    push_network_type: NetworkType,
    msgtype: TemplateKind,
}

#[derive(Serialize)]
struct PushBody<'a> {
    message: MessageBody<'a>,
    #[serde(flatten)]
    template: &'a Template,
    #[serde(skip_serializing_if = "Option::is_none")]
    push_info: Option<&'a ApnsPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cid: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alias: Option<&'a str>,
    requestid: &'a str,
    #[serde(skip_serializing_if = "no_conditions")]
    condition: &'a [Condition],
    #[serde(skip_serializing_if = "is_zero")]
    speed: u32,
    #[serde(with = "datetime_format::option", skip_serializing_if = "Option::is_none")]
    duration_begin: Option<NaiveDateTime>,
    #[serde(with = "datetime_format::option", skip_serializing_if = "Option::is_none")]
    duration_end: Option<NaiveDateTime>,
    #[serde(with = "datetime_format::option", skip_serializing_if = "Option::is_none")]
    push_time: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    task_name: Option<&'a str>,
}

/// Second phase of a group push: send a saved body to a list of users.
///
/// When both lists are given the provider uses the cid list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PushList {
    /// Client ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cid: Vec<String>,
    /// Task id returned by `save_list_body`.
    pub taskid: String,
    /// Aliases.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<String>,
    /// Return a per-recipient status.
    pub need_detail: bool,
}

impl PushList {
    /// Send task `task_id` to client ids.
    pub fn to_cids<I, V>(task_id: impl Into<String>, cids: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            cid: cids.into_iter().map(Into::into).collect(),
            taskid: task_id.into(),
            ..Default::default()
        }
    }

    /// Send task `task_id` to aliases.
    pub fn to_aliases<I, V>(task_id: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            alias: aliases.into_iter().map(Into::into).collect(),
            taskid: task_id.into(),
            ..Default::default()
        }
    }

    /// Ask for per-recipient details.
    pub fn with_detail(mut self) -> Self {
        self.need_detail = true;
        self
    }
}

//! Message envelope, APNs payload and targeting conditions.

use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Network restriction for delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkType {
    /// Any network.
    #[default]
    Any,
    /// Wi-Fi only.
    Wifi,
}

impl Serialize for NetworkType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            Self::Any => 0,
            Self::Wifi => 1,
        })
    }
}

/// Delivery options shared by every template.
///
/// The app key and `msgtype` are filled in when the request body is built;
/// `msgtype` always follows the template carried by the push.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Keep the message for devices that are offline.
    pub is_offline: bool,
    /// How long an offline message is kept, in milliseconds.
    pub offline_expire_time: u64,
    /// Network restriction.
    pub push_network_type: NetworkType,
}

impl Message {
    /// Create a message with provider defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the message for offline devices for `expire_ms` milliseconds.
    pub fn offline(mut self, expire_ms: u64) -> Self {
        self.is_offline = true;
        self.offline_expire_time = expire_ms;
        self
    }

    /// Restrict delivery to Wi-Fi.
    pub fn wifi_only(mut self) -> Self {
        self.push_network_type = NetworkType::Wifi;
        self
    }
}

/// How a condition combines its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConditionOp {
    /// Any of the values (`or`).
    #[default]
    Union,
    /// All of the values (`and`).
    Intersection,
    /// None of the values (`not in`).
    Exclude,
}

impl Serialize for ConditionOp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            Self::Union => 0,
            Self::Intersection => 1,
            Self::Exclude => 2,
        })
    }
}

/// Segment filter for condition-based pushes and user counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condition {
    /// Filter name, e.g. `region`, `phonetype`, `tag`.
    pub key: String,
    /// Filter values.
    pub values: Vec<String>,
    /// Combinator.
    pub opt_type: ConditionOp,
}

impl Condition {
    /// Create a condition.
    pub fn new<I, V>(key: impl Into<String>, values: I, op: ConditionOp) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
            opt_type: op,
        }
    }

    /// Match users in any of the given regions.
    pub fn region<I, V>(codes: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::new("region", codes, ConditionOp::Union)
    }

    /// Match users on any of the given phone types (`ANDROID`, `IOS`).
    pub fn phone_type<I, V>(types: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::new("phonetype", types, ConditionOp::Union)
    }

    /// Match users carrying the given tags.
    pub fn tag<I, V>(tags: I, op: ConditionOp) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::new("tag", tags, op)
    }
}

/// APNs payload, used when the target is an offline iOS device.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApnsPayload {
    /// `aps` dictionary.
    pub aps: Aps,
    /// Custom payload string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// Rich media attachments.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub multimedia: Vec<Multimedia>,
}

impl ApnsPayload {
    /// Payload with an alert title and body.
    pub fn alert(title: impl Into<String>, body: impl Into<String>) -> Self {
        let mut alert = HashMap::new();
        alert.insert("title".to_string(), serde_json::Value::String(title.into()));
        alert.insert("body".to_string(), serde_json::Value::String(body.into()));
        Self {
            aps: Aps {
                alert,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Set the badge, e.g. `"+1"` or `"5"`.
    pub fn auto_badge(mut self, badge: impl Into<String>) -> Self {
        self.aps.auto_badge = Some(badge.into());
        self
    }

    /// Set the sound.
    pub fn sound(mut self, sound: impl Into<String>) -> Self {
        self.aps.sound = Some(sound.into());
        self
    }

    /// Mark as a background update.
    pub fn content_available(mut self) -> Self {
        self.aps.content_available = Some(1);
        self
    }

    /// Set the custom payload.
    pub fn payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Attach rich media.
    pub fn multimedia(mut self, media: Multimedia) -> Self {
        self.multimedia.push(media);
        self
    }
}

/// `aps` dictionary of an APNs payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aps {
    /// Alert dictionary (`title`, `body`, `title-loc-key`, ...).
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub alert: HashMap<String, serde_json::Value>,
    /// Badge value.
    #[serde(rename = "autoBadge", skip_serializing_if = "Option::is_none")]
    pub auto_badge: Option<String>,
    /// Sound file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    /// 1 for background updates.
    #[serde(rename = "content-available", skip_serializing_if = "Option::is_none")]
    pub content_available: Option<u8>,
    /// Notification category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Rich media attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Multimedia {
    /// Resource URL.
    pub url: String,
    /// 1 image, 2 audio, 3 video.
    #[serde(rename = "type")]
    pub kind: u8,
    /// Only show on Wi-Fi.
    pub only_wifi: bool,
}

/// Provider timestamp formats.
pub(crate) mod datetime_format {
    /// `yyyy-MM-dd HH:mm:ss`.
    pub const DATETIME: &str = "%Y-%m-%d %H:%M:%S";
    /// `yyyyMMdd`, used in statistics paths.
    pub const DATE: &str = "%Y%m%d";

    pub mod option {
        use chrono::NaiveDateTime;
        use serde::Serializer;

        pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(at) => serializer.collect_str(&at.format(super::DATETIME)),
                None => serializer.serialize_none(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_serialization() {
        let cond = Condition::tag(["vip", "beta"], ConditionOp::Exclude);
        let value = serde_json::to_value(&cond).unwrap();
        assert_eq!(value["key"], "tag");
        assert_eq!(value["values"], serde_json::json!(["vip", "beta"]));
        assert_eq!(value["opt_type"], 2);
    }

    #[test]
    fn test_apns_payload_omits_unset_fields() {
        let value = serde_json::to_value(ApnsPayload::alert("Hi", "there").auto_badge("+1")).unwrap();
        assert_eq!(value["aps"]["alert"]["title"], "Hi");
        assert_eq!(value["aps"]["autoBadge"], "+1");
        assert!(value["aps"].get("sound").is_none());
        assert!(value.get("multimedia").is_none());
    }
}

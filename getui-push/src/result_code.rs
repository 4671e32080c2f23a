//! Provider result codes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Result sentinel returned in the `result` (and `status`) field of every
/// provider response.
///
/// Codes the provider documents map to named variants; anything else is
/// kept verbatim in [`ResultCode::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ResultCode {
    /// Success.
    Ok,
    /// No message body.
    NoMsg,
    /// Alias not found.
    AliasError,
    /// Caller IP is blacklisted.
    BlackIp,
    /// Signature check failed.
    SignError,
    /// Push quota exceeded.
    PushNumOverLimit,
    /// Unknown app id.
    NoAppId,
    /// No matching user.
    NoUser,
    /// Requests too frequent.
    TooFrequent,
    /// Message contains a sensitive word.
    SensitiveWord,
    /// App id does not match the cid or app key.
    AppIdNotMatch,
    /// Caller is not authenticated.
    NotAuth,
    /// App is blacklisted.
    BlackAppId,
    /// Parameter validation failed.
    InvalidParam,
    /// Alias has no bound cid.
    AliasNotBind,
    /// Too many tags.
    TagOverLimit,
    /// Delivered to an online device.
    SuccessOnline,
    /// Stored for offline delivery.
    SuccessOffline,
    /// Tag invalid or not permitted.
    TagInvalidOrNoAuth,
    /// Nothing valid to deliver.
    NoValidPush,
    /// Inactive user skipped.
    SuccessIgnore,
    /// Task id not found.
    NoTaskId,
    /// Unspecified provider error.
    OtherError,
    /// Undocumented code, kept as sent.
    Other(String),
    /// Field missing from the response.
    #[default]
    Missing,
}

impl ResultCode {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "ok",
            Self::NoMsg => "no_msg",
            Self::AliasError => "alias_error",
            Self::BlackIp => "black_ip",
            Self::SignError => "sign_error",
            Self::PushNumOverLimit => "pushnum_overlimit",
            Self::NoAppId => "no_appid",
            Self::NoUser => "no_user",
            Self::TooFrequent => "too_frequent",
            Self::SensitiveWord => "sensitive_word",
            Self::AppIdNotMatch => "appid_notmatch",
            Self::NotAuth => "not_auth",
            Self::BlackAppId => "black_appid",
            Self::InvalidParam => "invalid_param",
            Self::AliasNotBind => "alias_notbind",
            Self::TagOverLimit => "tag_over_limit",
            Self::SuccessOnline => "successed_online",
            Self::SuccessOffline => "successed_offline",
            Self::TagInvalidOrNoAuth => "taginvalid_or_noauth",
            Self::NoValidPush => "no_valid_push",
            Self::SuccessIgnore => "successed_ignore",
            Self::NoTaskId => "no_taskid",
            Self::OtherError => "other_error",
            Self::Other(code) => code,
            Self::Missing => "",
        }
    }

    /// Parse a wire code.
    pub fn parse(code: &str) -> Self {
        match code {
            "ok" => Self::Ok,
            "no_msg" => Self::NoMsg,
            "alias_error" => Self::AliasError,
            "black_ip" => Self::BlackIp,
            "sign_error" => Self::SignError,
            "pushnum_overlimit" => Self::PushNumOverLimit,
            "no_appid" => Self::NoAppId,
            "no_user" => Self::NoUser,
            "too_frequent" => Self::TooFrequent,
            "sensitive_word" => Self::SensitiveWord,
            "appid_notmatch" => Self::AppIdNotMatch,
            "not_auth" => Self::NotAuth,
            "black_appid" => Self::BlackAppId,
            "invalid_param" => Self::InvalidParam,
            "alias_notbind" => Self::AliasNotBind,
            "tag_over_limit" => Self::TagOverLimit,
            "successed_online" => Self::SuccessOnline,
            "successed_offline" => Self::SuccessOffline,
            "taginvalid_or_noauth" => Self::TagInvalidOrNoAuth,
            "no_valid_push" => Self::NoValidPush,
            "successed_ignore" => Self::SuccessIgnore,
            "no_taskid" => Self::NoTaskId,
            "other_error" => Self::OtherError,
            "" => Self::Missing,
            other => Self::Other(other.to_string()),
        }
    }

    /// `true` only for `ok`.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// `true` for the three `successed_*` delivery statuses.
    pub fn is_delivered(&self) -> bool {
        matches!(
            self,
            Self::SuccessOnline | Self::SuccessOffline | Self::SuccessIgnore
        )
    }

    /// `true` when the code indicates the auth token is no longer accepted.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::SignError | Self::NotAuth)
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("<missing>"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl From<&str> for ResultCode {
    fn from(code: &str) -> Self {
        Self::parse(code)
    }
}

impl Serialize for ResultCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ResultCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = Option::<String>::deserialize(deserializer)?;
        Ok(code.as_deref().map(Self::parse).unwrap_or_default())
    }
}

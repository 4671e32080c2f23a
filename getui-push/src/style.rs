//! Notification bar styles.
//!
//! The provider tells styles apart by a numeric `type` field embedded in the
//! style object, so [`Style`] serializes as the variant's fields plus that
//! tag.

use serde::{Serialize, Serializer};

/// Notification presentation style.
#[derive(Debug, Clone, PartialEq)]
pub enum Style {
    /// Android system style (`type` 0).
    System(SystemStyle),
    /// GeTui native style (`type` 1).
    GeTui(GeTuiStyle),
    /// Full background image (`type` 4).
    Image(ImageStyle),
    /// Expandable notification (`type` 6).
    Extended(ExtendedStyle),
}

impl Style {
    /// Create a system style with title and text.
    pub fn system(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::System(SystemStyle::new(title, text))
    }

    /// Numeric tag the provider uses for this style.
    pub fn type_code(&self) -> u8 {
        match self {
            Self::System(_) => 0,
            Self::GeTui(_) => 1,
            Self::Image(_) => 4,
            Self::Extended(_) => 6,
        }
    }
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    #[serde(rename = "type")]
    kind: u8,
    #[serde(flatten)]
    inner: &'a T,
}

impl Serialize for Style {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = self.type_code();
        match self {
            Self::System(inner) => Tagged { kind, inner }.serialize(serializer),
            Self::GeTui(inner) => Tagged { kind, inner }.serialize(serializer),
            Self::Image(inner) => Tagged { kind, inner }.serialize(serializer),
            Self::Extended(inner) => Tagged { kind, inner }.serialize(serializer),
        }
    }
}

impl From<SystemStyle> for Style {
    fn from(style: SystemStyle) -> Self {
        Self::System(style)
    }
}

impl From<GeTuiStyle> for Style {
    fn from(style: GeTuiStyle) -> Self {
        Self::GeTui(style)
    }
}

impl From<ImageStyle> for Style {
    fn from(style: ImageStyle) -> Self {
        Self::Image(style)
    }
}

impl From<ExtendedStyle> for Style {
    fn from(style: ExtendedStyle) -> Self {
        Self::Extended(style)
    }
}

/// Importance of an Android notification channel.
///
/// Cannot be changed on the device once the channel exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelLevel {
    /// No sound, no vibration, hidden.
    #[default]
    Hidden,
    /// No sound, no vibration, folded in the shade, hidden on lock screen.
    Folded,
    /// No sound, no vibration, shown without waking the screen.
    Quiet,
    /// Sound and vibration, wakes the screen.
    Normal,
    /// Sound and vibration, heads-up when the screen is on.
    HeadsUp,
}

impl Serialize for ChannelLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

fn default_channel() -> String {
    "Default".to_string()
}

/// System style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemStyle {
    /// Notification text.
    pub text: String,
    /// Notification title.
    pub title: String,
    /// Icon file name bundled with the app, e.g. `push.png`.
    pub logo: String,
    /// Icon URL.
    #[serde(rename = "logourl", skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Large layout: 1 for big image, 2 for long text.
    pub big_style: u8,
    /// Image URL for the big image layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big_image_url: Option<String>,
    /// Ring on arrival.
    pub is_ring: bool,
    /// Vibrate on arrival.
    pub is_vibrate: bool,
    /// User can dismiss the notification.
    pub is_clearable: bool,
    /// Messages with the same id replace each other.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_id: Option<i64>,
    /// Notification channel id.
    pub channel_id: String,
    /// Notification channel name.
    pub channel_name: String,
    /// Notification channel importance.
    pub channel_level: ChannelLevel,
}

impl SystemStyle {
    /// Create a system style with provider defaults.
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            title: title.into(),
            logo: String::new(),
            logo_url: None,
            big_style: 1,
            big_image_url: None,
            is_ring: true,
            is_vibrate: true,
            is_clearable: true,
            notify_id: None,
            channel_id: default_channel(),
            channel_name: default_channel(),
            channel_level: ChannelLevel::Hidden,
        }
    }

    /// Set the bundled icon name.
    pub fn logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = logo.into();
        self
    }

    /// Set the icon URL.
    pub fn logo_url(mut self, url: impl Into<String>) -> Self {
        self.logo_url = Some(url.into());
        self
    }

    /// Show a big image.
    pub fn big_image(mut self, url: impl Into<String>) -> Self {
        self.big_style = 1;
        self.big_image_url = Some(url.into());
        self
    }

    /// Set ring, vibrate and clearable flags.
    pub fn alerts(mut self, ring: bool, vibrate: bool, clearable: bool) -> Self {
        self.is_ring = ring;
        self.is_vibrate = vibrate;
        self.is_clearable = clearable;
        self
    }

    /// Set the replacement id.
    pub fn notify_id(mut self, id: i64) -> Self {
        self.notify_id = Some(id);
        self
    }

    /// Set the notification channel.
    pub fn channel(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        level: ChannelLevel,
    ) -> Self {
        self.channel_id = id.into();
        self.channel_name = name.into();
        self.channel_level = level;
        self
    }
}

impl Default for SystemStyle {
    fn default() -> Self {
        Self::new("", "")
    }
}

/// GeTui native style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeTuiStyle {
    /// Notification text.
    pub text: String,
    /// Notification title.
    pub title: String,
    /// Icon file name bundled with the app.
    pub logo: String,
    /// Icon URL.
    #[serde(rename = "logourl", skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Ring on arrival.
    pub is_ring: bool,
    /// Vibrate on arrival.
    pub is_vibrate: bool,
    /// User can dismiss the notification.
    pub is_clearable: bool,
    /// Messages with the same id replace each other.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_id: Option<i64>,
}

impl GeTuiStyle {
    /// Create a GeTui style.
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        logo: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            title: title.into(),
            logo: logo.into(),
            logo_url: None,
            is_ring: true,
            is_vibrate: true,
            is_clearable: true,
            notify_id: None,
        }
    }

    /// Set the icon URL.
    pub fn logo_url(mut self, url: impl Into<String>) -> Self {
        self.logo_url = Some(url.into());
        self
    }

    /// Set the replacement id.
    pub fn notify_id(mut self, id: i64) -> Self {
        self.notify_id = Some(id);
        self
    }
}

/// Background image style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageStyle {
    /// Icon file name bundled with the app.
    pub logo: String,
    /// Banner image used as the notification background.
    pub banner_url: String,
    /// Ring on arrival.
    pub is_ring: bool,
    /// Vibrate on arrival.
    pub is_vibrate: bool,
    /// User can dismiss the notification.
    pub is_clearable: bool,
}

impl ImageStyle {
    /// Create an image style.
    pub fn new(logo: impl Into<String>, banner_url: impl Into<String>) -> Self {
        Self {
            logo: logo.into(),
            banner_url: banner_url.into(),
            is_ring: true,
            is_vibrate: true,
            is_clearable: true,
        }
    }
}

/// Expandable notification style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtendedStyle {
    /// Notification text.
    pub text: String,
    /// Notification title.
    pub title: String,
    /// Icon file name bundled with the app.
    pub logo: String,
    /// Icon URL.
    #[serde(rename = "logourl", skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Large layout: 1 for big image, 2 for long text, 3 for small image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big_style: Option<u8>,
    /// Image URL for the big image layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big_image_url: Option<String>,
    /// Text for the long text layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big_text: Option<String>,
    /// Banner image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
    /// Ring on arrival.
    pub is_ring: bool,
    /// Vibrate on arrival.
    pub is_vibrate: bool,
    /// User can dismiss the notification.
    pub is_clearable: bool,
    /// Messages with the same id replace each other.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_id: Option<i64>,
    /// Notification channel id.
    pub channel_id: String,
    /// Notification channel name.
    pub channel_name: String,
    /// Notification channel importance.
    pub channel_level: ChannelLevel,
}

impl ExtendedStyle {
    /// Create an extended style.
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        logo: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            title: title.into(),
            logo: logo.into(),
            logo_url: None,
            big_style: None,
            big_image_url: None,
            big_text: None,
            banner_url: None,
            is_ring: true,
            is_vibrate: true,
            is_clearable: true,
            notify_id: None,
            channel_id: default_channel(),
            channel_name: default_channel(),
            channel_level: ChannelLevel::Hidden,
        }
    }

    /// Show a big image.
    pub fn big_image(mut self, url: impl Into<String>) -> Self {
        self.big_style = Some(1);
        self.big_image_url = Some(url.into());
        self
    }

    /// Show long text.
    pub fn big_text(mut self, text: impl Into<String>) -> Self {
        self.big_style = Some(2);
        self.big_text = Some(text.into());
        self
    }

    /// Set the banner image.
    pub fn banner(mut self, url: impl Into<String>) -> Self {
        self.banner_url = Some(url.into());
        self
    }

    /// Set the notification channel.
    pub fn channel(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        level: ChannelLevel,
    ) -> Self {
        self.channel_id = id.into();
        self.channel_name = name.into();
        self.channel_level = level;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_system_style_defaults() {
        let value = serde_json::to_value(Style::system("T", "B")).unwrap();
        assert_eq!(value["type"], 0);
        assert_eq!(value["title"], "T");
        assert_eq!(value["text"], "B");
        assert_eq!(value["big_style"], 1);
        assert_eq!(value["is_ring"], true);
        assert_eq!(value["channel_id"], "Default");
        assert_eq!(value["channel_level"], 0);
        assert!(value.get("logourl").is_none());
    }

    #[test]
    fn test_type_tags() {
        let styles: Vec<Style> = vec![
            GeTuiStyle::new("t", "b", "push.png").into(),
            ImageStyle::new("push.png", "https://example.com/banner.png").into(),
            ExtendedStyle::new("t", "b", "push.png").big_text("long").into(),
        ];
        let tags: Vec<_> = styles
            .iter()
            .map(|s| serde_json::to_value(s).unwrap()["type"].clone())
            .collect();
        assert_eq!(tags, vec![json!(1), json!(4), json!(6)]);
    }

    #[test]
    fn test_extended_big_text() {
        let style = ExtendedStyle::new("t", "b", "push.png")
            .big_text("a long story")
            .channel("news", "News", ChannelLevel::HeadsUp);
        let value = serde_json::to_value(Style::from(style)).unwrap();
        assert_eq!(value["big_style"], 2);
        assert_eq!(value["big_text"], "a long story");
        assert_eq!(value["channel_level"], 4);
        assert!(value.get("big_image_url").is_none());
    }
}

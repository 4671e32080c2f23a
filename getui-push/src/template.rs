//! Message templates.
//!
//! A push carries exactly one template. The provider expects it under a key
//! named after the template type (`notification`, `link`, `notypopload`,
//! `startactivity`, `transmission`), and the same name goes into
//! `message.msgtype`.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::message::datetime_format;
use crate::{PushError, Result, Style};

/// Template discriminant, as written to `message.msgtype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Opens the app.
    Notification,
    /// Opens a web page.
    Link,
    /// Pops up a download dialog.
    #[serde(rename = "notypopload")]
    NotifyPopLoad,
    /// Opens a specific in-app page.
    StartActivity,
    /// Pass-through payload for the app.
    Transmission,
}

impl TemplateKind {
    /// All template kinds.
    pub const ALL: [TemplateKind; 5] = [
        Self::Notification,
        Self::Link,
        Self::NotifyPopLoad,
        Self::StartActivity,
        Self::Transmission,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Notification => "notification",
            Self::Link => "link",
            Self::NotifyPopLoad => "notypopload",
            Self::StartActivity => "startactivity",
            Self::Transmission => "transmission",
        }
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Push template, serialized as `{"<kind>": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    /// Notification that opens the app.
    Notification(NotificationTemplate),
    /// Notification that opens a URL.
    Link(LinkTemplate),
    /// Notification that pops up a download dialog.
    #[serde(rename = "notypopload")]
    NotifyPopLoad(NotifyPopLoadTemplate),
    /// Notification that opens an in-app page.
    StartActivity(StartActivityTemplate),
    /// Pass-through message.
    Transmission(TransmissionTemplate),
}

impl Template {
    /// Discriminant of this template.
    pub fn kind(&self) -> TemplateKind {
        match self {
            Self::Notification(_) => TemplateKind::Notification,
            Self::Link(_) => TemplateKind::Link,
            Self::NotifyPopLoad(_) => TemplateKind::NotifyPopLoad,
            Self::StartActivity(_) => TemplateKind::StartActivity,
            Self::Transmission(_) => TemplateKind::Transmission,
        }
    }
}

impl From<NotificationTemplate> for Template {
    fn from(t: NotificationTemplate) -> Self {
        Self::Notification(t)
    }
}

impl From<LinkTemplate> for Template {
    fn from(t: LinkTemplate) -> Self {
        Self::Link(t)
    }
}

impl From<NotifyPopLoadTemplate> for Template {
    fn from(t: NotifyPopLoadTemplate) -> Self {
        Self::NotifyPopLoad(t)
    }
}

impl From<StartActivityTemplate> for Template {
    fn from(t: StartActivityTemplate) -> Self {
        Self::StartActivity(t)
    }
}

impl From<TransmissionTemplate> for Template {
    fn from(t: TransmissionTemplate) -> Self {
        Self::Transmission(t)
    }
}

/// Display window shared by every template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DisplayWindow {
    /// Start showing at.
    #[serde(
        rename = "duration_begin",
        with = "datetime_format::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub begin: Option<NaiveDateTime>,
    /// Stop showing at.
    #[serde(
        rename = "duration_end",
        with = "datetime_format::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end: Option<NaiveDateTime>,
}

impl DisplayWindow {
    /// Window between two local times.
    pub fn between(begin: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            begin: Some(begin),
            end: Some(end),
        }
    }
}

/// Opens the app when tapped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationTemplate {
    /// Launch the app immediately on receipt.
    pub transmission_type: bool,
    /// Pass-through content.
    pub transmission_content: String,
    /// Display window.
    #[serde(flatten)]
    pub window: DisplayWindow,
    /// Notification style.
    pub style: Style,
}

impl NotificationTemplate {
    /// Create a notification template.
    pub fn new(style: impl Into<Style>) -> Self {
        Self {
            transmission_type: false,
            transmission_content: String::new(),
            window: DisplayWindow::default(),
            style: style.into(),
        }
    }

    /// Attach pass-through content.
    pub fn transmission(mut self, content: impl Into<String>, launch_app: bool) -> Self {
        self.transmission_content = content.into();
        self.transmission_type = launch_app;
        self
    }

    /// Set the display window.
    pub fn window(mut self, window: DisplayWindow) -> Self {
        self.window = window;
        self
    }
}

/// Opens a web page when tapped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkTemplate {
    /// Page to open.
    pub url: String,
    /// Display window.
    #[serde(flatten)]
    pub window: DisplayWindow,
    /// Notification style.
    pub style: Style,
}

impl LinkTemplate {
    /// Create a link template.
    pub fn new(url: impl Into<String>, style: impl Into<Style>) -> Self {
        Self {
            url: url.into(),
            window: DisplayWindow::default(),
            style: style.into(),
        }
    }

    /// Set the display window.
    pub fn window(mut self, window: DisplayWindow) -> Self {
        self.window = window;
        self
    }
}

/// Pops up a download dialog when tapped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotifyPopLoadTemplate {
    /// Notification icon.
    #[serde(rename = "notyicon")]
    pub notify_icon: String,
    /// Notification title.
    #[serde(rename = "notytitle")]
    pub notify_title: String,
    /// Notification text.
    #[serde(rename = "notycontent")]
    pub notify_content: String,
    /// Popup title.
    #[serde(rename = "poptitle")]
    pub pop_title: String,
    /// Popup text.
    #[serde(rename = "popcontent")]
    pub pop_content: String,
    /// Popup image.
    #[serde(rename = "popimage")]
    pub pop_image: String,
    /// Left button label.
    #[serde(rename = "popbutton_1")]
    pub pop_button_1: String,
    /// Right button label.
    #[serde(rename = "popbutton_2")]
    pub pop_button_2: String,
    /// Download icon.
    #[serde(rename = "loadicon", skip_serializing_if = "Option::is_none")]
    pub load_icon: Option<String>,
    /// Download title.
    #[serde(rename = "loadtitle", skip_serializing_if = "Option::is_none")]
    pub load_title: Option<String>,
    /// File to download.
    #[serde(rename = "loadurl")]
    pub load_url: String,
    /// Install automatically once downloaded.
    #[serde(rename = "is_autoinstall")]
    pub auto_install: bool,
    /// Launch after install.
    #[serde(rename = "is_actived")]
    pub activate: bool,
    /// Android package mark.
    #[serde(rename = "androidmark", skip_serializing_if = "Option::is_none")]
    pub android_mark: Option<String>,
    /// Symbian mark.
    #[serde(rename = "symbianmark", skip_serializing_if = "Option::is_none")]
    pub symbian_mark: Option<String>,
    /// iPhone mark.
    #[serde(rename = "iphonemark", skip_serializing_if = "Option::is_none")]
    pub iphone_mark: Option<String>,
    /// Display window.
    #[serde(flatten)]
    pub window: DisplayWindow,
}

impl NotifyPopLoadTemplate {
    /// Create a download popup for `load_url`.
    pub fn new(
        notify_title: impl Into<String>,
        notify_content: impl Into<String>,
        load_url: impl Into<String>,
    ) -> Self {
        Self {
            notify_icon: String::new(),
            notify_title: notify_title.into(),
            notify_content: notify_content.into(),
            pop_title: String::new(),
            pop_content: String::new(),
            pop_image: String::new(),
            pop_button_1: String::new(),
            pop_button_2: String::new(),
            load_icon: None,
            load_title: None,
            load_url: load_url.into(),
            auto_install: false,
            activate: false,
            android_mark: None,
            symbian_mark: None,
            iphone_mark: None,
            window: DisplayWindow::default(),
        }
    }

    /// Set the notification icon.
    pub fn notify_icon(mut self, icon: impl Into<String>) -> Self {
        self.notify_icon = icon.into();
        self
    }

    /// Set the popup text and image.
    pub fn popup(
        mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        self.pop_title = title.into();
        self.pop_content = content.into();
        self.pop_image = image.into();
        self
    }

    /// Set the popup button labels.
    pub fn buttons(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.pop_button_1 = left.into();
        self.pop_button_2 = right.into();
        self
    }

    /// Set the download icon and title.
    pub fn download(mut self, icon: impl Into<String>, title: impl Into<String>) -> Self {
        self.load_icon = Some(icon.into());
        self.load_title = Some(title.into());
        self
    }

    /// Install automatically and optionally launch afterwards.
    pub fn auto_install(mut self, activate: bool) -> Self {
        self.auto_install = true;
        self.activate = activate;
        self
    }

    /// Set the Android package mark.
    pub fn android_mark(mut self, mark: impl Into<String>) -> Self {
        self.android_mark = Some(mark.into());
        self
    }

    /// Set the iPhone mark.
    pub fn iphone_mark(mut self, mark: impl Into<String>) -> Self {
        self.iphone_mark = Some(mark.into());
        self
    }

    /// Set the display window.
    pub fn window(mut self, window: DisplayWindow) -> Self {
        self.window = window;
        self
    }
}

/// Longest intent the provider accepts, in bytes.
pub const MAX_INTENT_LEN: usize = 1000;

/// Opens an in-app page when tapped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartActivityTemplate {
    /// Launch the app immediately on receipt.
    pub transmission_type: bool,
    /// Pass-through content.
    pub transmission_content: String,
    /// Display window.
    #[serde(flatten)]
    pub window: DisplayWindow,
    /// Android intent URI, `intent:...;end`.
    intent: String,
    /// Notification style.
    pub style: Style,
}

impl StartActivityTemplate {
    /// Create a template that opens `intent`.
    ///
    /// The intent must start with `intent:`, end with `;end` and be shorter
    /// than [`MAX_INTENT_LEN`] bytes.
    pub fn new(intent: impl Into<String>, style: impl Into<Style>) -> Result<Self> {
        let intent = intent.into();
        if !intent.starts_with("intent:") || !intent.ends_with(";end") {
            return Err(PushError::InvalidRequest(
                "intent must start with `intent:` and end with `;end`".to_string(),
            ));
        }
        if intent.len() >= MAX_INTENT_LEN {
            return Err(PushError::InvalidRequest(format!(
                "intent is {} bytes, limit is {}",
                intent.len(),
                MAX_INTENT_LEN
            )));
        }

        Ok(Self {
            transmission_type: false,
            transmission_content: String::new(),
            window: DisplayWindow::default(),
            intent,
            style: style.into(),
        })
    }

    /// The intent URI.
    pub fn intent(&self) -> &str {
        &self.intent
    }

    /// Attach pass-through content.
    pub fn transmission(mut self, content: impl Into<String>, launch_app: bool) -> Self {
        self.transmission_content = content.into();
        self.transmission_type = launch_app;
        self
    }

    /// Set the display window.
    pub fn window(mut self, window: DisplayWindow) -> Self {
        self.window = window;
        self
    }
}

/// Pass-through message handed to the app.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransmissionTemplate {
    /// Launch the app immediately on receipt.
    pub transmission_type: bool,
    /// Pass-through content.
    pub transmission_content: String,
    /// Display window.
    #[serde(flatten)]
    pub window: DisplayWindow,
}

impl TransmissionTemplate {
    /// Create a transmission template.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            transmission_type: false,
            transmission_content: content.into(),
            window: DisplayWindow::default(),
        }
    }

    /// Launch the app on receipt.
    pub fn launch_app(mut self) -> Self {
        self.transmission_type = true;
        self
    }

    /// Set the display window.
    pub fn window(mut self, window: DisplayWindow) -> Self {
        self.window = window;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_template_is_keyed_by_kind() {
        let template = Template::from(TransmissionTemplate::new("{\"k\":1}"));
        let value = serde_json::to_value(&template).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["transmission"]["transmission_content"], "{\"k\":1}");
        assert_eq!(template.kind().as_str(), "transmission");
    }

    #[test]
    fn test_notify_pop_load_wire_names() {
        let template = NotifyPopLoadTemplate::new("title", "content", "https://example.com/app.apk")
            .buttons("Download", "Cancel")
            .auto_install(true);
        let value = serde_json::to_value(Template::from(template)).unwrap();
        let body = &value["notypopload"];
        assert_eq!(body["notytitle"], "title");
        assert_eq!(body["popbutton_1"], "Download");
        assert_eq!(body["loadurl"], "https://example.com/app.apk");
        assert_eq!(body["is_autoinstall"], true);
        assert_eq!(body["is_actived"], true);
        assert!(body.get("loadicon").is_none());
    }

    #[test]
    fn test_intent_validation() {
        let style = Style::system("t", "b");
        assert!(StartActivityTemplate::new("intent:#Intent;component=a/b;end", style.clone()).is_ok());
        assert!(StartActivityTemplate::new("http://example.com", style.clone()).is_err());

        let long = format!("intent:{};end", "x".repeat(MAX_INTENT_LEN));
        assert!(matches!(
            StartActivityTemplate::new(long, style),
            Err(PushError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_display_window_format() {
        let begin = NaiveDate::from_ymd_opt(2024, 3, 21)
            .unwrap()
            .and_hms_opt(14, 1, 3)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 22)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let template = LinkTemplate::new("https://example.com", Style::system("t", "b"))
            .window(DisplayWindow::between(begin, end));
        let value = serde_json::to_value(&template).unwrap();
        assert_eq!(value["duration_begin"], "2024-03-21 14:01:03");
        assert_eq!(value["duration_end"], "2024-03-22 09:00:00");

        let value =
            serde_json::to_value(LinkTemplate::new("https://example.com", Style::system("t", "b")))
                .unwrap();
        assert!(value.get("duration_begin").is_none());
    }
}

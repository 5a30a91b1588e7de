//! Notification and in-app message content types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Custom key/value payload attached to a block.
pub type Extras = Map<String, Value>;

/// Default Android notification builder ID.
pub const DEFAULT_BUILDER_ID: i64 = 1;

/// Default iOS sound file.
pub const DEFAULT_SOUND: &str = "sound.caf";

/// Default iOS badge expression.
pub const DEFAULT_BADGE: &str = "+1";

pub(crate) fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.is_empty() { None } else { Some(value) }
}

/// iOS badge: an absolute count or a relative expression such as `"+1"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Badge {
    /// Absolute count.
    Count(u32),
    /// Expression understood by the service.
    Expr(String),
}

impl Default for Badge {
    fn default() -> Self {
        Self::Expr(DEFAULT_BADGE.to_string())
    }
}

impl From<u32> for Badge {
    fn from(count: u32) -> Self {
        Self::Count(count)
    }
}

impl From<&str> for Badge {
    fn from(expr: &str) -> Self {
        Self::Expr(expr.to_string())
    }
}

/// Notification section of the argument tree.
///
/// The shared alert is absent when a platform block was attached before
/// [`set_notification`](crate::PushRequestBuilder::set_notification) ran.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Notification {
    /// Alert shared by all platforms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    /// Android block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<Android>,
    /// iOS block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ios: Option<Ios>,
    /// Windows Phone block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winphone: Option<WinPhone>,
}

impl Notification {
    /// Create a notification with only the shared alert.
    pub fn new(alert: impl Into<String>) -> Self {
        Self {
            alert: Some(alert.into()),
            ..Self::default()
        }
    }
}

/// Android notification block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Android {
    /// Alert text; falls back to the shared alert when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    /// Notification title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Notification style builder ID.
    pub builder_id: i64,
    /// Custom data.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extras: Extras,
}

impl Android {
    /// Create a block with default values.
    pub fn new() -> Self {
        Self {
            alert: None,
            title: None,
            builder_id: DEFAULT_BUILDER_ID,
            extras: Map::new(),
        }
    }

    /// Set the alert. Empty text is treated as unset.
    pub fn alert(mut self, alert: impl Into<String>) -> Self {
        self.alert = non_empty(alert);
        self
    }

    /// Set the title. Empty text is treated as unset.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = non_empty(title);
        self
    }

    /// Set the builder ID.
    pub fn builder_id(mut self, id: i64) -> Self {
        self.builder_id = id;
        self
    }

    /// Add a custom value.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }
}

impl Default for Android {
    fn default() -> Self {
        Self::new()
    }
}

/// iOS notification block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ios {
    /// Alert text; falls back to the shared alert when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    /// Sound file.
    pub sound: String,
    /// Badge.
    pub badge: Badge,
    /// Background fetch flag.
    #[serde(rename = "content-available")]
    pub content_available: bool,
    /// Notification category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Custom data.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extras: Extras,
}

impl Ios {
    /// Create a block with sound `sound.caf`, badge `+1` and content-available set.
    pub fn new() -> Self {
        Self {
            alert: None,
            sound: DEFAULT_SOUND.to_string(),
            badge: Badge::default(),
            content_available: true,
            category: None,
            extras: Map::new(),
        }
    }

    /// Set the alert. Empty text is treated as unset.
    pub fn alert(mut self, alert: impl Into<String>) -> Self {
        self.alert = non_empty(alert);
        self
    }

    /// Set the sound.
    pub fn sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = sound.into();
        self
    }

    /// Set the badge.
    pub fn badge(mut self, badge: impl Into<Badge>) -> Self {
        self.badge = badge.into();
        self
    }

    /// Set the content-available flag.
    pub fn content_available(mut self, enabled: bool) -> Self {
        self.content_available = enabled;
        self
    }

    /// Set the category. Empty text is treated as unset.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = non_empty(category);
        self
    }

    /// Add a custom value.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }
}

impl Default for Ios {
    fn default() -> Self {
        Self::new()
    }
}

/// Windows Phone notification block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WinPhone {
    /// Alert text; falls back to the shared alert when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    /// Notification title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Page opened on tap.
    #[serde(rename = "_open_page", skip_serializing_if = "Option::is_none")]
    pub open_page: Option<String>,
    /// Custom data.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extras: Extras,
}

impl WinPhone {
    /// Create an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the alert. Empty text is treated as unset.
    pub fn alert(mut self, alert: impl Into<String>) -> Self {
        self.alert = non_empty(alert);
        self
    }

    /// Set the title. Empty text is treated as unset.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = non_empty(title);
        self
    }

    /// Set the page to open.
    pub fn open_page(mut self, page: impl Into<String>) -> Self {
        self.open_page = non_empty(page);
        self
    }

    /// Add a custom value.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }
}

/// In-app (custom) message, delivered to the app instead of the tray.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// Message body.
    pub msg_content: String,
    /// Message title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Content type hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Custom data.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extras: Extras,
}

impl Message {
    /// Create a message.
    pub fn new(msg_content: impl Into<String>) -> Self {
        Self {
            msg_content: msg_content.into(),
            title: None,
            content_type: None,
            extras: Map::new(),
        }
    }

    /// Set the title. Empty text is treated as unset.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = non_empty(title);
        self
    }

    /// Set the content type. Empty text is treated as unset.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = non_empty(content_type);
        self
    }

    /// Add a custom value.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ios_defaults() {
        let ios = Ios::new().alert("hi");
        let value = serde_json::to_value(&ios).unwrap();
        assert_eq!(
            value,
            json!({
                "alert": "hi",
                "sound": "sound.caf",
                "badge": "+1",
                "content-available": true
            })
        );
    }

    #[test]
    fn test_badge_count() {
        let ios = Ios::new().badge(3u32);
        assert_eq!(serde_json::to_value(&ios).unwrap()["badge"], json!(3));
    }

    #[test]
    fn test_empty_strings_are_unset() {
        let android = Android::new().alert("").title("");
        assert!(android.alert.is_none());
        assert!(android.title.is_none());

        let message = Message::new("body").title("").content_type("text");
        assert!(message.title.is_none());
        assert_eq!(message.content_type.as_deref(), Some("text"));
    }

    #[test]
    fn test_winphone_wire_names() {
        let winphone = WinPhone::new()
            .alert("a")
            .open_page("/page1.xaml")
            .extra("id", 7);
        let value = serde_json::to_value(&winphone).unwrap();
        assert_eq!(
            value,
            json!({"alert": "a", "_open_page": "/page1.xaml", "extras": {"id": 7}})
        );
    }

    #[test]
    fn test_android_builder_id_default() {
        let value = serde_json::to_value(Android::new().alert("x")).unwrap();
        assert_eq!(value, json!({"alert": "x", "builder_id": 1}));
    }
}

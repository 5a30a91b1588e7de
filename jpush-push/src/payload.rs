//! The argument tree of a push request and its validation.

use serde::Serialize;

use crate::audience::Audience;
use crate::notification::{Message, Notification};
use crate::options::Options;
use crate::platform::PlatformTarget;
use crate::{PushError, Result};

/// Byte limit for the alert (or the serialized iOS block).
pub const MAX_ALERT_BYTES: usize = 2000;

/// Argument tree of one push request.
///
/// Every section is optional while the request is being assembled;
/// [`PushPayload::validate`] decides whether the tree can be sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PushPayload {
    /// Target platforms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformTarget>,
    /// Targeting filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<Audience>,
    /// Tray notification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    /// In-app message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    /// Delivery options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Options>,
}

static BROADCAST: Audience = Audience::All;

/// Outgoing document: the tree with its audience resolved.
#[derive(Debug, Serialize)]
struct OutgoingPayload<'a> {
    platform: &'a PlatformTarget,
    audience: &'a Audience,
    notification: &'a Notification,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<&'a Options>,
}

impl PushPayload {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no section has been set.
    pub fn is_empty(&self) -> bool {
        self.platform.is_none()
            && self.audience.is_none()
            && self.notification.is_none()
            && self.message.is_none()
            && self.options.is_none()
    }

    /// Shared alert, if a notification has been set.
    pub fn alert(&self) -> Option<&str> {
        self.notification.as_ref().and_then(|n| n.alert.as_deref())
    }

    /// Check that the tree can be sent.
    pub fn validate(&self) -> Result<()> {
        self.outgoing().map(|_| ())
    }

    /// Validate and encode the tree as compact JSON.
    ///
    /// A missing or empty audience is sent as the broadcast sentinel; the
    /// tree itself is left untouched.
    pub fn to_request_body(&self) -> Result<String> {
        let outgoing = self.outgoing()?;
        Ok(serde_json::to_string(&outgoing)?)
    }

    /// Encode the tree as-is, without validation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn outgoing(&self) -> Result<OutgoingPayload<'_>> {
        if self.is_empty() {
            return Err(PushError::Validation("No arguments has been set".into()));
        }
        let platform = self
            .platform
            .as_ref()
            .ok_or_else(|| PushError::Validation("No platform has been set".into()))?;
        let notification = self
            .notification
            .as_ref()
            .filter(|n| n.alert.is_some())
            .ok_or_else(|| PushError::Validation("No alert has been set".into()))?;

        match &notification.ios {
            Some(ios) => {
                let size = serde_json::to_string(ios)?.len();
                if size > MAX_ALERT_BYTES {
                    return Err(PushError::Validation(format!(
                        "iOS alert is too long: {} bytes exceeds limit of {} bytes",
                        size, MAX_ALERT_BYTES
                    )));
                }
            }
            None => {
                let size = notification.alert.as_deref().map_or(0, str::len);
                if size > MAX_ALERT_BYTES {
                    return Err(PushError::Validation(format!(
                        "Alert is too long: {} bytes exceeds limit of {} bytes",
                        size, MAX_ALERT_BYTES
                    )));
                }
            }
        }

        let audience = match &self.audience {
            Some(audience) if !audience.is_empty() => audience,
            _ => &BROADCAST,
        };

        Ok(OutgoingPayload {
            platform,
            audience,
            notification,
            message: self.message.as_ref(),
            options: self.options.as_ref(),
        })
    }
}

//! Push request builder and sender.

use std::sync::Arc;
use tracing::debug;

use crate::audience::{Audience, AudienceFilter, AudienceType};
use crate::config::{Credentials, PushConfig};
use crate::notification::{Android, Ios, Message, Notification, WinPhone, non_empty};
use crate::options::Options;
use crate::payload::PushPayload;
use crate::platform::{ALL, Platform, PlatformTarget};
use crate::response::{PushResponse, classify};
use crate::transport::{PushTransport, TransportRequest};
use crate::{PushError, Result};

/// Builds one push request incrementally and sends it.
///
/// Setters mutate an internal [`PushPayload`]; [`send`](Self::send)
/// validates it, posts it and classifies the answer. The payload survives
/// a send, so it can be adjusted and sent again. Use one builder per
/// in-flight request.
pub struct PushRequestBuilder {
    config: PushConfig,
    auth_token: String,
    payload: PushPayload,
    transport: Arc<dyn PushTransport>,
    last_error: Option<PushError>,
    last_response: Option<PushResponse>,
}

impl PushRequestBuilder {
    /// Create a builder that talks to the live service over HTTPS.
    #[cfg(feature = "http")]
    pub fn new(app_key: impl Into<String>, master_secret: impl Into<String>) -> Result<Self> {
        Self::with_config(PushConfig::new(app_key, master_secret)?)
    }

    /// Create a builder from a full configuration.
    #[cfg(feature = "http")]
    pub fn with_config(config: PushConfig) -> Result<Self> {
        let transport = crate::transport::HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a builder that posts through a custom transport.
    pub fn with_transport(config: PushConfig, transport: impl PushTransport + 'static) -> Self {
        Self::with_shared_transport(config, Arc::new(transport))
    }

    /// Create a builder around an already shared transport.
    pub fn with_shared_transport(config: PushConfig, transport: Arc<dyn PushTransport>) -> Self {
        let auth_token = config.credentials.basic_token();
        Self {
            config,
            auth_token,
            payload: PushPayload::new(),
            transport,
            last_error: None,
            last_response: None,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &PushConfig {
        &self.config
    }

    /// Current argument tree.
    pub fn payload(&self) -> &PushPayload {
        &self.payload
    }

    /// Argument tree as compact JSON, without validation.
    pub fn to_json(&self) -> Result<String> {
        self.payload.to_json()
    }

    /// Error of the most recent failed call, if any.
    pub fn last_error(&self) -> Option<&PushError> {
        self.last_error.as_ref()
    }

    /// Response of the most recent successful send, if any.
    pub fn last_response(&self) -> Option<&PushResponse> {
        self.last_response.as_ref()
    }

    /// Enable or disable validate-only mode.
    pub fn set_debug(&mut self, debug: bool) {
        self.config.debug = debug;
    }

    /// Replace the credentials. The argument tree is cleared.
    pub fn renew_credentials(
        &mut self,
        app_key: impl Into<String>,
        master_secret: impl Into<String>,
    ) -> Result<()> {
        let result = Credentials::new(app_key, master_secret).map(|credentials| {
            self.auth_token = credentials.basic_token();
            self.config.credentials = credentials;
            self.clear();
        });
        self.record(result)
    }

    /// Empty the argument tree.
    pub fn clear(&mut self) {
        self.payload = PushPayload::new();
    }

    /// Select target platforms by name (`all`, `android`, `ios`, `winphone`).
    ///
    /// `all` anywhere in the call selects every platform. Otherwise unknown
    /// names are skipped and the rest are appended to the current list; a
    /// current `all` is replaced by the new list.
    pub fn set_platform<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut all = false;
        let mut selected = Vec::new();
        for name in names {
            let name = name.as_ref();
            if name == ALL {
                all = true;
            } else if let Ok(platform) = name.parse::<Platform>() {
                selected.push(platform);
            }
        }

        let result = if all {
            self.payload.platform = Some(PlatformTarget::All);
            Ok(())
        } else if selected.is_empty() {
            Err(PushError::InvalidArgument(
                "set_platform needs at least one of all, android, ios, winphone".into(),
            ))
        } else {
            match &mut self.payload.platform {
                Some(PlatformTarget::List(list)) => list.extend(selected),
                slot => *slot = Some(PlatformTarget::List(selected)),
            }
            Ok(())
        };
        self.record(result)
    }

    /// Set the shared alert, replacing the whole notification block.
    ///
    /// A non-empty `title` is copied into the android and winphone blocks of
    /// the selected platforms, built with default values.
    pub fn set_notification(&mut self, alert: impl Into<String>, title: impl Into<String>) -> Result<()> {
        let alert = alert.into();
        let title = non_empty(title);
        if title.is_some() && self.payload.platform.is_none() {
            let err = PushError::InvalidArgument(
                "platform must be set before a notification title".into(),
            );
            return self.record(Err(err));
        }

        let mut notification = Notification::new(alert.clone());
        if let Some(title) = title {
            let (android, winphone) = match &self.payload.platform {
                Some(PlatformTarget::All) => (true, true),
                Some(PlatformTarget::List(list)) => (
                    list.contains(&Platform::Android),
                    list.contains(&Platform::WinPhone),
                ),
                None => (false, false),
            };
            // the shared alert is copied as-is, even when empty
            if android {
                notification.android = Some(Android {
                    alert: Some(alert.clone()),
                    title: Some(title.clone()),
                    ..Android::new()
                });
            }
            if winphone {
                notification.winphone = Some(WinPhone {
                    alert: Some(alert),
                    title: Some(title),
                    ..WinPhone::new()
                });
            }
        }
        self.payload.notification = Some(notification);
        Ok(())
    }

    /// Set the in-app message.
    pub fn set_message(&mut self, message: Message) {
        self.payload.message = Some(message);
    }

    /// Set the Android block.
    pub fn set_android(&mut self, mut android: Android) -> Result<()> {
        let result = self.resolve_alert(android.alert.take()).map(|alert| {
            android.alert = Some(alert);
            self.notification_mut().android = Some(android);
        });
        self.record(result)
    }

    /// Set the iOS block.
    pub fn set_ios(&mut self, mut ios: Ios) -> Result<()> {
        let result = self.resolve_alert(ios.alert.take()).map(|alert| {
            ios.alert = Some(alert);
            self.notification_mut().ios = Some(ios);
        });
        self.record(result)
    }

    /// Set the Windows Phone block.
    pub fn set_winphone(&mut self, mut winphone: WinPhone) -> Result<()> {
        let result = self.resolve_alert(winphone.alert.take()).map(|alert| {
            winphone.alert = Some(alert);
            self.notification_mut().winphone = Some(winphone);
        });
        self.record(result)
    }

    /// Add audience values by filter name (`all`, `tag`, `tag_and`, `alias`,
    /// `registration_id`).
    ///
    /// `all` switches to broadcast and ignores `values`; broadcast then
    /// sticks until the tree is cleared. Unknown names are rejected.
    pub fn set_audience<I, S>(&mut self, kind: &str, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if kind == ALL {
            self.payload.audience = Some(Audience::All);
            return Ok(());
        }
        match kind.parse::<AudienceType>() {
            Ok(kind) => {
                self.add_audience(kind, values);
                Ok(())
            }
            Err(()) => self.record(Err(PushError::InvalidArgument(format!(
                "unknown audience type {:?}",
                kind
            )))),
        }
    }

    /// Broadcast to every device. Sticks until the tree is cleared.
    pub fn set_audience_all(&mut self) {
        self.payload.audience = Some(Audience::All);
    }

    /// Append values to a scoped audience filter. No-op under broadcast.
    pub fn add_audience<I, S>(&mut self, kind: AudienceType, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match &mut self.payload.audience {
            Some(Audience::All) => {
                debug!(kind = %kind, "Audience is broadcast; ignoring scoped values");
            }
            Some(Audience::Filter(filter)) => filter.append(kind, values),
            slot => {
                let mut filter = AudienceFilter::default();
                filter.append(kind, values);
                *slot = Some(Audience::Filter(filter));
            }
        }
    }

    /// Set delivery options. Out-of-range values are dropped.
    pub fn set_options(&mut self, options: Options) {
        self.payload.options = Some(options.sanitize());
    }

    /// Validate the argument tree and send it.
    ///
    /// Validation failures return [`PushError::Validation`] without touching
    /// the network. The tree is left unchanged whatever the outcome.
    pub async fn send(&mut self) -> Result<PushResponse> {
        let result = self.send_once().await;
        match &result {
            Ok(response) => {
                self.last_response = Some(response.clone());
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(e.clone()),
        }
        result
    }

    async fn send_once(&self) -> Result<PushResponse> {
        let body = self.payload.to_request_body()?;
        let url = self.config.endpoint()?;

        debug!(
            endpoint = %url,
            bytes = body.len(),
            validate_only = self.config.debug,
            "Sending push request"
        );
        if self.config.debug {
            debug!(body = %body, "Validate-only push request");
        }

        let response = self
            .transport
            .post(TransportRequest {
                url: url.into(),
                authorization: format!("Basic {}", self.auth_token),
                body,
            })
            .await?;

        if self.config.debug {
            debug!(
                status = response.status,
                body = %response.body,
                "Validate-only push response"
            );
        }
        classify(response)
    }

    fn resolve_alert(&self, alert: Option<String>) -> Result<String> {
        alert
            .or_else(|| self.payload.alert().and_then(non_empty))
            .ok_or(PushError::MissingAlert)
            .and_then(|alert| {
                if self.payload.platform.is_none() {
                    Err(PushError::InvalidArgument(
                        "platform must be set before platform-specific content".into(),
                    ))
                } else {
                    Ok(alert)
                }
            })
    }

    fn notification_mut(&mut self) -> &mut Notification {
        self.payload.notification.get_or_insert_with(Notification::default)
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.last_error = Some(e.clone());
        }
        result
    }
}

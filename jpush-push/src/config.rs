//! Client configuration and credentials.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::{PushError, Result};

/// Default service root.
pub const DEFAULT_BASE_URL: &str = "https://api.jpush.cn";

/// Path of the delivering endpoint.
pub const PUSH_PATH: &str = "/v3/push";

/// Path of the validate-only endpoint.
pub const VALIDATE_PATH: &str = "/v3/push/validate";

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(27);

/// Prefix of the environment variables read by [`PushConfig::from_env`].
pub const ENV_PREFIX: &str = "JPUSH";

/// Application key and master secret pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Application key.
    pub app_key: String,
    /// Master secret.
    pub master_secret: String,
}

impl Credentials {
    /// Create a credential pair. Both parts must be non-empty.
    pub fn new(app_key: impl Into<String>, master_secret: impl Into<String>) -> Result<Self> {
        let credentials = Self {
            app_key: app_key.into(),
            master_secret: master_secret.into(),
        };
        if credentials.app_key.trim().is_empty() {
            return Err(PushError::Configuration("app key is empty".into()));
        }
        if credentials.master_secret.trim().is_empty() {
            return Err(PushError::Configuration("master secret is empty".into()));
        }
        Ok(credentials)
    }

    /// Base64 of `app_key:master_secret`, as used in the `Authorization` header.
    pub fn basic_token(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.app_key, self.master_secret))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_key", &self.app_key)
            .field("master_secret", &"<redacted>")
            .finish()
    }
}

/// Push client configuration.
#[derive(Debug, Clone)]
pub struct PushConfig {
    /// Credential pair.
    pub credentials: Credentials,
    /// Service root; endpoint paths are appended to it.
    pub base_url: String,
    /// Submit to the validate-only endpoint.
    pub debug: bool,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Overall request timeout (none by default).
    pub timeout: Option<Duration>,
    /// Skip TLS certificate verification (DANGER: exposes the master secret
    /// to anyone able to intercept the connection).
    pub danger_accept_invalid_certs: bool,
    /// User agent string.
    pub user_agent: String,
}

impl PushConfig {
    /// Create a configuration with default settings.
    pub fn new(app_key: impl Into<String>, master_secret: impl Into<String>) -> Result<Self> {
        Ok(Self::with_credentials(Credentials::new(app_key, master_secret)?))
    }

    /// Create a configuration around existing credentials.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            debug: false,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: None,
            danger_accept_invalid_certs: false,
            user_agent: format!("jpush-push/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Load configuration from `JPUSH_*` environment variables.
    ///
    /// `JPUSH_APP_KEY` and `JPUSH_MASTER_SECRET` are required;
    /// `JPUSH_BASE_URL`, `JPUSH_DEBUG` and `JPUSH_DANGER_ACCEPT_INVALID_CERTS`
    /// are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load a `.env` file into the process environment, then call
    /// [`PushConfig::from_env`]. Variables already set are not overridden.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self> {
        dotenvy::from_path(path.as_ref()).map_err(|e| {
            PushError::Configuration(format!(
                "failed to load {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_env()
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}_{}", ENV_PREFIX, name));
        let required = |name: &str| {
            var(name).ok_or_else(|| {
                PushError::Configuration(format!("{}_{} is not set", ENV_PREFIX, name))
            })
        };

        let mut config = Self::new(required("APP_KEY")?, required("MASTER_SECRET")?)?;
        if let Some(base_url) = var("BASE_URL") {
            config = config.base_url(base_url);
        }
        if let Some(debug) = var("DEBUG") {
            config.debug = parse_flag(&debug)?;
        }
        if let Some(insecure) = var("DANGER_ACCEPT_INVALID_CERTS") {
            config.danger_accept_invalid_certs = parse_flag(&insecure)?;
        }
        config.endpoint()?;
        Ok(config)
    }

    /// Set the service root.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Enable or disable validate-only mode.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set an overall request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Skip certificate verification (DANGER: only for development).
    pub fn danger_accept_invalid_certs(mut self) -> Self {
        self.danger_accept_invalid_certs = true;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// URL the next request goes to, according to the debug flag.
    pub fn endpoint(&self) -> Result<Url> {
        let path = if self.debug { VALIDATE_PATH } else { PUSH_PATH };
        let root = self.base_url.trim_end_matches('/');
        Ok(Url::parse(&format!("{root}{path}"))?)
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(PushError::Configuration(format!(
            "expected a boolean flag, got {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_basic_token() {
        let credentials = Credentials::new("key", "secret").unwrap();
        assert_eq!(credentials.basic_token(), "a2V5OnNlY3JldA==");
    }

    #[test]
    fn test_empty_credentials_rejected() {
        assert!(matches!(
            Credentials::new("", "secret"),
            Err(PushError::Configuration(_))
        ));
        assert!(matches!(
            Credentials::new("key", "  "),
            Err(PushError::Configuration(_))
        ));
    }

    #[test]
    fn test_secret_is_redacted() {
        let credentials = Credentials::new("key", "top-secret").unwrap();
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("key"));
        assert!(!debug.contains("top-secret"));
    }

    #[test]
    fn test_endpoints() {
        let config = PushConfig::new("key", "secret").unwrap();
        assert_eq!(config.endpoint().unwrap().as_str(), "https://api.jpush.cn/v3/push");

        let config = config.debug(true);
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "https://api.jpush.cn/v3/push/validate"
        );

        let config = config.base_url("http://127.0.0.1:8080/");
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "http://127.0.0.1:8080/v3/push/validate"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let config = PushConfig::new("key", "secret")
            .unwrap()
            .base_url("https://proxy.example.com/jpush");
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "https://proxy.example.com/jpush/v3/push"
        );

        let config = config.base_url("https://proxy.example.com/jpush/").debug(true);
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "https://proxy.example.com/jpush/v3/push/validate"
        );
    }

    #[test]
    fn test_defaults() {
        let config = PushConfig::new("key", "secret").unwrap();
        assert_eq!(config.connect_timeout, Duration::from_secs(27));
        assert!(config.timeout.is_none());
        assert!(!config.danger_accept_invalid_certs);
        assert!(!config.debug);
    }

    #[test]
    fn test_from_lookup() {
        let config = PushConfig::from_lookup(lookup(&[
            ("JPUSH_APP_KEY", "key"),
            ("JPUSH_MASTER_SECRET", "secret"),
            ("JPUSH_DEBUG", "true"),
            ("JPUSH_BASE_URL", "http://localhost:9000"),
        ]))
        .unwrap();

        assert_eq!(config.credentials.app_key, "key");
        assert!(config.debug);
        assert!(!config.danger_accept_invalid_certs);
        assert_eq!(config.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_from_lookup_missing_secret() {
        let err = PushConfig::from_lookup(lookup(&[("JPUSH_APP_KEY", "key")])).unwrap_err();
        assert_eq!(
            err,
            PushError::Configuration("JPUSH_MASTER_SECRET is not set".into())
        );
    }

    #[test]
    fn test_from_lookup_bad_flag() {
        let result = PushConfig::from_lookup(lookup(&[
            ("JPUSH_APP_KEY", "key"),
            ("JPUSH_MASTER_SECRET", "secret"),
            ("JPUSH_DEBUG", "maybe"),
        ]));
        assert!(matches!(result, Err(PushError::Configuration(_))));
    }

    #[test]
    fn test_from_missing_env_file() {
        let result = PushConfig::from_env_file("/nonexistent/jpush.env");
        assert!(matches!(result, Err(PushError::Configuration(_))));
    }
}

//! # JPush Push
//!
//! Request builder and sender for the JPush v3 push REST API.
//!
//! ## Features
//!
//! - **Typed argument tree**: platform, audience, notification, message and
//!   options sections built incrementally
//! - **Local validation**: missing platform / alert and oversized alerts are
//!   caught before any network call
//! - **Error classification**: service error codes mapped to typed errors
//! - **Pluggable transport**: reqwest over HTTPS by default, in-memory for tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jpush_push::{PushRequestBuilder, Ios};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut push = PushRequestBuilder::new("your-app-key", "your-master-secret")?;
//!
//!     push.set_platform(["android", "ios"])?;
//!     push.set_audience("tag", ["beijing"])?;
//!     push.set_notification("Hello!", "Greeting")?;
//!     push.set_ios(Ios::new().badge(1u32))?;
//!
//!     let response = push.send().await?;
//!     println!("msg_id = {:?}", response.msg_id);
//!     Ok(())
//! }
//! ```
//!
//! ## Validate-only mode
//!
//! ```rust,ignore
//! use jpush_push::{PushConfig, PushRequestBuilder};
//!
//! let config = PushConfig::from_env()?.debug(true);
//! let mut push = PushRequestBuilder::with_config(config)?;
//! ```

mod audience;
mod client;
mod config;
mod error;
mod notification;
mod options;
mod payload;
mod platform;
mod response;
mod transport;

pub use audience::{Audience, AudienceFilter, AudienceType};
pub use client::PushRequestBuilder;
pub use config::{
    Credentials, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT, PUSH_PATH, PushConfig, VALIDATE_PATH,
};
pub use error::{PushError, Result};
pub use notification::{Android, Badge, Extras, Ios, Message, Notification, WinPhone};
pub use options::{MAX_BIG_PUSH_DURATION, MAX_TIME_TO_LIVE, Options};
pub use payload::{MAX_ALERT_BYTES, PushPayload};
pub use platform::{Platform, PlatformTarget};
pub use response::{ApiErrorCode, PushResponse};
pub use transport::{MemoryTransport, PushTransport, TransportRequest, TransportResponse};

#[cfg(feature = "http")]
pub use transport::HttpTransport;

/// Prelude for common imports.
///
/// ```
/// use jpush_push::prelude::*;
/// ```
pub mod prelude {
    pub use crate::audience::AudienceType;
    pub use crate::client::PushRequestBuilder;
    pub use crate::config::PushConfig;
    pub use crate::error::{PushError, Result};
    pub use crate::notification::{Android, Ios, Message, WinPhone};
    pub use crate::options::Options;
    pub use crate::response::PushResponse;
    pub use crate::transport::{MemoryTransport, PushTransport};
}

//! Target platform types.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Name of the broadcast sentinel shared by platform and audience.
pub const ALL: &str = "all";

/// Device platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Android device.
    Android,
    /// iOS device.
    Ios,
    /// Windows Phone device.
    #[serde(rename = "winphone")]
    WinPhone,
}

impl Platform {
    /// Wire name of the platform.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
            Self::WinPhone => "winphone",
        }
    }

    /// Whether the platform block carries a title field.
    pub fn supports_title(&self) -> bool {
        matches!(self, Self::Android | Self::WinPhone)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            "winphone" => Ok(Self::WinPhone),
            _ => Err(()),
        }
    }
}

/// Platform selection of a push: every platform, or an explicit list.
///
/// The list is a plain concatenation of every recognized name passed to
/// the builder, so duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformTarget {
    /// Broadcast to all platforms.
    All,
    /// Explicit platforms.
    List(Vec<Platform>),
}

impl PlatformTarget {
    /// Check whether the given platform is selected.
    pub fn includes(&self, platform: Platform) -> bool {
        match self {
            Self::All => true,
            Self::List(list) => list.contains(&platform),
        }
    }

    /// Check for the broadcast sentinel.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl Serialize for PlatformTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_str(ALL),
            Self::List(list) => list.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_from_str() {
        assert_eq!("android".parse(), Ok(Platform::Android));
        assert_eq!("winphone".parse(), Ok(Platform::WinPhone));
        assert!("ANDROID".parse::<Platform>().is_err());
        assert!("web".parse::<Platform>().is_err());
    }

    #[test]
    fn test_target_serialization() {
        let all = serde_json::to_string(&PlatformTarget::All).unwrap();
        assert_eq!(all, "\"all\"");

        let list = PlatformTarget::List(vec![Platform::Ios, Platform::WinPhone]);
        assert_eq!(
            serde_json::to_string(&list).unwrap(),
            "[\"ios\",\"winphone\"]"
        );
    }

    #[test]
    fn test_target_includes() {
        assert!(PlatformTarget::All.includes(Platform::Ios));
        let list = PlatformTarget::List(vec![Platform::Android]);
        assert!(list.includes(Platform::Android));
        assert!(!list.includes(Platform::Ios));
    }
}

//! Audience (targeting filter) types.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::platform::ALL;

/// Scoped audience filter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudienceType {
    /// Devices carrying any of the tags.
    Tag,
    /// Devices carrying all of the tags.
    TagAnd,
    /// Devices bound to the aliases.
    Alias,
    /// Devices by registration ID.
    RegistrationId,
}

impl AudienceType {
    /// Wire name of the filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::TagAnd => "tag_and",
            Self::Alias => "alias",
            Self::RegistrationId => "registration_id",
        }
    }
}

impl fmt::Display for AudienceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudienceType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tag" => Ok(Self::Tag),
            "tag_and" => Ok(Self::TagAnd),
            "alias" => Ok(Self::Alias),
            "registration_id" => Ok(Self::RegistrationId),
            _ => Err(()),
        }
    }
}

/// Scoped audience lists. Absent lists are omitted from the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AudienceFilter {
    /// Tags (OR).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<Vec<String>>,
    /// Tags (AND).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_and: Option<Vec<String>>,
    /// Aliases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<Vec<String>>,
    /// Registration IDs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_id: Option<Vec<String>>,
}

impl AudienceFilter {
    /// Get the list for a filter kind.
    pub fn get(&self, kind: AudienceType) -> Option<&[String]> {
        match kind {
            AudienceType::Tag => self.tag.as_deref(),
            AudienceType::TagAnd => self.tag_and.as_deref(),
            AudienceType::Alias => self.alias.as_deref(),
            AudienceType::RegistrationId => self.registration_id.as_deref(),
        }
    }

    /// Append values to a filter list, creating it if needed.
    pub fn append<I, S>(&mut self, kind: AudienceType, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slot = match kind {
            AudienceType::Tag => &mut self.tag,
            AudienceType::TagAnd => &mut self.tag_and,
            AudienceType::Alias => &mut self.alias,
            AudienceType::RegistrationId => &mut self.registration_id,
        };
        slot.get_or_insert_with(Vec::new)
            .extend(values.into_iter().map(Into::into));
    }

    /// True when no filter list exists.
    pub fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.tag_and.is_none()
            && self.alias.is_none()
            && self.registration_id.is_none()
    }
}

/// Audience of a push: broadcast, or a set of scoped filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// Every device.
    All,
    /// Scoped filters.
    Filter(AudienceFilter),
}

impl Audience {
    /// Check for the broadcast sentinel.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// True for a filter without any list.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::All => false,
            Self::Filter(filter) => filter.is_empty(),
        }
    }

    /// Get the scoped filter, if any.
    pub fn filter(&self) -> Option<&AudienceFilter> {
        match self {
            Self::All => None,
            Self::Filter(filter) => Some(filter),
        }
    }
}

impl Serialize for Audience {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_str(ALL),
            Self::Filter(filter) => filter.serialize(serializer),
        }
    }
}

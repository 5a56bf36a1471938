use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Comment;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum SortKey {
    #[serde(rename = "postId")]
    PostId,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "email")]
    Email,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::PostId, SortKey::Name, SortKey::Email];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "postid" | "post_id" | "post-id" | "post" => Some(Self::PostId),
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PostId => "postId",
            Self::Name => "name",
            Self::Email => "email",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PostId => "Post ID",
            Self::Name => "Name",
            Self::Email => "Email",
        }
    }

    /// Ascending order of two comments on this column. Text columns compare
    /// case-insensitively.
    pub fn compare(self, a: &Comment, b: &Comment) -> Ordering {
        match self {
            Self::PostId => a.post_id.cmp(&b.post_id),
            Self::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            Self::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Three-state column sort. Clicking the same column walks
/// `Asc -> Desc -> Unsorted`; clicking another column starts over at `Asc`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "SortWire", into = "SortWire")]
pub enum SortSpec {
    #[default]
    Unsorted,
    Asc(SortKey),
    Desc(SortKey),
}

impl SortSpec {
    pub fn toggle(self, key: SortKey) -> Self {
        match self {
            Self::Asc(current) if current == key => Self::Desc(key),
            Self::Desc(current) if current == key => Self::Unsorted,
            _ => Self::Asc(key),
        }
    }

    pub fn key(self) -> Option<SortKey> {
        match self {
            Self::Unsorted => None,
            Self::Asc(key) | Self::Desc(key) => Some(key),
        }
    }

    pub fn direction(self) -> Option<SortDirection> {
        match self {
            Self::Unsorted => None,
            Self::Asc(_) => Some(SortDirection::Asc),
            Self::Desc(_) => Some(SortDirection::Desc),
        }
    }

    /// Direction applied to `key`, if this spec sorts on it.
    pub fn direction_for(self, key: SortKey) -> Option<SortDirection> {
        if self.key() == Some(key) {
            self.direction()
        } else {
            None
        }
    }
}

/// Persisted shape of a sort: `{"key": ..., "direction": ...}` with both
/// members null when unsorted.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct SortWire {
    pub key: Option<SortKey>,
    pub direction: Option<SortDirection>,
}

impl TryFrom<SortWire> for SortSpec {
    type Error = String;

    fn try_from(wire: SortWire) -> Result<Self, Self::Error> {
        match (wire.key, wire.direction) {
            (None, None) => Ok(Self::Unsorted),
            (Some(key), Some(SortDirection::Asc)) => Ok(Self::Asc(key)),
            (Some(key), Some(SortDirection::Desc)) => Ok(Self::Desc(key)),
            (Some(key), None) => Err(format!("sort key '{key}' has no direction")),
            (None, Some(_)) => Err("sort direction set without a key".to_string()),
        }
    }
}

impl From<SortSpec> for SortWire {
    fn from(spec: SortSpec) -> Self {
        Self {
            key: spec.key(),
            direction: spec.direction(),
        }
    }
}

/// Stable sort of `rows` by `spec`; equal keys keep their input order in
/// both directions.
pub fn sort_rows(rows: &mut [&Comment], spec: SortSpec) {
    match spec {
        SortSpec::Unsorted => {}
        SortSpec::Asc(key) => rows.sort_by(|a, b| key.compare(a, b)),
        SortSpec::Desc(key) => rows.sort_by(|a, b| key.compare(b, a)),
    }
}

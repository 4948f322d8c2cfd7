//! News items.

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque news identifier.
///
/// Sources hand out either numeric or string ids; numbers are normalized to their
/// decimal string so `42` and `"42"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NewsId(String);

impl NewsId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NewsId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NewsId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for NewsId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for NewsId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => NewsId::from(n),
            RawId::Text(s) => NewsId(s),
        })
    }
}

/// A headline as delivered by a news source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: NewsId,
    #[serde(alias = "title")]
    pub headline: String,
}

impl NewsItem {
    pub fn new(id: impl Into<NewsId>, headline: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            headline: headline.into(),
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The kinds of resource a user can upvote.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A top-level submission.
    Post,
    /// A comment on a post, at any depth.
    Comment,
}

impl ResourceKind {
    /// Path segment used by the REST API (`/api/{segment}/{id}/upvote`).
    pub fn path_segment(&self) -> &'static str {
        match self {
            ResourceKind::Post => "posts",
            ResourceKind::Comment => "comments",
        }
    }

    /// Tag shared by every cached list query holding this kind of resource.
    pub fn cache_tag(&self) -> &'static str {
        self.path_segment()
    }

    /// Capitalized noun, used at the start of response messages.
    pub fn title(&self) -> &'static str {
        match self {
            ResourceKind::Post => "Post",
            ResourceKind::Comment => "Comment",
        }
    }

    /// Human readable noun, used in user-facing messages.
    pub fn noun(&self) -> &'static str {
        match self {
            ResourceKind::Post => "post",
            ResourceKind::Comment => "comment",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// Error returned when a path segment is not a valid resource identifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseResourceIdError {
    #[error("Invalid resource id: {0}")]
    NotANumber(String),
    #[error("Resource id must be positive, got {0}")]
    NotPositive(i64),
}

/// Identifier of a post or comment. Always positive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "i64", into = "i64")]
pub struct ResourceId(i64);

impl ResourceId {
    /// The first id handed out by a fresh store.
    pub const FIRST: ResourceId = ResourceId(1);

    pub fn new(id: i64) -> Result<Self, ParseResourceIdError> {
        if id <= 0 {
            return Err(ParseResourceIdError::NotPositive(id));
        }
        Ok(Self(id))
    }

    pub fn get(&self) -> i64 {
        self.0
    }

    /// The id allocated after this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl TryFrom<i64> for ResourceId {
    type Error = ParseResourceIdError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<ResourceId> for i64 {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

impl FromStr for ResourceId {
    type Err = ParseResourceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<i64>()
            .map_err(|_| ParseResourceIdError::NotANumber(s.to_string()))?;
        Self::new(id)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fully qualified address of a votable resource.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub id: ResourceId,
}

impl ResourceRef {
    pub fn new(kind: ResourceKind, id: ResourceId) -> Self {
        Self { kind, id }
    }

    pub fn post(id: ResourceId) -> Self {
        Self::new(ResourceKind::Post, id)
    }

    pub fn comment(id: ResourceId) -> Self {
        Self::new(ResourceKind::Comment, id)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resource_id() {
        assert_eq!("42".parse::<ResourceId>().unwrap().get(), 42);
        assert_eq!(" 7 ".parse::<ResourceId>().unwrap().get(), 7);
    }

    #[test]
    fn test_parse_resource_id_rejects_garbage() {
        assert_eq!(
            "abc".parse::<ResourceId>(),
            Err(ParseResourceIdError::NotANumber("abc".to_string()))
        );
        assert_eq!("0".parse::<ResourceId>(), Err(ParseResourceIdError::NotPositive(0)));
        assert_eq!("-3".parse::<ResourceId>(), Err(ParseResourceIdError::NotPositive(-3)));
    }

    #[test]
    fn test_resource_id_json_rejects_non_positive() {
        let id: ResourceId = serde_json::from_str("42").unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");

        assert!(serde_json::from_str::<ResourceId>("0").is_err());
        assert!(serde_json::from_str::<ResourceId>("-5").is_err());
    }

    #[test]
    fn test_resource_ref_display() {
        let post = ResourceRef::post(ResourceId::new(42).unwrap());
        let comment = ResourceRef::comment(ResourceId::new(9).unwrap());
        assert_eq!(post.to_string(), "post:42");
        assert_eq!(comment.to_string(), "comment:9");
        assert_eq!(post.kind.path_segment(), "posts");
        assert_eq!(comment.kind.cache_tag(), "comments");
    }
}

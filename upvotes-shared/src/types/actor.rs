use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an authenticated user, as issued by the auth collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who is making a request.
///
/// Consumed by the toggle endpoint, which refuses anonymous callers, and by
/// the client, which uses it to decide whether a vote can be cast at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Actor {
    #[default]
    Anonymous,
    Authenticated { id: ActorId },
}

impl Actor {
    pub fn authenticated(id: impl Into<String>) -> Self {
        Actor::Authenticated { id: ActorId::new(id) }
    }

    pub fn id(&self) -> Option<&ActorId> {
        match self {
            Actor::Anonymous => None,
            Actor::Authenticated { id } => Some(id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Actor::Authenticated { .. })
    }
}

//! User-visible notifications raised by the coordinator.
use tracing::warn;
use upvotes_shared::types::ResourceKind;

use crate::errors::ToggleFailure;

/// An error toast shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The toast shown when a toggle could not be applied.
    pub fn toggle_failed(kind: ResourceKind, failure: &ToggleFailure) -> Self {
        match failure {
            ToggleFailure::Unauthorized => {
                Self::error(format!("You must be logged in to upvote a {}.", kind.noun()))
            }
            _ => Self::error(format!("Failed to upvote {}. Please try again.", kind.noun())),
        }
    }
}

/// Displays notifications to the user (toasts, status lines...).
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        warn!(text = %notification.message, "Notification");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upvotes_shared::types::{ResourceId, ResourceRef};

    #[test]
    fn test_toggle_failed_messages() {
        let not_found = ToggleFailure::NotFound(ResourceRef::post(ResourceId::new(1).unwrap()));
        assert_eq!(
            Notification::toggle_failed(ResourceKind::Post, &not_found).message,
            "Failed to upvote post. Please try again."
        );
        assert_eq!(
            Notification::toggle_failed(ResourceKind::Comment, &ToggleFailure::Unauthorized).message,
            "You must be logged in to upvote a comment."
        );
    }
}

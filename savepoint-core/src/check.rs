//! Condition checks attached to interactive components.

use serde::{Deserialize, Serialize};

/// A condition evaluated by the runtime before an action fires.
///
/// Checks are plain value objects; the editor UI for them lives elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum Check {
    /// Requires the viewer to hold a permission node.
    #[serde(rename = "Permission Check")]
    Permission(PermissionCheck),
}

impl Check {
    /// Stable identifier written as the `name` tag.
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Self::Permission(_) => PermissionCheck::ID,
        }
    }
}

/// Permission requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionCheck {
    /// Permission node, e.g. `ag.group.premium`.
    pub permission: String,
}

impl PermissionCheck {
    /// Identifier used as the check's `name` tag.
    pub const ID: &'static str = "Permission Check";

    /// Create a check for the given permission node.
    #[must_use]
    pub fn new(permission: impl Into<String>) -> Self {
        Self {
            permission: permission.into(),
        }
    }

    /// The check a freshly added component starts with.
    #[must_use]
    pub fn generator() -> Self {
        Self::new("ag.group.premium")
    }
}

impl From<PermissionCheck> for Check {
    fn from(check: PermissionCheck) -> Self {
        Self::Permission(check)
    }
}

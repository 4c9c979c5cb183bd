//! # Savepoint Core
//!
//! Project serialization for the layout editor: the live workspace, the
//! savepoint document it is bundled into, and the path back from a stored
//! (possibly older) savepoint into live state.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   savepoint-core                     │
//! ├──────────────────────────────────────────────────────┤
//! │  Workspace          │  Registries                    │
//! │  - Component tree   │  - Fonts (base64)              │
//! │  - Settings         │  - Images / gifs (data URIs)   │
//! │  - Activity flags   │  - Built-in names              │
//! ├──────────────────────────────────────────────────────┤
//! │  Bundler → Project → Migrator → Loader / Importer    │
//! └──────────────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod activity;
pub mod bundle;
pub mod check;
pub mod component;
pub mod error;
pub mod fonts;
pub mod images;
pub mod loader;
pub mod migrate;
pub mod notify;
pub mod project;
pub mod tree;
pub mod workspace;

mod payload;

#[cfg(test)]
pub(crate) mod fixtures;

pub use activity::{ActivityFlag, ActivityGuard};
pub use check::{Check, PermissionCheck};
pub use component::{CodecMode, Component, ComponentId, ComponentKind, Frame};
pub use error::{LayoutError, LayoutResult, MigrationError, ResourceError};
pub use fonts::{Font, FontFormat, FontRegistry};
pub use images::{ImageAsset, ImageFormat, ImageRegistry};
pub use loader::{ImportReport, LoadReport};
pub use migrate::Migration;
pub use notify::{
    Level, LogNotifier, Notification, NotificationAction, Notifier, RecordingNotifier,
};
pub use project::{FormatVersion, Project, ResourceEntry, CURRENT_VERSION, DEFAULT_PROJECT_NAME};
pub use tree::{ComponentTree, TreeDocument};
pub use workspace::{Settings, Workspace};

/// Savepoint core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

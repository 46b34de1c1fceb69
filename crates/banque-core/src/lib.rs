//! # Banque Core
//!
//! Foundation types for the verification-status slice of the Banque client:
//!
//! - **status**: the canonical [`VerificationStatus`] and its lenient parser
//! - **snapshot**: the immutable [`UserStatusSnapshot`] surfaced to the UI
//! - **visibility**: the pure snapshot → [`VisibilityFlags`] mapping
//! - **record**: the projection of remote user documents and partial updates
//! - **effects**: traits for the document store, auth provider and clock
//! - **config**: layered [`SyncConfig`] (defaults, TOML, environment)
//!
//! Nothing in this crate performs I/O on its own; every external collaborator
//! is reached through the traits in [`effects`].

pub mod config;
pub mod effects;
pub mod errors;
pub mod identifiers;
pub mod record;
pub mod snapshot;
pub mod status;
pub mod visibility;

pub use config::{ConfigError, SyncConfig};
pub use effects::{
    AuthProvider, AuthSession, PhysicalTimeEffects, RecordStream, SystemClock, UserRecordStore,
};
pub use errors::{Result, StoreError, SyncError};
pub use identifiers::{SessionId, UserId};
pub use record::{fields, Document, FieldPatch, PatchOp, RemoteUserRecord};
pub use snapshot::UserStatusSnapshot;
pub use status::VerificationStatus;
pub use visibility::{resolve_visibility, Feature, VisibilityFlags};

//! # Banque Sync
//!
//! Client-side verification status synchronization.
//!
//! The remote user record carries several generations of duplicated status
//! fields. This crate reconciles them into one [`UserStatusSnapshot`] per
//! session ([`reconcile`]), caches it, keeps it fresh through a single shared
//! realtime listener per session, and fans updates out to any number of local
//! subscribers ([`StatusSyncer`]).
//!
//! [`UserStatusSnapshot`]: banque_core::UserStatusSnapshot

pub mod reconcile;
pub mod subscription;
pub mod syncer;

pub use reconcile::{canonical_status, reconcile, Inconsistency, Reconciliation};
pub use subscription::{SnapshotCallback, Subscription};
pub use syncer::StatusSyncer;

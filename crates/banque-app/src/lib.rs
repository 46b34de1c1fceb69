//! # Banque App
//!
//! Headless application layer over the status syncer. Frontends build one
//! [`SessionContext`] per signed-in user and read banners, route decisions,
//! action gates and menu state from it.
//!
//! ## Modules
//!
//! - **errors**: categorized [`AppError`] with toast routing
//! - **guards**: pure banner, route, action and menu decisions
//! - **session**: the session-scoped [`SessionContext`]

#![deny(missing_docs)]

pub mod errors;
pub mod guards;
pub mod session;

pub use errors::{AppError, ErrorCategory, ToastLevel};
pub use guards::{
    banners_for, gate_action, guard_route, menu_entries, Banner, GateOutcome, GatedAction,
    MenuEntry, Notice, Route, RouteDecision,
};
pub use session::{ForceSyncOutcome, SessionContext, StatusView, Toast};

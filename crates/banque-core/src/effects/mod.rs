//! Effect traits for external collaborators
//!
//! The status slice never talks to the hosted backend directly. The document
//! store, the authentication provider and the wall clock are each reached
//! through one of these traits so that production adapters and test doubles
//! are interchangeable.

pub mod auth;
pub mod store;
pub mod time;

pub use auth::{AuthProvider, AuthSession};
pub use store::{RecordStream, UserRecordStore};
pub use time::{PhysicalTimeEffects, SystemClock};

//! # Banque Testkit
//!
//! Deterministic doubles for the effect traits of `banque-core`, plus document
//! fixtures and proptest strategies shared by the test suites of the status
//! crates.

#![allow(clippy::unwrap_used, clippy::expect_used)]

pub mod auth;
pub mod fixtures;
pub mod store;
pub mod strategies;
pub mod time;

pub use auth::MockAuthProvider;
pub use fixtures::{document, eventually, init_test_tracing};
pub use store::MockUserRecordStore;
pub use time::ManualClock;

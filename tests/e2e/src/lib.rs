//! # Drill E2E Tests
//!
//! End-to-end support crate: isolated item tables, fixture stores and
//! engines wired to them. The journeys under `tests/` drive full answer
//! sessions through the engine and check the persisted table.

pub mod mocks;

pub use harness::{Backend, TestStoreManager};
pub use mocks::{BatchConfig, TestDataFactory, TestScenario};

//! Item Store Module
//!
//! The authoritative mastery and pool state:
//! - Items in bank order with streak counters and pool membership
//! - Unique question identifiers enforced on every insert
//! - Lookups that treat a miss as corrupted state

mod item;
mod table;

pub use item::{Item, MasteryLevel};
pub use table::{ItemStore, StoreError, StoreStats};

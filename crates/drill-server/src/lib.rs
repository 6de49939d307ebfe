//! Drill Server
//!
//! HTTP front for the drill engine plus the shared command-line options
//! used by the `drill-server` and `drill` binaries.

pub mod options;
pub mod server;

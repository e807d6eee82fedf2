//! Common Test Utilities
//!
//! Shared fixtures for token summaries, pages and wired-up services.


pub use fixtures::*;

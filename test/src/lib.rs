//! Shared plumbing for multi-client integration tests.

pub mod helpers;

//! Integration tests for the list-queue crate.
//!
//! The suites live under `tests/` and drive the public API only; see
//! `message_lifecycle.rs` for the end-to-end lifecycle scenarios and
//! `store_contract.rs` for the store contract suite.

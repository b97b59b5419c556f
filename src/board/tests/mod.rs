//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `sow.rs` - Sowing, capture and free-turn correctness
//! - `edge_cases.rs` - Decided, tied and stalled positions
//! - `search.rs` - Solver results, cutoffs, table and tree recording
//! - `proptest.rs` - Property-based tests

mod proptest;

//! Property-based tests
//!
//! Invariants checked over arbitrary message sequences:
//!
//! - `reveal_props`: the reveal-once protocol
//!   - A revealed secret is exactly the issued value
//!   - A failed creation never touches the held secret or closes the dialog
//!   - Dismissing the reveal leaves no secret in memory
//!   - Answers to already-resolved requests are ignored
//!   - The page cursor stays within the known page range
//!
//! By default, proptest runs 256 cases per property. Override with
//! `PROPTEST_CASES`.

mod reveal_props;

//! BDD scenarios for congreso-core
//!
//! Feature files live in `features/`; run them with
//! `cargo test -p cucumber-tests` or the `cucumber` binary.

pub mod features;

//! Shared helpers for Garnet's property-based tests.

#![deny(missing_docs, missing_debug_implementations)]

pub mod input;

//! Glue between the command line and the library crates.
//!
//! Settings files, fund arguments and input files are resolved here so that
//! `main` only wires commands together.

pub(crate) mod config;
pub(crate) mod inputs;

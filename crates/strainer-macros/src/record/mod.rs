//! Implementation of the `#[derive(Record)]` macro.
//!
//! This module provides derive macro support for the strainer filter
//! engine, generating field accessors and query-name constants from
//! struct annotations.

mod attrs;
mod derive;

pub use derive::record_derive_impl;

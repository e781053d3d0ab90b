//! NO UIE Core - Shared types library.
//!
//! This crate provides the domain types used across the NO UIE components:
//! - `cart` - Cart store, checkout, and the local order log
//! - `cli` - Command-line front end over a file-backed store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! logging. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product and order identifiers, prices, cart lines, orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

//! Naked Pineapple Core - Shared types library.
//!
//! This crate provides common types used across the checkout extension crates:
//! - `checkout` - Add-on recommender, countdown banner and benefits grid
//! - `cli` - Command-line preview of the checkout widgets
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for Shopify global ids and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

//! TechMart Core - Shared types library.
//!
//! This crate provides common types used across the TechMart client services:
//! - `shop` - Customer-facing checkout service
//! - `inventory` - Internal inventory console service
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails, phone numbers, IDs, payment
//!   methods, encoded images, and field-level validation errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

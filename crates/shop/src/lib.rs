//! TechMart Shop library.
//!
//! This crate provides the checkout service as a library, allowing it to
//! be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cancel;
pub mod checkout;
pub mod clients;
pub mod config;
pub mod error;
pub mod middleware;
pub mod refetch;
pub mod routes;
pub mod session;
pub mod state;

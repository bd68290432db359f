//! Core types for TechMart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod fields;
pub mod id;
pub mod image;
pub mod payment;
pub mod phone;

pub use email::{Email, EmailError};
pub use fields::FieldErrors;
pub use id::*;
pub use image::{EncodedImage, ImageError};
pub use payment::PaymentMethod;
pub use phone::{Phone, PhoneError};

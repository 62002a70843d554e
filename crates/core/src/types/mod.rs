//! Core types for Mercado Barrio.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod phone;
pub mod role;
pub mod status;

pub use id::*;
pub use phone::{Phone, PhoneError};
pub use role::Role;
pub use status::OrderStatus;

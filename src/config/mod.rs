//! # Decoder Configuration Module
//!
//! This module centralizes the layout constants shared by the decoder, the
//! bitmap reader and the size validator. Constants that depend on each other
//! are co-located and tied together with compile-time assertions so a change
//! to one cannot silently desynchronize the byte accounting of another.
//!
//! ## Module Organization
//!
//! - [`constants`]: slot geometry, bitmap word geometry and nesting limits

pub mod constants;
pub use constants::*;

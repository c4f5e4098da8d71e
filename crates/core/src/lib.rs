//! Bodega Core - Shared types library.
//!
//! This crate provides common types used across all Bodega components:
//! - `server` - Server-rendered inventory/point-of-sale web application
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and the user role enum

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

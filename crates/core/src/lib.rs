//! ShopX Core - Shared types library.
//!
//! This crate provides the entity model mirrored by the ShopX client:
//! - `client` - GraphQL data-synchronization layer (cache, store, transport)
//! - `cli` - Command-line front end that drives the client
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no persistence. Everything coming off the wire passes through
//! [`normalize`] before it reaches a typed entity.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money helpers, and the storefront entities
//! - [`normalize`] - Total coercion of untrusted JSON payloads into entities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod normalize;
pub mod types;

pub use types::*;

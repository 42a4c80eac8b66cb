//! API Layer
//!
//! Transport, decoding and error normalization for the bootstrap calls.

pub mod client;
pub mod decode;
pub mod envelope;
pub mod error;

pub use client::{ApiClient, GlooClient, DICTIONARY_ENDPOINT};

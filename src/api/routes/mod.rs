//! API Routes
//!
//! Route handlers organized by functionality.

pub mod dictionary;
pub mod health;
pub mod session;

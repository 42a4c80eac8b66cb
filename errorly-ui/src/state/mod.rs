//! State Management
//!
//! Session state shared by every view, and the project list it carries.

pub mod projects;
pub mod session;

pub use projects::ProjectSummary;
pub use session::{create_session_signals, session_gate, SessionSignals};

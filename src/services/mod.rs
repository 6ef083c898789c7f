//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own payload shaping, validation and backend call
//! sequencing so route handlers can stay focused on extraction and
//! response envelopes.

pub mod auth;
pub mod books;
pub mod quiz;
pub mod session;

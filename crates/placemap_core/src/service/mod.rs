//! View-controller services.
//!
//! # Responsibility
//! - Own page state that callers would otherwise keep in globals.
//! - Expose explicit completion handlers for the HTTP client collaborator.

pub mod search_view;

// Core of the attendance assistant:
// - Chatbot API client and the question dispatcher
// - Request/response data structures
// - Configuration loading
// - Language preference, shortcuts and toasts shared by front ends
// - Shared error types

// Export client module - API client for the chatbot endpoints
pub mod client;
pub use client::*;

// Export types module - Request/response data structures
pub mod types;
pub use types::*;

// Export question module - The fixed question catalog
pub mod question;
pub use question::*;

// Export query module - Query text and parameter formatting
pub mod query;
pub use query::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;

pub mod i18n;
pub mod session;
pub mod shortcuts;
pub mod toast;

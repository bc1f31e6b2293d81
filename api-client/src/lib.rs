//! HTTP client for the scheda project/task API
//!
//! Implements `scheda_core::api::ProjectApi` over reqwest with a session
//! cookie store, plus the login and logout calls.

mod client;

pub use client::{ApiClient, ClientConfig, DEFAULT_API_URL, DEFAULT_REDIRECT_DELAY};

//! Core library for the scheda project dashboard
//!
//! This crate contains the client-side logic, including:
//! - Project, task and reference data models
//! - The `ProjectApi` seam implemented by the HTTP client
//! - Page state, its reducer and the pure render layer
//! - Controllers for the project page and the dashboard

pub mod api;
pub mod auth;
pub mod cache;
pub mod controller;
pub mod dates;
pub mod error;
pub mod ids;
pub mod navigation;
pub mod notifier;
pub mod page;
pub mod project;
pub mod reference;
pub mod status;
pub mod task;
pub mod view;

#[cfg(test)]
mod test_support;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

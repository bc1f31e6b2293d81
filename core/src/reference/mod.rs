//! Reference data module
//!
//! Clients, teams and users are read-only lookups used to fill selectors.

mod loader;
mod model;

pub use loader::{ReferenceLoader, ReferenceSet};
pub use model::*;

//! Project module
//!
//! A Project is the top-level work item: a client, a team, a deadline and a
//! status. Tasks belong to Projects.

mod model;

pub use model::*;

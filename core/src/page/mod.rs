//! Project page state
//!
//! `PageState` is the explicit application state handed to every handler.
//! `PageState::apply` is the only place it changes.

mod reducer;
mod state;

pub use reducer::PageEvent;
pub use state::*;

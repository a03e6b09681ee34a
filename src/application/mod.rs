//! Application layer managing state and user workflows.
//!
//! This module owns the application store and the board's interaction state,
//! and coordinates between the domain layer and the presentation layer.

pub mod form;
pub mod state;
pub mod store;

pub use form::*;
pub use state::*;
pub use store::*;

//! Presentation layer handling the terminal UI and user input.
//!
//! This module renders the kanban board with ratatui and turns keyboard
//! and mouse events into board actions.

pub mod layout;
pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;

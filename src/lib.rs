//! JobB - Job Application Board Library
//!
//! A terminal kanban board for tracking job applications through hiring
//! stages, built in Rust.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;

//! Chat assistant reply collaborator.

pub mod service;
pub mod types;

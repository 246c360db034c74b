//! Authentication collaborator contracts and session token persistence.

pub mod service;
pub mod tokens;

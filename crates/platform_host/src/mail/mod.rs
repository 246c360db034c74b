//! Mailbox collaborator.

pub mod service;
pub mod types;

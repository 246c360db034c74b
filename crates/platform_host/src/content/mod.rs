//! Notes and flashcard deck collaborators.

pub mod service;
pub mod types;

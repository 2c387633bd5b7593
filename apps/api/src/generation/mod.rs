//! Cover letter generation: options → prompt → backend call.

pub mod handlers;
pub mod options;
pub mod prompt;
pub mod service;

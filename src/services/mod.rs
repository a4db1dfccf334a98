pub mod chat;
pub mod context;
pub mod prompt;
pub mod sanitizer;

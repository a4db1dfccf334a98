pub mod message;
pub mod retrieval;

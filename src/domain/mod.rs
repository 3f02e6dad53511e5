pub mod error;
pub mod todo;

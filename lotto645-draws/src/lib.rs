pub mod fetch;
pub mod models;
pub mod source;

pub mod analysis;
pub mod config;
pub mod display;
pub mod generator;
pub mod session;

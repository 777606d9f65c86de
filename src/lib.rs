pub mod classifier;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod pipeline;
pub mod table;

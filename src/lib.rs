pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod snapshot;
pub mod state;
pub mod stream;

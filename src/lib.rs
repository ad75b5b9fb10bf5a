pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod loader;
pub mod server;

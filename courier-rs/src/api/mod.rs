//! REST API module for courier-rs
//!
//! Provides HTTP endpoints to queue emails and read dispatch status

pub mod handlers;
pub mod server;

pub use server::ApiServer;
